pub mod trip;

pub use trip::{PlanOutcome, StateUpdate, ToolCallRecord, TripRequest, TripState};

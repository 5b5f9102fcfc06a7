//! Multi-agent trip planning backend.
//!
//! A trip request is decomposed into three independent research tasks
//! (general research, budget, local experiences), each executed by a
//! tool-calling agent, then synthesized into one itinerary:
//!
//! ```text
//! TripRequest → fan-out {research, budget, local} → merge → itinerary
//! ```
//!
//! External capabilities (language model, web search, optional vector index)
//! are injected as trait objects so every tier can degrade independently:
//! search falls back to the model, vector retrieval falls back to keyword
//! scoring, and a failed task agent leaves its field empty without taking
//! down the request.

pub mod ai;
pub mod agents;
pub mod config;
pub mod graph;
pub mod http;
pub mod models;
pub mod planner;
pub mod retrieval;
pub mod tools;

pub use config::Config;
pub use models::{PlanOutcome, ToolCallRecord, TripRequest, TripState};
pub use planner::{PlannerError, TripPlanner};

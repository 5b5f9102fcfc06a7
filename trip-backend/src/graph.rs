//! Execution graph: parallel fan-out to the three task agents, merge of
//! their partial updates, then fan-in to the itinerary agent.

use crate::agents::{ItineraryAgent, TaskAgent};
use crate::ai::types::AiError;
use crate::models::{StateUpdate, TripState};

pub struct TripGraph {
    research: TaskAgent,
    budget: TaskAgent,
    local: TaskAgent,
    itinerary: ItineraryAgent,
}

impl TripGraph {
    pub fn new(
        research: TaskAgent,
        budget: TaskAgent,
        local: TaskAgent,
        itinerary: ItineraryAgent,
    ) -> Self {
        TripGraph {
            research,
            budget,
            local,
            itinerary,
        }
    }

    /// Run the full graph over `state`. The three task agents run
    /// concurrently; their updates are merged in role order (research,
    /// budget, local) so the audit trail is deterministic. The itinerary
    /// agent only runs once all three fields are in place.
    pub async fn invoke(&self, mut state: TripState) -> Result<TripState, AiError> {
        let request = state.trip_request.clone();

        log::info!(
            "[GRAPH] Fan-out for destination '{}'",
            request.destination
        );
        let (research_update, budget_update, local_update) = tokio::join!(
            self.research.run(&request),
            self.budget.run(&request),
            self.local.run(&request),
        );

        for update in [research_update, budget_update, local_update] {
            state.apply(update);
        }

        log::info!(
            "[GRAPH] Fan-in with {} tool calls recorded",
            state.tool_calls.len()
        );
        let itinerary = self.itinerary.run(&state).await?;
        state.apply(StateUpdate::final_itinerary(itinerary));

        Ok(state)
    }
}

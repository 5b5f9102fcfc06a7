//! Agent layer: three tool-calling task agents and one synthesis agent.

pub mod itinerary;
pub mod task;

pub use itinerary::ItineraryAgent;
pub use task::TaskAgent;

use crate::models::{StateUpdate, ToolCallRecord, TripRequest};

/// The three research roles that fan out in parallel. Each owns exactly one
/// field of the trip state and a fixed tool allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    Research,
    Budget,
    Local,
}

impl AgentRole {
    pub fn name(&self) -> &'static str {
        match self {
            AgentRole::Research => "research",
            AgentRole::Budget => "budget",
            AgentRole::Local => "local",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            AgentRole::Research => {
                "You are a travel research specialist. Use your tools to gather essential \
                 facts about the destination, then summarize what a traveler needs to know \
                 in a few short paragraphs."
            }
            AgentRole::Budget => {
                "You are a travel budget analyst. Use your tools to find typical costs and \
                 prices, then summarize what the trip will cost at the traveler's budget \
                 level."
            }
            AgentRole::Local => {
                "You are a local travel expert. Use your tools to surface authentic food, \
                 customs, and lesser-known places, then summarize the local experiences \
                 that fit the traveler's interests."
            }
        }
    }

    pub fn allowed_tools(&self) -> &'static [&'static str] {
        match self {
            AgentRole::Research => &["essential_info", "weather_info", "visa_info"],
            AgentRole::Budget => &["budget_basics", "attraction_prices"],
            AgentRole::Local => &["local_flavor", "local_customs", "hidden_gems"],
        }
    }

    /// User prompt built from the request fields this role cares about.
    /// `grounding` carries retrieved guide context for the local role.
    pub fn user_prompt(&self, request: &TripRequest, grounding: Option<&str>) -> String {
        let mut prompt = match self {
            AgentRole::Research => {
                format!("Research the destination: {}.", request.destination)
            }
            AgentRole::Budget => format!(
                "Estimate costs for {} over {} on a {} budget.",
                request.destination, request.duration, request.budget
            ),
            AgentRole::Local => {
                let mut p = format!(
                    "Find local experiences in {} for a traveler interested in {}.",
                    request.destination, request.interests
                );
                if let Some(style) = request
                    .travel_style
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
                {
                    p.push_str(&format!(" Travel style: {}.", style));
                }
                p
            }
        };

        if let Some(context) = grounding.filter(|c| !c.trim().is_empty()) {
            prompt.push_str("\n\nCurated guide notes to draw on:\n");
            prompt.push_str(context);
        }
        prompt
    }

    /// Wrap this role's output into the partial update it owns.
    pub fn state_update(&self, text: String, tool_calls: Vec<ToolCallRecord>) -> StateUpdate {
        match self {
            AgentRole::Research => StateUpdate::research(text, tool_calls),
            AgentRole::Budget => StateUpdate::budget(text, tool_calls),
            AgentRole::Local => StateUpdate::local(text, tool_calls),
        }
    }
}

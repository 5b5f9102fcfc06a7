//! Request, shared planning state, and the audit types that flow through
//! the orchestrator.

use crate::ai::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_BUDGET: &str = "moderate";
pub const DEFAULT_INTERESTS: &str = "general sightseeing";

/// What the caller asked for. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub destination: String,
    pub duration: String,
    #[serde(default = "default_budget")]
    pub budget: String,
    #[serde(default = "default_interests")]
    pub interests: String,
    #[serde(default)]
    pub travel_style: Option<String>,
    #[serde(default)]
    pub user_input: Option<String>,
}

fn default_budget() -> String {
    DEFAULT_BUDGET.to_string()
}

fn default_interests() -> String {
    DEFAULT_INTERESTS.to_string()
}

impl TripRequest {
    pub fn new(destination: impl Into<String>, duration: impl Into<String>) -> Self {
        TripRequest {
            destination: destination.into(),
            duration: duration.into(),
            budget: default_budget(),
            interests: default_interests(),
            travel_style: None,
            user_input: None,
        }
    }

    pub fn with_budget(mut self, budget: impl Into<String>) -> Self {
        self.budget = budget.into();
        self
    }

    pub fn with_interests(mut self, interests: impl Into<String>) -> Self {
        self.interests = interests.into();
        self
    }

    pub fn with_travel_style(mut self, style: impl Into<String>) -> Self {
        self.travel_style = Some(style.into());
        self
    }

    pub fn with_user_input(mut self, input: impl Into<String>) -> Self {
        self.user_input = Some(input.into());
        self
    }
}

/// One audit entry: which agent invoked which tool with what arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRecord {
    pub agent: String,
    pub tool: String,
    pub args: Value,
}

/// Shared state for one graph execution. Created per request, merged into
/// by node updates, discarded once the outcome is built.
#[derive(Debug, Clone)]
pub struct TripState {
    pub messages: Vec<Message>,
    pub trip_request: TripRequest,
    pub research: Option<String>,
    pub budget: Option<String>,
    pub local: Option<String>,
    pub final_itinerary: Option<String>,
    pub tool_calls: Vec<ToolCallRecord>,
}

impl TripState {
    pub fn new(trip_request: TripRequest) -> Self {
        TripState {
            messages: Vec::new(),
            trip_request,
            research: None,
            budget: None,
            local: None,
            final_itinerary: None,
            tool_calls: Vec::new(),
        }
    }

    /// Fold a partial update into the state. Scalar fields are written only
    /// when the update carries them; tool calls and messages concatenate.
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(text) = update.research {
            self.research = Some(text);
        }
        if let Some(text) = update.budget {
            self.budget = Some(text);
        }
        if let Some(text) = update.local {
            self.local = Some(text);
        }
        if let Some(text) = update.final_itinerary {
            self.final_itinerary = Some(text);
        }
        self.tool_calls.extend(update.tool_calls);
        self.messages.extend(update.messages);
    }
}

/// A node's partial contribution: only the fields it owns, never the full
/// state.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub research: Option<String>,
    pub budget: Option<String>,
    pub local: Option<String>,
    pub final_itinerary: Option<String>,
    pub tool_calls: Vec<ToolCallRecord>,
    pub messages: Vec<Message>,
}

impl StateUpdate {
    pub fn research(text: String, tool_calls: Vec<ToolCallRecord>) -> Self {
        StateUpdate {
            research: Some(text),
            tool_calls,
            ..Default::default()
        }
    }

    pub fn budget(text: String, tool_calls: Vec<ToolCallRecord>) -> Self {
        StateUpdate {
            budget: Some(text),
            tool_calls,
            ..Default::default()
        }
    }

    pub fn local(text: String, tool_calls: Vec<ToolCallRecord>) -> Self {
        StateUpdate {
            local: Some(text),
            tool_calls,
            ..Default::default()
        }
    }

    pub fn final_itinerary(text: String) -> Self {
        StateUpdate {
            final_itinerary: Some(text),
            ..Default::default()
        }
    }

    /// Attach the conversation this update's agent produced.
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }
}

/// What the entry point hands back to the transport layer.
#[derive(Debug, Clone, Serialize)]
pub struct PlanOutcome {
    pub itinerary: String,
    pub tool_calls: Vec<ToolCallRecord>,
}

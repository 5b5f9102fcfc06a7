//! Fan-in synthesis: one plain model call over the three research summaries.

use crate::ai::types::AiError;
use crate::ai::{ChatModel, Message};
use crate::models::TripState;
use std::sync::Arc;

const SYSTEM_PROMPT: &str =
    "You are a travel planner. Create a detailed, day-by-day itinerary from the \
     research provided. Be specific and practical.";

/// Upstream summaries longer than this are cut to exactly this many
/// characters before they enter the prompt.
pub const SUMMARY_CHAR_LIMIT: usize = 400;

pub struct ItineraryAgent {
    model: Arc<dyn ChatModel>,
}

impl ItineraryAgent {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        ItineraryAgent { model }
    }

    /// Produce the final itinerary text. Unlike the task agents, a model
    /// failure here is fatal; there is nothing to degrade to.
    pub async fn run(&self, state: &TripState) -> Result<String, AiError> {
        let prompt = build_prompt(state);
        self.model
            .generate_text(vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)])
            .await
    }
}

fn truncate_exact(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

fn build_prompt(state: &TripState) -> String {
    let request = &state.trip_request;
    let mut prompt = format!(
        "Plan a trip to {} for {}.\nBudget: {}\nInterests: {}\n",
        request.destination, request.duration, request.budget, request.interests
    );
    if let Some(style) = request.travel_style.as_deref().filter(|s| !s.trim().is_empty()) {
        prompt.push_str(&format!("Travel style: {}\n", style));
    }
    if let Some(input) = request.user_input.as_deref().filter(|s| !s.trim().is_empty()) {
        prompt.push_str(&format!("Traveler note: {}\n", input));
    }

    // Missing upstream fields become empty sections rather than errors.
    for (heading, field) in [
        ("Destination research", &state.research),
        ("Budget analysis", &state.budget),
        ("Local insights", &state.local),
    ] {
        let summary = field.as_deref().unwrap_or("");
        prompt.push_str(&format!(
            "\n{}:\n{}\n",
            heading,
            truncate_exact(summary, SUMMARY_CHAR_LIMIT)
        ));
    }

    prompt
}

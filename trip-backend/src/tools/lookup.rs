//! Shared degrade path for every lookup tool: search first, LLM fallback
//! second, then label the result and compact it to the character budget.
//! Failures at any tier produce the best available text; nothing propagates
//! past the tool boundary.

use crate::tools::types::ToolContext;

/// Character budget applied to every tool result.
pub const MAX_TOOL_CHARS: usize = 200;

/// Truncate `text` to at most `limit` characters, cutting at a word boundary
/// when one exists inside the budget. Text already within the budget is
/// returned unchanged.
pub fn compact(text: &str, limit: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= limit {
        return text.to_string();
    }

    let head: String = chars[..limit].iter().collect();
    // Cut at the last whitespace inside the budget so no word is split.
    // A single word longer than the whole budget gets a hard cut.
    match head.rfind(char::is_whitespace) {
        Some(pos) => head[..pos].trim_end().to_string(),
        None => head,
    }
}

/// Run one grounded lookup: try the search capability, fall back to the
/// model, apply the label prefix, and compact to the budget. An empty label
/// leaves the content unprefixed.
pub async fn grounded_lookup(context: &ToolContext, label: &str, query: &str) -> String {
    let content = match context.search.search(query).await {
        Some(found) if !found.trim().is_empty() => found,
        _ => {
            log::debug!("[TOOL] Search empty for '{}', using model fallback", query);
            let instruction = format!("Provide concise, factual travel information: {}", query);
            match context.model.fallback_text(&instruction, None).await {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("[TOOL] Fallback failed for '{}': {}", query, e);
                    format!("No information available for: {}", query)
                }
            }
        }
    };

    let labeled = if label.is_empty() {
        content
    } else {
        format!("{}: {}", label, content)
    };

    compact(&labeled, MAX_TOOL_CHARS)
}

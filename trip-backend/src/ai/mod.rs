pub mod openrouter;
pub mod search;
#[cfg(test)]
pub mod testing;
pub mod types;

pub use openrouter::OpenRouterClient;
pub use search::{NoSearch, TavilySearch};
pub use types::{AiError, AiResponse, ToolCall, ToolHistoryEntry, ToolResponse};

use crate::tools::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Language-model capability. Implementations are injected into agents and
/// tools at construction time so tests can substitute a scripted model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Plain text generation, no tool negotiation.
    async fn generate_text(&self, messages: Vec<Message>) -> Result<String, AiError>;

    /// Generate a response with the given tools bound. `tool_history` carries
    /// an already-executed round of calls and their results so the model can
    /// synthesize a final answer from them.
    async fn generate_with_tools(
        &self,
        messages: Vec<Message>,
        tool_history: Vec<ToolHistoryEntry>,
        tools: Vec<ToolDefinition>,
    ) -> Result<AiResponse, AiError>;

    /// LLM-fallback capability used by the tool layer when the search
    /// provider yields nothing.
    async fn fallback_text(
        &self,
        instruction: &str,
        context: Option<&str>,
    ) -> Result<String, AiError>;
}

/// Web search capability. `None` (or empty text) signals "try fallback";
/// implementations never surface transport errors to callers.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Option<String>;
}

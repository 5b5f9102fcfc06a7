//! Test doubles for the capability traits, shared across unit tests.

use crate::ai::types::{AiError, AiResponse, ToolHistoryEntry};
use crate::ai::{ChatModel, Message, SearchProvider};
use crate::tools::ToolDefinition;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Scripted chat model: each call pops the next canned response.
pub struct MockModel {
    responses: Mutex<VecDeque<AiResponse>>,
    fallback_reply: String,
    /// When true, every call fails (simulates an unreachable provider).
    failing: bool,
    pub calls: Mutex<Vec<Vec<Message>>>,
}

impl Default for MockModel {
    fn default() -> Self {
        MockModel {
            responses: Mutex::new(VecDeque::new()),
            fallback_reply: "fallback answer".to_string(),
            failing: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockModel {
    pub fn scripted(responses: Vec<AiResponse>) -> Self {
        MockModel {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        MockModel {
            failing: true,
            ..Default::default()
        }
    }

    pub fn with_fallback_reply(mut self, reply: impl Into<String>) -> Self {
        self.fallback_reply = reply.into();
        self
    }

    fn next_response(&self) -> Result<AiResponse, AiError> {
        if self.failing {
            return Err(AiError::new("mock model unavailable"));
        }
        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| AiError::new("mock model script exhausted"))
    }

    /// The prompt text of the last recorded call.
    pub fn last_user_message(&self) -> Option<String> {
        self.calls
            .lock()
            .last()
            .and_then(|msgs| msgs.last())
            .map(|m| m.content.clone())
    }
}

#[async_trait]
impl ChatModel for MockModel {
    async fn generate_text(&self, messages: Vec<Message>) -> Result<String, AiError> {
        self.calls.lock().push(messages);
        self.next_response().map(|r| r.content)
    }

    async fn generate_with_tools(
        &self,
        messages: Vec<Message>,
        _tool_history: Vec<ToolHistoryEntry>,
        _tools: Vec<ToolDefinition>,
    ) -> Result<AiResponse, AiError> {
        self.calls.lock().push(messages);
        self.next_response()
    }

    async fn fallback_text(
        &self,
        _instruction: &str,
        _context: Option<&str>,
    ) -> Result<String, AiError> {
        if self.failing {
            return Err(AiError::new("mock model unavailable"));
        }
        Ok(self.fallback_reply.clone())
    }
}

/// Canned search provider that records every query.
pub struct MockSearch {
    result: Option<String>,
    pub queries: Mutex<Vec<String>>,
}

impl MockSearch {
    /// Always returns `None` (forces the fallback tier).
    pub fn empty() -> Self {
        MockSearch {
            result: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_result(result: impl Into<String>) -> Self {
        MockSearch {
            result: Some(result.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn last_query(&self) -> Option<String> {
        self.queries.lock().last().cloned()
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(&self, query: &str) -> Option<String> {
        self.queries.lock().push(query.to_string());
        self.result.clone()
    }
}

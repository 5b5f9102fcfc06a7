//! OpenRouter chat-completions client (OpenAI-compatible wire format).
//!
//! Supports native tool calling plus OpenRouter's fallback-model routing:
//! the request carries a `models` list and `"route": "fallback"` so the
//! provider retries the next model when the primary is unavailable.

use crate::ai::types::{AiError, AiResponse, ToolCall, ToolHistoryEntry, ToolResponse};
use crate::ai::{ChatModel, Message};
use crate::config::Config;
use crate::tools::ToolDefinition;
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const MAX_RETRIES: u32 = 3;
const BASE_DELAY_MS: u64 = 2000;

pub struct OpenRouterClient {
    client: Client,
    auth_headers: header::HeaderMap,
    endpoint: String,
    model: String,
    fallback_models: Vec<String>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ApiMessage>,
    /// Fallback model list, honored when `route` is "fallback".
    #[serde(skip_serializing_if = "Vec::is_empty")]
    models: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<String>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ApiTool>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ApiMessage {
    fn plain(role: &str, content: String) -> Self {
        ApiMessage {
            role: role.to_string(),
            content: Some(content),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiToolCall {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    pub function: ApiFunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFunctionCall {
    pub name: String,
    /// The OpenAI wire format carries arguments as a JSON-encoded string.
    pub arguments: String,
}

#[derive(Debug, Serialize)]
struct ApiTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: ApiToolFunction,
}

#[derive(Debug, Serialize)]
struct ApiToolFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ApiToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl OpenRouterClient {
    pub fn new(
        api_key: &str,
        endpoint: Option<&str>,
        model: Option<&str>,
    ) -> Result<Self, String> {
        let mut auth_headers = header::HeaderMap::new();
        auth_headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let auth_value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| format!("Invalid API key format: {}", e))?;
        auth_headers.insert(header::AUTHORIZATION, auth_value);

        let base = endpoint.unwrap_or(crate::config::DEFAULT_API_URL);

        Ok(Self {
            client: crate::http::shared_client().clone(),
            auth_headers,
            endpoint: format!("{}/chat/completions", base.trim_end_matches('/')),
            model: model.unwrap_or(crate::config::DEFAULT_MODEL).to_string(),
            fallback_models: vec![],
            max_tokens: 2000,
            temperature: 0.7,
        })
    }

    /// Build a client from the application config. Fails when no API key is
    /// configured; the caller decides whether that is fatal.
    pub fn from_config(config: &Config) -> Result<Self, String> {
        let api_key = config
            .openrouter_api_key
            .as_deref()
            .ok_or_else(|| "OPENROUTER_API_KEY is not set".to_string())?;
        let mut client = Self::new(api_key, Some(&config.api_url), Some(&config.model))?;
        client.fallback_models = config.fallback_models.clone();
        client.max_tokens = config.max_tokens;
        client.temperature = config.temperature;
        Ok(client)
    }

    fn build_request(&self, messages: Vec<ApiMessage>, tools: Option<Vec<ApiTool>>) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages,
            models: self.fallback_models.clone(),
            route: if self.fallback_models.is_empty() {
                None
            } else {
                Some("fallback".to_string())
            },
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            tools,
        }
    }

    /// POST a chat request with retry on transient failures.
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, AiError> {
        let mut last_error: Option<AiError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay_ms = BASE_DELAY_MS * (1 << (attempt - 1));
                log::warn!(
                    "[OPENROUTER] Retry attempt {}/{} after {}ms delay",
                    attempt,
                    MAX_RETRIES,
                    delay_ms
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }

            let request_result = self
                .client
                .post(&self.endpoint)
                .headers(self.auth_headers.clone())
                .timeout(Duration::from_secs(300))
                .json(request)
                .send()
                .await;

            let response = match request_result {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(AiError::new(format!("OpenRouter request failed: {}", e)));
                    if attempt < MAX_RETRIES {
                        continue;
                    }
                    return Err(last_error.unwrap_or_else(|| AiError::new("request failed")));
                }
            };

            let status = response.status();
            let status_code = status.as_u16();
            let is_retryable = matches!(status_code, 429 | 502 | 503 | 504);

            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();

                if is_retryable && attempt < MAX_RETRIES {
                    log::warn!(
                        "[OPENROUTER] Received retryable status {} (attempt {}), will retry",
                        status,
                        attempt + 1
                    );
                    last_error = Some(AiError::with_status(error_text, status_code));
                    continue;
                }

                if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(&error_text) {
                    return Err(AiError::with_status(error_response.error.message, status_code));
                }
                return Err(AiError::with_status(
                    format!("OpenRouter returned error status {}: {}", status, error_text),
                    status_code,
                ));
            }

            return response
                .json()
                .await
                .map_err(|e| AiError::new(format!("Failed to parse OpenRouter response: {}", e)));
        }

        Err(last_error.unwrap_or_else(|| AiError::new("Max retries exceeded")))
    }

    fn api_tools(tools: Vec<ToolDefinition>) -> Option<Vec<ApiTool>> {
        if tools.is_empty() {
            return None;
        }
        Some(
            tools
                .into_iter()
                .map(|t| ApiTool {
                    tool_type: "function".to_string(),
                    function: ApiToolFunction {
                        name: t.name,
                        description: t.description,
                        parameters: serde_json::to_value(t.input_schema).unwrap_or_default(),
                    },
                })
                .collect(),
        )
    }

    /// Build the assistant + tool messages that carry one executed round of
    /// tool calls back to the model, correlated by call id.
    pub fn build_tool_result_messages(
        tool_calls: &[ToolCall],
        tool_responses: &[ToolResponse],
    ) -> Vec<ApiMessage> {
        let api_tool_calls: Vec<ApiToolCall> = tool_calls
            .iter()
            .map(|tc| ApiToolCall {
                id: Some(tc.id.clone()),
                call_type: "function".to_string(),
                function: ApiFunctionCall {
                    name: tc.name.clone(),
                    arguments: tc.arguments.to_string(),
                },
            })
            .collect();

        let mut messages = vec![ApiMessage {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(api_tool_calls),
            tool_call_id: None,
        }];

        for response in tool_responses {
            messages.push(ApiMessage {
                role: "tool".to_string(),
                content: Some(response.content.clone()),
                tool_calls: None,
                tool_call_id: Some(response.tool_call_id.clone()),
            });
        }

        messages
    }

    fn parse_tool_calls(calls: Vec<ApiToolCall>) -> Vec<ToolCall> {
        calls
            .into_iter()
            .map(|call| {
                // Malformed argument payloads degrade to an empty object so
                // the tool layer can still run with its defaults.
                let arguments = serde_json::from_str(&call.function.arguments)
                    .unwrap_or_else(|_| serde_json::json!({}));
                ToolCall {
                    id: call
                        .id
                        .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4())),
                    name: call.function.name,
                    arguments,
                }
            })
            .collect()
    }
}

#[async_trait]
impl ChatModel for OpenRouterClient {
    async fn generate_text(&self, messages: Vec<Message>) -> Result<String, AiError> {
        let api_messages = messages
            .into_iter()
            .map(|m| ApiMessage::plain(m.role.as_str(), m.content))
            .collect();

        let request = self.build_request(api_messages, None);
        let response = self.send_chat(&request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(AiError::new("OpenRouter returned no content"));
        }
        Ok(content)
    }

    async fn generate_with_tools(
        &self,
        messages: Vec<Message>,
        tool_history: Vec<ToolHistoryEntry>,
        tools: Vec<ToolDefinition>,
    ) -> Result<AiResponse, AiError> {
        let mut api_messages: Vec<ApiMessage> = messages
            .into_iter()
            .map(|m| ApiMessage::plain(m.role.as_str(), m.content))
            .collect();

        for entry in &tool_history {
            api_messages.extend(Self::build_tool_result_messages(
                &entry.tool_calls,
                &entry.tool_responses,
            ));
        }

        let request = self.build_request(api_messages, Self::api_tools(tools));
        let response = self.send_chat(&request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AiError::new("OpenRouter returned no choices"))?;

        let tool_calls = Self::parse_tool_calls(choice.message.tool_calls.unwrap_or_default());
        let stop_reason = if tool_calls.is_empty() {
            choice.finish_reason
        } else {
            Some("tool_use".to_string())
        };

        Ok(AiResponse {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            stop_reason,
        })
    }

    async fn fallback_text(
        &self,
        instruction: &str,
        context: Option<&str>,
    ) -> Result<String, AiError> {
        let mut user = instruction.to_string();
        if let Some(ctx) = context {
            user.push_str("\n\nContext:\n");
            user.push_str(ctx);
        }
        self.generate_text(vec![
            Message::system(
                "You are a travel research assistant. Answer in one or two short, \
                 factual sentences.",
            ),
            Message::user(user),
        ])
        .await
    }
}

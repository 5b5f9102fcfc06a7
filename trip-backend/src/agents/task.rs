//! Shared tool-calling protocol for the research, budget, and local agents.
//!
//! One model call with tools bound, execution of any requested calls with an
//! audit record per call, then one synthesis call over the results. A model
//! failure degrades to an empty owned field so the other branches still
//! contribute to the final plan.

use crate::agents::AgentRole;
use crate::ai::types::{ToolHistoryEntry, ToolResponse};
use crate::ai::{ChatModel, Message};
use crate::models::{StateUpdate, ToolCallRecord, TripRequest};
use crate::retrieval::LocalGuideRetriever;
use crate::tools::{ToolContext, ToolRegistry};
use std::sync::Arc;

const RETRIEVAL_TOP_K: usize = 3;

pub struct TaskAgent {
    role: AgentRole,
    model: Arc<dyn ChatModel>,
    registry: Arc<ToolRegistry>,
    tool_context: ToolContext,
    retriever: Option<Arc<LocalGuideRetriever>>,
}

impl TaskAgent {
    pub fn new(
        role: AgentRole,
        model: Arc<dyn ChatModel>,
        registry: Arc<ToolRegistry>,
        tool_context: ToolContext,
    ) -> Self {
        TaskAgent {
            role,
            model,
            registry,
            tool_context,
            retriever: None,
        }
    }

    /// Attach guide retrieval. Only meaningful for the local role; other
    /// roles never query it.
    pub fn with_retriever(mut self, retriever: Arc<LocalGuideRetriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    /// Run one turn of the protocol and return this agent's partial update,
    /// carrying the conversation it produced alongside the owned field.
    pub async fn run(&self, request: &TripRequest) -> StateUpdate {
        let grounding = self.gather_grounding(request).await;
        let user_message = Message::user(self.role.user_prompt(request, grounding.as_deref()));
        let messages = vec![Message::system(self.role.system_prompt()), user_message.clone()];
        let tools = self.registry.definitions_for(self.role.allowed_tools());

        let response = match self
            .model
            .generate_with_tools(messages.clone(), vec![], tools.clone())
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("[AGENT] {} model call failed: {}", self.role.name(), e);
                return self.role.state_update(String::new(), vec![]);
            }
        };

        if !response.has_tool_calls() {
            let transcript = vec![user_message, Message::assistant(response.content.clone())];
            return self
                .role
                .state_update(response.content, vec![])
                .with_messages(transcript);
        }

        let mut transcript = vec![user_message];
        let mut records = Vec::with_capacity(response.tool_calls.len());
        let mut tool_responses = Vec::with_capacity(response.tool_calls.len());
        for call in &response.tool_calls {
            log::info!("[AGENT] {} calling tool '{}'", self.role.name(), call.name);
            records.push(ToolCallRecord {
                agent: self.role.name().to_string(),
                tool: call.name.clone(),
                args: call.arguments.clone(),
            });

            let result = self
                .registry
                .execute(&call.name, call.arguments.clone(), &self.tool_context)
                .await;
            transcript.push(Message::assistant(result.content.clone()));
            tool_responses.push(if result.success {
                ToolResponse::success(call.id.clone(), result.content)
            } else {
                ToolResponse::error(call.id.clone(), result.content)
            });
        }

        let history = vec![ToolHistoryEntry::new(
            response.tool_calls.clone(),
            tool_responses,
        )];

        // Second turn synthesizes the tool outputs into one answer. Any tool
        // calls the model requests here are not executed.
        match self.model.generate_with_tools(messages, history, tools).await {
            Ok(synthesis) => {
                transcript.push(Message::assistant(synthesis.content.clone()));
                self.role
                    .state_update(synthesis.content, records)
                    .with_messages(transcript)
            }
            Err(e) => {
                log::warn!(
                    "[AGENT] {} synthesis call failed: {}",
                    self.role.name(),
                    e
                );
                self.role
                    .state_update(String::new(), records)
                    .with_messages(transcript)
            }
        }
    }

    async fn gather_grounding(&self, request: &TripRequest) -> Option<String> {
        if self.role != AgentRole::Local {
            return None;
        }
        let retriever = self.retriever.as_ref()?;
        let hits = retriever
            .retrieve(&request.destination, &request.interests, RETRIEVAL_TOP_K)
            .await;
        if hits.is_empty() {
            return None;
        }
        Some(
            hits.iter()
                .map(|hit| hit.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{MockModel, MockSearch};
    use crate::ai::types::{AiResponse, ToolCall};
    use crate::retrieval::GuideDocument;
    use crate::tools::create_default_registry;
    use serde_json::json;

    fn agent_with_model(role: AgentRole, model: MockModel) -> TaskAgent {
        let model = Arc::new(model);
        let search = Arc::new(MockSearch::with_result("looked up fact"));
        let context = ToolContext::new(search, model.clone());
        TaskAgent::new(role, model, Arc::new(create_default_registry()), context)
    }

    #[tokio::test]
    async fn test_direct_answer_without_tools() {
        let model = MockModel::scripted(vec![AiResponse::text("Rome is walkable.".to_string())]);
        let agent = agent_with_model(AgentRole::Research, model);

        let update = agent.run(&TripRequest::new("Rome", "3 days")).await;
        assert_eq!(update.research.as_deref(), Some("Rome is walkable."));
        assert!(update.tool_calls.is_empty());
    }

    #[tokio::test]
    async fn test_tool_round_produces_records_and_synthesis() {
        let model = MockModel::scripted(vec![
            AiResponse::with_tools(
                String::new(),
                vec![ToolCall {
                    id: "call_1".to_string(),
                    name: "essential_info".to_string(),
                    arguments: json!({"destination": "Rome"}),
                }],
            ),
            AiResponse::text("Synthesized research.".to_string()),
        ]);
        let agent = agent_with_model(AgentRole::Research, model);

        let update = agent.run(&TripRequest::new("Rome", "3 days")).await;

        assert_eq!(update.research.as_deref(), Some("Synthesized research."));
        assert_eq!(update.tool_calls.len(), 1);
        assert_eq!(update.tool_calls[0].agent, "research");
        assert_eq!(update.tool_calls[0].tool, "essential_info");
        assert_eq!(update.tool_calls[0].args, json!({"destination": "Rome"}));

        // Conversation: user prompt, tool output, synthesis.
        assert_eq!(update.messages.len(), 3);
        assert!(update.messages[0].content.contains("Rome"));
        assert!(update.messages[1].content.contains("looked up fact"));
        assert_eq!(update.messages[2].content, "Synthesized research.");
    }

    #[tokio::test]
    async fn test_direct_answer_carries_conversation() {
        let model = MockModel::scripted(vec![AiResponse::text("Rome is walkable.".to_string())]);
        let agent = agent_with_model(AgentRole::Research, model);

        let update = agent.run(&TripRequest::new("Rome", "3 days")).await;
        assert_eq!(update.messages.len(), 2);
        assert!(update.messages[0].content.contains("Rome"));
        assert_eq!(update.messages[1].content, "Rome is walkable.");
    }

    #[tokio::test]
    async fn test_model_failure_degrades_to_empty_field() {
        let agent = agent_with_model(AgentRole::Budget, MockModel::failing());

        let update = agent.run(&TripRequest::new("Rome", "3 days")).await;
        assert_eq!(update.budget.as_deref(), Some(""));
        assert!(update.research.is_none());
        assert!(update.tool_calls.is_empty());
    }

    #[tokio::test]
    async fn test_local_agent_injects_retrieved_grounding() {
        let model = MockModel::scripted(vec![AiResponse::text("local tips".to_string())]);
        let model = Arc::new(model);
        let search = Arc::new(MockSearch::empty());
        let context = ToolContext::new(search, model.clone());

        let retriever = LocalGuideRetriever::from_documents(
            vec![GuideDocument {
                city: "Tokyo".to_string(),
                interests: vec!["food".to_string()],
                description: "Tsukiji outer market.".to_string(),
                source: "local_guides".to_string(),
            }],
            true,
        );
        let agent = TaskAgent::new(
            AgentRole::Local,
            model.clone(),
            Arc::new(create_default_registry()),
            context,
        )
        .with_retriever(Arc::new(retriever));

        let request = TripRequest::new("Tokyo, Japan", "7 days").with_interests("food, culture");
        let update = agent.run(&request).await;

        assert_eq!(update.local.as_deref(), Some("local tips"));
        let prompt = model.last_user_message().unwrap();
        assert!(prompt.contains("Curated guide notes"));
        assert!(prompt.contains("Tsukiji outer market."));
    }

    #[tokio::test]
    async fn test_research_agent_never_queries_retriever() {
        let model = MockModel::scripted(vec![AiResponse::text("facts".to_string())]);
        let model = Arc::new(model);
        let context = ToolContext::new(Arc::new(MockSearch::empty()), model.clone());

        let retriever = LocalGuideRetriever::from_documents(
            vec![GuideDocument {
                city: "Rome".to_string(),
                interests: vec![],
                description: "Trastevere at dusk.".to_string(),
                source: "local_guides".to_string(),
            }],
            true,
        );
        let agent = TaskAgent::new(
            AgentRole::Research,
            model.clone(),
            Arc::new(create_default_registry()),
            context,
        )
        .with_retriever(Arc::new(retriever));

        let update = agent.run(&TripRequest::new("Rome", "3 days")).await;
        assert!(update.research.is_some());
        assert!(!model.last_user_message().unwrap().contains("Curated guide notes"));
    }
}

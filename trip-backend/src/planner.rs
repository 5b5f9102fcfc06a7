//! Entry point: wires the model, search, tools, retrieval, and graph
//! together and exposes `run` to the transport layer.

use crate::agents::{AgentRole, ItineraryAgent, TaskAgent};
use crate::ai::types::AiError;
use crate::ai::{ChatModel, OpenRouterClient, SearchProvider};
use crate::config::Config;
use crate::graph::TripGraph;
use crate::models::{PlanOutcome, TripRequest, TripState};
use crate::retrieval::LocalGuideRetriever;
use crate::tools::{create_default_registry, ToolContext, ToolRegistry};
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
pub enum PlannerError {
    /// Startup misconfiguration, e.g. a missing API key. Fatal.
    Config(String),
    /// The synthesis model call failed after the degrade tiers ran out.
    Model(AiError),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::Config(msg) => write!(f, "Configuration error: {}", msg),
            PlannerError::Model(e) => write!(f, "{}", e.friendly_message()),
        }
    }
}

impl std::error::Error for PlannerError {}

impl From<AiError> for PlannerError {
    fn from(e: AiError) -> Self {
        PlannerError::Model(e)
    }
}

pub struct TripPlanner {
    graph: TripGraph,
}

impl TripPlanner {
    /// Build a planner from configuration. Fails only on misconfiguration;
    /// a missing guide corpus or search key degrades instead.
    pub fn new(config: &Config, search: Arc<dyn SearchProvider>) -> Result<Self, PlannerError> {
        let model: Arc<dyn ChatModel> =
            Arc::new(OpenRouterClient::from_config(config).map_err(PlannerError::Config)?);
        let retriever = Arc::new(LocalGuideRetriever::load(
            &config.guides_path,
            config.retrieval_enabled,
        ));
        Ok(Self::from_parts(
            model,
            search,
            Arc::new(create_default_registry()),
            retriever,
        ))
    }

    /// Assemble a planner from already-built capabilities. Used by tests
    /// and callers that substitute their own model or corpus.
    pub fn from_parts(
        model: Arc<dyn ChatModel>,
        search: Arc<dyn SearchProvider>,
        registry: Arc<ToolRegistry>,
        retriever: Arc<LocalGuideRetriever>,
    ) -> Self {
        let tool_context = ToolContext::new(search, model.clone());

        let task = |role: AgentRole| {
            TaskAgent::new(role, model.clone(), registry.clone(), tool_context.clone())
        };
        let graph = TripGraph::new(
            task(AgentRole::Research),
            task(AgentRole::Budget),
            task(AgentRole::Local).with_retriever(retriever),
            ItineraryAgent::new(model.clone()),
        );

        TripPlanner { graph }
    }

    /// Plan one trip: run the graph and hand back the itinerary plus the
    /// full tool-call audit trail.
    pub async fn run(&self, request: TripRequest) -> Result<PlanOutcome, PlannerError> {
        log::info!(
            "[PLANNER] Planning trip to '{}' for {}",
            request.destination,
            request.duration
        );
        let state = self.graph.invoke(TripState::new(request)).await?;

        Ok(PlanOutcome {
            itinerary: state.final_itinerary.unwrap_or_default(),
            tool_calls: state.tool_calls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{MockModel, MockSearch};
    use crate::ai::types::{AiResponse, ToolCall};
    use crate::retrieval::GuideDocument;
    use serde_json::json;

    fn planner_with_model(model: MockModel, search: MockSearch) -> TripPlanner {
        let model = Arc::new(model);
        TripPlanner::from_parts(
            model,
            Arc::new(search),
            Arc::new(create_default_registry()),
            Arc::new(LocalGuideRetriever::from_documents(vec![], true)),
        )
    }

    #[tokio::test]
    async fn test_new_requires_api_key() {
        let config = Config::default_for_tests();
        let result = TripPlanner::new(&config, Arc::new(MockSearch::empty()));
        assert!(matches!(result, Err(PlannerError::Config(_))));
    }

    #[tokio::test]
    async fn test_run_returns_itinerary_and_audit_trail() {
        // Three direct task answers, then the itinerary synthesis.
        let model = MockModel::scripted(vec![
            AiResponse::text("research".to_string()),
            AiResponse::text("budget".to_string()),
            AiResponse::text("local".to_string()),
            AiResponse::text("Day 1: explore.".to_string()),
        ]);
        let planner = planner_with_model(model, MockSearch::empty());

        let outcome = planner
            .run(TripRequest::new("Lisbon", "5 days"))
            .await
            .unwrap();
        assert_eq!(outcome.itinerary, "Day 1: explore.");
        assert!(outcome.tool_calls.is_empty());
    }

    #[tokio::test]
    async fn test_run_with_tool_calls_and_search_fallback() {
        // The research agent requests essential_info; search is absent, so
        // the tool's content comes from the model fallback tier.
        let model = MockModel::scripted(vec![
            AiResponse::with_tools(
                String::new(),
                vec![ToolCall {
                    id: "call_1".to_string(),
                    name: "essential_info".to_string(),
                    arguments: json!({"destination": "Lisbon"}),
                }],
            ),
            AiResponse::text("research synthesis".to_string()),
            AiResponse::text("budget".to_string()),
            AiResponse::text("local".to_string()),
            AiResponse::text("final plan".to_string()),
        ])
        .with_fallback_reply("fallback facts about Lisbon");
        let planner = planner_with_model(model, MockSearch::empty());

        let outcome = planner
            .run(TripRequest::new("Lisbon", "5 days"))
            .await
            .unwrap();

        assert_eq!(outcome.itinerary, "final plan");
        assert_eq!(outcome.tool_calls.len(), 1);
        assert_eq!(outcome.tool_calls[0].agent, "research");
        assert_eq!(outcome.tool_calls[0].tool, "essential_info");
    }

    #[tokio::test]
    async fn test_tokyo_corpus_grounds_local_agent() {
        let corpus = vec![
            GuideDocument {
                city: "Tokyo".to_string(),
                interests: vec!["food".to_string(), "culture".to_string()],
                description: "Tsukiji outer market and a tea ceremony.".to_string(),
                source: "local_guides".to_string(),
            },
            GuideDocument {
                city: "Tokyo".to_string(),
                interests: vec!["art".to_string()],
                description: "TeamLab Planets.".to_string(),
                source: "local_guides".to_string(),
            },
        ];
        let model = Arc::new(MockModel::scripted(vec![
            AiResponse::text("research".to_string()),
            AiResponse::text("budget".to_string()),
            AiResponse::text("local".to_string()),
            AiResponse::text("Day 1: Tsukiji.".to_string()),
        ]));
        let planner = TripPlanner::from_parts(
            model.clone(),
            Arc::new(MockSearch::empty()),
            Arc::new(create_default_registry()),
            Arc::new(LocalGuideRetriever::from_documents(corpus, true)),
        );

        let request =
            TripRequest::new("Tokyo, Japan", "7 days").with_interests("food, culture");
        let outcome = planner.run(request).await.unwrap();

        assert_eq!(outcome.itinerary, "Day 1: Tsukiji.");
        // Both Tokyo entries were retrievable; the local agent's prompt
        // carried the curated grounding.
        let grounded = model
            .calls
            .lock()
            .iter()
            .flat_map(|msgs| msgs.iter())
            .any(|m| m.content.contains("Tsukiji outer market"));
        assert!(grounded);
    }
}

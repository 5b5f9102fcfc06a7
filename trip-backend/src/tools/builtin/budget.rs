//! Budget tools: daily cost basics and attraction pricing.

use crate::tools::lookup::grounded_lookup;
use crate::tools::registry::Tool;
use crate::tools::types::{PropertySchema, ToolContext, ToolDefinition, ToolInputSchema, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

const DEFAULT_ATTRACTIONS: &str = "popular attractions";

/// Typical daily costs for a destination.
pub struct BudgetBasicsTool {
    definition: ToolDefinition,
}

#[derive(Debug, Deserialize, Default)]
struct BudgetBasicsParams {
    #[serde(default)]
    destination: String,
    #[serde(default)]
    duration: Option<String>,
}

impl BudgetBasicsTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "destination".to_string(),
            PropertySchema::string("The city or country to look up"),
        );
        properties.insert(
            "duration".to_string(),
            PropertySchema::string("Trip length, e.g. '7 days' (optional)"),
        );

        Self {
            definition: ToolDefinition {
                name: "budget_basics".to_string(),
                description: "Get typical travel costs for a destination: accommodation, food, \
                              and local transport."
                    .to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: vec!["destination".to_string()],
                },
            },
        }
    }
}

#[async_trait]
impl Tool for BudgetBasicsTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: BudgetBasicsParams = serde_json::from_value(params).unwrap_or_default();
        let duration = params.duration.unwrap_or_else(|| "a trip".to_string());
        let query = format!(
            "cost of travel in {} for {} accommodation food transport prices",
            params.destination, duration
        );
        ToolResult::success(grounded_lookup(context, "Budget basics", &query).await)
    }
}

/// Ticket prices for specific attractions.
pub struct AttractionPricesTool {
    definition: ToolDefinition,
}

#[derive(Debug, Deserialize, Default)]
struct AttractionPricesParams {
    #[serde(default)]
    destination: String,
    #[serde(default)]
    attractions: Option<String>,
}

impl AttractionPricesTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "destination".to_string(),
            PropertySchema::string("The city to look up"),
        );
        properties.insert(
            "attractions".to_string(),
            PropertySchema::string("Comma-separated attraction names (optional)")
                .with_default(json!(DEFAULT_ATTRACTIONS)),
        );

        Self {
            definition: ToolDefinition {
                name: "attraction_prices".to_string(),
                description: "Get entrance and ticket prices for attractions in a destination."
                    .to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: vec!["destination".to_string()],
                },
            },
        }
    }
}

#[async_trait]
impl Tool for AttractionPricesTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: AttractionPricesParams = serde_json::from_value(params).unwrap_or_default();
        let attractions = params
            .attractions
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ATTRACTIONS.to_string());
        let query = format!(
            "ticket prices for {} in {}",
            attractions, params.destination
        );
        ToolResult::success(grounded_lookup(context, "Attraction prices", &query).await)
    }
}

//! Logistics tools: travel times, packing, and day structuring.

use crate::tools::lookup::grounded_lookup;
use crate::tools::registry::Tool;
use crate::tools::types::{PropertySchema, ToolContext, ToolDefinition, ToolInputSchema, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

const DEFAULT_MODE: &str = "public";

/// Travel time between two points by a given mode.
pub struct TravelTimeTool {
    definition: ToolDefinition,
}

#[derive(Debug, Deserialize, Default)]
struct TravelTimeParams {
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
    #[serde(default)]
    mode: Option<String>,
}

impl TravelTimeTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "from".to_string(),
            PropertySchema::string("Starting point"),
        );
        properties.insert("to".to_string(), PropertySchema::string("Destination point"));
        properties.insert(
            "mode".to_string(),
            PropertySchema::string("Transport mode: public, walking, or taxi (optional)")
                .with_default(json!(DEFAULT_MODE)),
        );

        Self {
            definition: ToolDefinition {
                name: "travel_time".to_string(),
                description: "Estimate travel time between two places by a given transport mode."
                    .to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: vec!["from".to_string(), "to".to_string()],
                },
            },
        }
    }
}

#[async_trait]
impl Tool for TravelTimeTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: TravelTimeParams = serde_json::from_value(params).unwrap_or_default();
        let mode = params
            .mode
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODE.to_string());
        let query = format!(
            "travel time from {} to {} by {} transport",
            params.from, params.to, mode
        );
        ToolResult::success(grounded_lookup(context, "Travel time", &query).await)
    }
}

/// Packing suggestions for a destination and season.
pub struct PackingListTool {
    definition: ToolDefinition,
}

#[derive(Debug, Deserialize, Default)]
struct PackingParams {
    #[serde(default)]
    destination: String,
    #[serde(default)]
    season: Option<String>,
}

impl PackingListTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "destination".to_string(),
            PropertySchema::string("The destination to pack for"),
        );
        properties.insert(
            "season".to_string(),
            PropertySchema::string("Season or month of travel (optional)"),
        );

        Self {
            definition: ToolDefinition {
                name: "packing_list".to_string(),
                description: "Get packing suggestions for a destination, adjusted for the season."
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
impl Tool for PackingListTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: PackingParams = serde_json::from_value(params).unwrap_or_default();
        let query = match params.season.filter(|s| !s.trim().is_empty()) {
            Some(season) => format!("what to pack for {} in {}", params.destination, season),
            None => format!("what to pack for a trip to {}", params.destination),
        };
        ToolResult::success(grounded_lookup(context, "Packing list", &query).await)
    }
}

/// A rough structure for one day in a destination.
pub struct DayPlanTool {
    definition: ToolDefinition,
}

#[derive(Debug, Deserialize, Default)]
struct DayPlanParams {
    #[serde(default)]
    destination: String,
    #[serde(default)]
    focus: Option<String>,
}

impl DayPlanTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "destination".to_string(),
            PropertySchema::string("The city the day is spent in"),
        );
        properties.insert(
            "focus".to_string(),
            PropertySchema::string("Theme for the day, e.g. 'museums' (optional)"),
        );

        Self {
            definition: ToolDefinition {
                name: "day_plan".to_string(),
                description: "Sketch a morning-afternoon-evening structure for one day in a \
                              destination."
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
impl Tool for DayPlanTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: DayPlanParams = serde_json::from_value(params).unwrap_or_default();
        let query = match params.focus.filter(|f| !f.trim().is_empty()) {
            Some(focus) => format!(
                "one day itinerary in {} focused on {} morning afternoon evening",
                params.destination, focus
            ),
            None => format!(
                "one day itinerary in {} morning afternoon evening",
                params.destination
            ),
        };
        ToolResult::success(grounded_lookup(context, "Day plan", &query).await)
    }
}

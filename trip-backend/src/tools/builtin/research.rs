//! General research tools: essentials, weather, visas.

use crate::tools::lookup::grounded_lookup;
use crate::tools::registry::Tool;
use crate::tools::types::{PropertySchema, ToolContext, ToolDefinition, ToolInputSchema, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Default)]
struct DestinationParams {
    #[serde(default)]
    destination: String,
}

fn destination_schema(description: &str) -> ToolInputSchema {
    let mut properties = HashMap::new();
    properties.insert(
        "destination".to_string(),
        PropertySchema::string(description),
    );
    ToolInputSchema {
        schema_type: "object".to_string(),
        properties,
        required: vec!["destination".to_string()],
    }
}

fn parse_destination(params: Value) -> String {
    let params: DestinationParams = serde_json::from_value(params).unwrap_or_default();
    params.destination
}

/// Language, currency, safety and other essentials for a destination.
pub struct EssentialInfoTool {
    definition: ToolDefinition,
}

impl EssentialInfoTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition {
                name: "essential_info".to_string(),
                description: "Get essential travel information for a destination: language, \
                              currency, safety, and getting around."
                    .to_string(),
                input_schema: destination_schema("The city or country to look up"),
            },
        }
    }
}

#[async_trait]
impl Tool for EssentialInfoTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let destination = parse_destination(params);
        let query = format!(
            "essential travel information for {} language currency safety transport",
            destination
        );
        ToolResult::success(grounded_lookup(context, "Essential info", &query).await)
    }
}

/// Climate and best season to visit.
pub struct WeatherInfoTool {
    definition: ToolDefinition,
}

impl WeatherInfoTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition {
                name: "weather_info".to_string(),
                description: "Get typical weather and the best time of year to visit a destination."
                    .to_string(),
                input_schema: destination_schema("The city or country to look up"),
            },
        }
    }
}

#[async_trait]
impl Tool for WeatherInfoTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let destination = parse_destination(params);
        let query = format!("weather in {} climate best time to visit", destination);
        ToolResult::success(grounded_lookup(context, "Weather", &query).await)
    }
}

/// Entry and visa requirements.
pub struct VisaInfoTool {
    definition: ToolDefinition,
}

impl VisaInfoTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition {
                name: "visa_info".to_string(),
                description: "Get visa and entry requirements for traveling to a destination."
                    .to_string(),
                input_schema: destination_schema("The destination country or city"),
            },
        }
    }
}

#[async_trait]
impl Tool for VisaInfoTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let destination = parse_destination(params);
        let query = format!("visa requirements for traveling to {}", destination);
        ToolResult::success(grounded_lookup(context, "Visa requirements", &query).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{MockModel, MockSearch};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_weather_tool_embeds_destination() {
        let search = Arc::new(MockSearch::with_result("rainy in spring"));
        let context = ToolContext::new(search.clone(), Arc::new(MockModel::default()));

        let tool = WeatherInfoTool::new();
        let result = tool
            .execute(serde_json::json!({"destination": "Bergen"}), &context)
            .await;

        assert!(result.success);
        assert_eq!(result.content, "Weather: rainy in spring");
        assert!(search.last_query().unwrap().contains("Bergen"));
    }

    #[tokio::test]
    async fn test_tool_tolerates_malformed_params() {
        let context = ToolContext::new(
            Arc::new(MockSearch::with_result("info")),
            Arc::new(MockModel::default()),
        );

        let tool = VisaInfoTool::new();
        let result = tool.execute(serde_json::json!("not an object"), &context).await;
        assert!(result.success);
    }

    #[test]
    fn test_definitions_require_destination() {
        for def in [
            EssentialInfoTool::new().definition(),
            WeatherInfoTool::new().definition(),
            VisaInfoTool::new().definition(),
        ] {
            assert!(def.input_schema.required.contains(&"destination".to_string()));
        }
    }
}

//! Local-experience tools: food, customs, and off-the-path spots.

use crate::tools::lookup::grounded_lookup;
use crate::tools::registry::Tool;
use crate::tools::types::{PropertySchema, ToolContext, ToolDefinition, ToolInputSchema, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

const DEFAULT_INTERESTS: &str = "local culture";

#[derive(Debug, Deserialize, Default)]
struct LocalParams {
    #[serde(default)]
    destination: String,
    #[serde(default)]
    interests: Option<String>,
}

fn local_schema(interests_description: &str) -> ToolInputSchema {
    let mut properties = HashMap::new();
    properties.insert(
        "destination".to_string(),
        PropertySchema::string("The city to look up"),
    );
    properties.insert(
        "interests".to_string(),
        PropertySchema::string(interests_description).with_default(json!(DEFAULT_INTERESTS)),
    );
    ToolInputSchema {
        schema_type: "object".to_string(),
        properties,
        required: vec!["destination".to_string()],
    }
}

fn parse_local(params: Value) -> (String, String) {
    let params: LocalParams = serde_json::from_value(params).unwrap_or_default();
    let interests = params
        .interests
        .filter(|i| !i.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_INTERESTS.to_string());
    (params.destination, interests)
}

/// Local food and experiences matched to the traveler's interests.
pub struct LocalFlavorTool {
    definition: ToolDefinition,
}

impl LocalFlavorTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition {
                name: "local_flavor".to_string(),
                description: "Get local food, markets, and authentic experiences in a \
                              destination, matched to the traveler's interests."
                    .to_string(),
                input_schema: local_schema("Traveler interests, e.g. 'food, art' (optional)"),
            },
        }
    }
}

#[async_trait]
impl Tool for LocalFlavorTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let (destination, interests) = parse_local(params);
        let query = format!(
            "local food and authentic experiences in {} for travelers interested in {}",
            destination, interests
        );
        ToolResult::success(grounded_lookup(context, "Local flavor", &query).await)
    }
}

/// Etiquette, customs, and tipping norms.
pub struct LocalCustomsTool {
    definition: ToolDefinition,
}

impl LocalCustomsTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "destination".to_string(),
            PropertySchema::string("The city or country to look up"),
        );

        Self {
            definition: ToolDefinition {
                name: "local_customs".to_string(),
                description: "Get etiquette, customs, and tipping norms travelers should know \
                              for a destination."
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
impl Tool for LocalCustomsTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let (destination, _) = parse_local(params);
        let query = format!(
            "local customs etiquette and tipping norms in {}",
            destination
        );
        ToolResult::success(grounded_lookup(context, "Local customs", &query).await)
    }
}

/// Lesser-known spots beyond the usual tourist circuit.
pub struct HiddenGemsTool {
    definition: ToolDefinition,
}

impl HiddenGemsTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition {
                name: "hidden_gems".to_string(),
                description: "Get lesser-known places and hidden gems in a destination that \
                              match the traveler's interests."
                    .to_string(),
                input_schema: local_schema("Traveler interests to match spots against (optional)"),
            },
        }
    }
}

#[async_trait]
impl Tool for HiddenGemsTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let (destination, interests) = parse_local(params);
        let query = format!(
            "hidden gems and lesser-known places in {} for travelers interested in {}",
            destination, interests
        );
        ToolResult::success(grounded_lookup(context, "Hidden gems", &query).await)
    }
}

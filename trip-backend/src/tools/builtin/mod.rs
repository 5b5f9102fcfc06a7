//! Built-in lookup tools, grouped by the agent domain they serve.

pub mod budget;
pub mod local;
pub mod planning;
pub mod research;

use crate::tools::ToolRegistry;
use std::sync::Arc;

/// Create a registry populated with every built-in tool.
pub fn create_default_registry() -> ToolRegistry {
    let registry = ToolRegistry::new();

    registry.register(Arc::new(research::EssentialInfoTool::new()));
    registry.register(Arc::new(research::WeatherInfoTool::new()));
    registry.register(Arc::new(research::VisaInfoTool::new()));
    registry.register(Arc::new(budget::BudgetBasicsTool::new()));
    registry.register(Arc::new(budget::AttractionPricesTool::new()));
    registry.register(Arc::new(local::LocalFlavorTool::new()));
    registry.register(Arc::new(local::LocalCustomsTool::new()));
    registry.register(Arc::new(local::HiddenGemsTool::new()));
    registry.register(Arc::new(planning::TravelTimeTool::new()));
    registry.register(Arc::new(planning::PackingListTool::new()));
    registry.register(Arc::new(planning::DayPlanTool::new()));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_contents() {
        let registry = create_default_registry();
        assert_eq!(registry.len(), 11);
        for name in [
            "essential_info",
            "weather_info",
            "visa_info",
            "budget_basics",
            "attraction_prices",
            "local_flavor",
            "local_customs",
            "hidden_gems",
            "travel_time",
            "packing_list",
            "day_plan",
        ] {
            assert!(registry.has_tool(name), "missing tool {}", name);
        }
    }
}

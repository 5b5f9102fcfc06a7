use std::env;

/// Default OpenRouter chat-completions endpoint base.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1";
/// Default primary model.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-20b";
/// Default guide corpus location.
pub const DEFAULT_GUIDES_PATH: &str = "./data/local_guides.json";

#[derive(Clone)]
pub struct Config {
    /// Required for the production planner. Absence is a configuration
    /// failure surfaced by `TripPlanner::new`, never a panic here.
    pub openrouter_api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    /// Models tried by OpenRouter when the primary is unavailable.
    pub fallback_models: Vec<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Optional search capability; without it tools run on LLM fallback only.
    pub tavily_api_key: Option<String>,
    pub guides_path: String,
    pub retrieval_enabled: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            openrouter_api_key: env::var("OPENROUTER_API_KEY").ok().filter(|k| !k.is_empty()),
            api_url: env::var("OPENROUTER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            model: env::var("TRIP_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            fallback_models: vec![
                DEFAULT_MODEL.to_string(),
                "google/gemini-flash-1.5-8b".to_string(),
            ],
            max_tokens: 2000,
            temperature: 0.7,
            tavily_api_key: env::var("TAVILY_API_KEY").ok().filter(|k| !k.is_empty()),
            guides_path: env::var("LOCAL_GUIDES_PATH")
                .unwrap_or_else(|_| DEFAULT_GUIDES_PATH.to_string()),
            retrieval_enabled: env::var("RETRIEVAL_ENABLED")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
        }
    }

    /// Baseline config with no keys set, for exercising failure paths.
    #[cfg(test)]
    pub fn default_for_tests() -> Self {
        Self {
            openrouter_api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            fallback_models: vec![],
            max_tokens: 2000,
            temperature: 0.7,
            tavily_api_key: None,
            guides_path: DEFAULT_GUIDES_PATH.to_string(),
            retrieval_enabled: true,
        }
    }
}

//! Search capability implementations.
//!
//! All failures map to `None`: the tool layer treats an absent result as
//! "try the LLM fallback", so transport problems never escape this module.

use crate::ai::SearchProvider;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";
const MAX_RESULTS: u32 = 3;

/// Web search backed by the Tavily REST API.
pub struct TavilySearch {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    content: String,
}

impl TavilySearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: crate::http::shared_client().clone(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str) -> Option<String> {
        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results: MAX_RESULTS,
        };

        let response = match self
            .client
            .post(TAVILY_ENDPOINT)
            .timeout(Duration::from_secs(20))
            .json(&request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                log::warn!("[SEARCH] Tavily request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            log::warn!("[SEARCH] Tavily returned status {}", response.status());
            return None;
        }

        let data: TavilyResponse = match response.json().await {
            Ok(d) => d,
            Err(e) => {
                log::warn!("[SEARCH] Failed to parse Tavily response: {}", e);
                return None;
            }
        };

        let joined = data
            .results
            .iter()
            .map(|r| r.content.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

/// Null search provider: every lookup goes straight to the LLM fallback.
/// Used when no search API key is configured.
pub struct NoSearch;

#[async_trait]
impl SearchProvider for NoSearch {
    async fn search(&self, _query: &str) -> Option<String> {
        None
    }
}

//! Local guide retrieval: a small JSON corpus ranked per query, vector
//! search first when an index is wired in, deterministic keyword scoring
//! otherwise. A missing or broken corpus degrades to an empty retriever,
//! never a startup failure.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

const CITY_MATCH_WEIGHT: f64 = 2.0;
const INTEREST_MATCH_WEIGHT: f64 = 1.0;
const DEFAULT_SOURCE: &str = "local_guides";

/// One curated guide entry, loaded once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct GuideDocument {
    pub city: String,
    pub interests: Vec<String>,
    pub description: String,
    pub source: String,
}

impl GuideDocument {
    /// Rendered text handed to agents as grounding context.
    pub fn content(&self) -> String {
        format!(
            "City: {}\nInterests: {}\nGuide: {}",
            self.city,
            self.interests.join(", "),
            self.description
        )
    }
}

/// Metadata carried alongside retrieved content.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalMetadata {
    pub city: String,
    pub interests: Vec<String>,
    pub source: String,
}

/// A ranked hit from one retrieval query.
#[derive(Debug, Clone)]
pub struct RetrievalResult {
    pub content: String,
    pub metadata: RetrievalMetadata,
    pub score: f64,
}

/// Semantic index capability. Any error falls through to keyword scoring
/// for that call only.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn top_k(&self, query: &str, k: usize) -> Result<Vec<RetrievalResult>, String>;
}

#[derive(Debug, Deserialize)]
struct RawGuideEntry {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    interests: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

pub struct LocalGuideRetriever {
    documents: Vec<GuideDocument>,
    vector_index: Option<Arc<dyn VectorIndex>>,
    enabled: bool,
}

impl LocalGuideRetriever {
    /// Load the corpus from `path`. Missing file, malformed JSON, or an
    /// empty array all produce an empty retriever; entries without a city
    /// or description are dropped.
    pub fn load(path: impl AsRef<Path>, enabled: bool) -> Self {
        let path = path.as_ref();
        let documents = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Vec<RawGuideEntry>>(&raw) {
                Ok(entries) => {
                    let docs: Vec<GuideDocument> = entries
                        .into_iter()
                        .filter_map(|entry| {
                            let city = entry.city.filter(|c| !c.trim().is_empty())?;
                            let description =
                                entry.description.filter(|d| !d.trim().is_empty())?;
                            Some(GuideDocument {
                                city,
                                interests: entry.interests,
                                description,
                                source: entry
                                    .source
                                    .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
                            })
                        })
                        .collect();
                    log::info!(
                        "[RETRIEVAL] Loaded {} guide documents from {}",
                        docs.len(),
                        path.display()
                    );
                    docs
                }
                Err(e) => {
                    log::warn!(
                        "[RETRIEVAL] Malformed guide corpus at {}: {}",
                        path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(e) => {
                log::warn!(
                    "[RETRIEVAL] Guide corpus unavailable at {}: {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        };

        Self {
            documents,
            vector_index: None,
            enabled,
        }
    }

    /// Build a retriever directly from documents, used in tests and by
    /// callers that assemble a corpus in memory.
    pub fn from_documents(documents: Vec<GuideDocument>, enabled: bool) -> Self {
        Self {
            documents,
            vector_index: None,
            enabled,
        }
    }

    pub fn with_vector_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.vector_index = Some(index);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Rank the corpus against `(destination, interests)` and return the top
    /// `k` hits. The vector index is tried first when present; keyword
    /// scoring takes over on any index failure.
    pub async fn retrieve(
        &self,
        destination: &str,
        interests: &str,
        k: usize,
    ) -> Vec<RetrievalResult> {
        if !self.enabled || self.documents.is_empty() || k == 0 {
            return Vec::new();
        }

        if let Some(index) = &self.vector_index {
            let query = format!("{} {}", destination, interests);
            match index.top_k(&query, k).await {
                Ok(mut results) => {
                    results.truncate(k);
                    return results;
                }
                Err(e) => {
                    log::warn!("[RETRIEVAL] Vector index failed, using keyword scoring: {}", e);
                }
            }
        }

        self.keyword_retrieve(destination, interests, k)
    }

    fn keyword_retrieve(&self, destination: &str, interests: &str, k: usize) -> Vec<RetrievalResult> {
        let destination_lower = destination.trim().to_lowercase();
        let query_interests: Vec<String> = interests
            .split(',')
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();

        let mut scored: Vec<RetrievalResult> = self
            .documents
            .iter()
            .filter_map(|doc| {
                let mut score = 0.0;

                // Containment in either direction lets "Tokyo, Japan" match
                // a document whose city is just "Tokyo". A blank destination
                // would contain-match every city, so it scores nothing.
                let city_lower = doc.city.to_lowercase();
                if !destination_lower.is_empty()
                    && (destination_lower.contains(&city_lower)
                        || city_lower.contains(&destination_lower))
                {
                    score += CITY_MATCH_WEIGHT;
                }

                for doc_interest in &doc.interests {
                    let doc_interest = doc_interest.to_lowercase();
                    if query_interests.iter().any(|q| *q == doc_interest) {
                        score += INTEREST_MATCH_WEIGHT;
                    }
                }

                if score > 0.0 {
                    Some(RetrievalResult {
                        content: doc.content(),
                        metadata: RetrievalMetadata {
                            city: doc.city.clone(),
                            interests: doc.interests.clone(),
                            source: doc.source.clone(),
                        },
                        score,
                    })
                } else {
                    None
                }
            })
            .collect();

        // Stable sort keeps corpus order for equal scores.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn doc(city: &str, interests: &[&str], description: &str) -> GuideDocument {
        GuideDocument {
            city: city.to_string(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            description: description.to_string(),
            source: DEFAULT_SOURCE.to_string(),
        }
    }

    fn tokyo_corpus() -> Vec<GuideDocument> {
        vec![
            doc(
                "Tokyo",
                &["food", "culture"],
                "Tsukiji outer market and a tea ceremony in Yanaka.",
            ),
            doc("Tokyo", &["art"], "TeamLab and the Mori Art Museum."),
            doc("Osaka", &["food"], "Dotonbori street food crawl."),
        ]
    }

    #[tokio::test]
    async fn test_retrieve_ranks_interest_overlap_higher() {
        let retriever = LocalGuideRetriever::from_documents(tokyo_corpus(), true);
        let results = retriever.retrieve("Tokyo, Japan", "food, culture", 5).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].metadata.interests, vec!["food", "culture"]);
        // City + two interests beats city alone.
        assert!(results[0].score > results[1].score);
        for result in &results {
            assert!(result.score > 0.0);
        }
    }

    #[tokio::test]
    async fn test_retrieve_respects_k() {
        let retriever = LocalGuideRetriever::from_documents(tokyo_corpus(), true);
        let results = retriever.retrieve("Tokyo", "food", 1).await;
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_retrieve_excludes_zero_scores() {
        let retriever = LocalGuideRetriever::from_documents(tokyo_corpus(), true);
        let results = retriever.retrieve("Reykjavik", "glaciers", 5).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_disabled_returns_empty() {
        let retriever = LocalGuideRetriever::from_documents(tokyo_corpus(), false);
        let results = retriever.retrieve("Tokyo", "food", 5).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_blank_destination_matches_no_cities() {
        let retriever = LocalGuideRetriever::from_documents(tokyo_corpus(), true);

        // Interest overlap still counts; the city weight does not.
        let results = retriever.retrieve("", "food", 5).await;
        assert_eq!(results.len(), 2);
        for result in &results {
            assert_eq!(result.score, 1.0);
        }

        assert!(retriever.retrieve("   ", "", 5).await.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let retriever = LocalGuideRetriever::load("/nonexistent/guides.json", true);
        assert!(retriever.is_empty());
    }

    #[tokio::test]
    async fn test_load_empty_array_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        let retriever = LocalGuideRetriever::load(file.path(), true);
        assert!(retriever.is_empty());
        assert!(retriever.retrieve("Tokyo", "food", 5).await.is_empty());
    }

    #[test]
    fn test_load_malformed_json_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let retriever = LocalGuideRetriever::load(file.path(), true);
        assert!(retriever.is_empty());
    }

    #[test]
    fn test_load_drops_incomplete_entries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"city": "Lisbon", "interests": ["food"], "description": "Time Out Market."}},
                {{"city": "Porto"}},
                {{"description": "No city given."}}
            ]"#
        )
        .unwrap();
        let retriever = LocalGuideRetriever::load(file.path(), true);
        assert_eq!(retriever.len(), 1);
    }

    #[test]
    fn test_document_content_rendering() {
        let document = doc("Lisbon", &["food", "music"], "Fado and petiscos in Alfama.");
        assert_eq!(
            document.content(),
            "City: Lisbon\nInterests: food, music\nGuide: Fado and petiscos in Alfama."
        );
    }

    struct FailingIndex;

    #[async_trait]
    impl VectorIndex for FailingIndex {
        async fn top_k(&self, _query: &str, _k: usize) -> Result<Vec<RetrievalResult>, String> {
            Err("index offline".to_string())
        }
    }

    struct OvereagerIndex;

    #[async_trait]
    impl VectorIndex for OvereagerIndex {
        async fn top_k(&self, _query: &str, k: usize) -> Result<Vec<RetrievalResult>, String> {
            // Ignores k, like an index with a broken limit parameter.
            Ok((0..k + 3)
                .map(|i| RetrievalResult {
                    content: format!("hit {}", i),
                    metadata: RetrievalMetadata {
                        city: "Tokyo".to_string(),
                        interests: vec![],
                        source: DEFAULT_SOURCE.to_string(),
                    },
                    score: 1.0,
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_vector_results_capped_at_k() {
        let retriever = LocalGuideRetriever::from_documents(tokyo_corpus(), true)
            .with_vector_index(Arc::new(OvereagerIndex));
        let results = retriever.retrieve("Tokyo", "food", 2).await;
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_vector_failure_falls_back_to_keywords() {
        let retriever = LocalGuideRetriever::from_documents(tokyo_corpus(), true)
            .with_vector_index(Arc::new(FailingIndex));
        let results = retriever.retrieve("Tokyo", "food", 5).await;
        assert!(!results.is_empty());
        assert_eq!(results[0].metadata.city, "Tokyo");
    }
}

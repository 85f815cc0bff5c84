//! In-memory index: useful for testing and ephemeral document sets.

use async_trait::async_trait;
use ragturn_core::context::SearchHit;
use ragturn_core::error::RetrievalError;
use ragturn_core::index::VectorIndex;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory index that stores hits in a Vec.
#[derive(Clone, Default)]
pub struct InMemoryIndex {
    hits: Arc<RwLock<Vec<SearchHit>>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            hits: Arc::new(RwLock::new(hits)),
        }
    }

    /// Add a document to the index.
    pub async fn insert(&self, hit: SearchHit) {
        self.hits.write().await.push(hit);
    }

    pub async fn len(&self) -> usize {
        self.hits.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.hits.read().await.is_empty()
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    fn name(&self) -> &str {
        "memory"
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, RetrievalError> {
        let hits = self.hits.read().await;
        Ok(keyword_rank(&hits, query, k))
    }
}

/// Rank `hits` by how often the query's terms occur in their content.
///
/// Hits with no matching term are dropped. Ties keep insertion order.
pub(crate) fn keyword_rank(hits: &[SearchHit], query: &str, k: usize) -> Vec<SearchHit> {
    let terms: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(str::to_lowercase)
        .collect();

    if terms.is_empty() || k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(f32, &SearchHit)> = hits
        .iter()
        .filter_map(|hit| {
            let content = hit.page_content.to_lowercase();
            let occurrences: usize = terms.iter().map(|t| content.matches(t.as_str()).count()).sum();
            if occurrences == 0 {
                return None;
            }
            let score = occurrences as f32 / (content.len() as f32 / 100.0).max(1.0);
            Some((score, hit))
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored.into_iter().map(|(_, hit)| hit.clone()).collect()
}

//! Context retrieval against the turn's active index.

use ragturn_config::AppConfig;
use ragturn_core::context::ContextRecord;
use ragturn_core::error::RetrievalError;
use ragturn_core::index::IndexFactory;
use std::sync::Arc;
use tracing::debug;

use crate::params::TurnParams;

/// Fetches context records for a question.
///
/// The index is opened lazily, once per [`retrieve`](Self::retrieve) call,
/// and never when the result is known to be empty.
#[derive(Clone)]
pub struct ContextRetriever {
    indexes: Arc<dyn IndexFactory>,
    store_kind: String,
    index_id: Option<String>,
    embeddings_key: String,
}

impl ContextRetriever {
    pub fn new(
        indexes: Arc<dyn IndexFactory>,
        store_kind: impl Into<String>,
        index_id: Option<String>,
        embeddings_key: impl Into<String>,
    ) -> Self {
        Self {
            indexes,
            store_kind: store_kind.into(),
            index_id,
            embeddings_key: embeddings_key.into(),
        }
    }

    /// The retriever for a resolved turn: store kind and embeddings from
    /// `config`, index from the turn's source.
    pub fn from_config(
        indexes: Arc<dyn IndexFactory>,
        config: &AppConfig,
        params: &TurnParams,
    ) -> Self {
        Self::new(
            indexes,
            config.vector_store.clone(),
            params.source.active_docs.clone(),
            config.embeddings_key.clone(),
        )
    }

    /// The index this retriever searches, if any.
    pub fn index_id(&self) -> Option<&str> {
        self.index_id.as_deref()
    }

    /// Return at most `k` records relevant to `question`, in ranking order.
    pub async fn retrieve(
        &self,
        question: &str,
        k: usize,
    ) -> Result<Vec<ContextRecord>, RetrievalError> {
        if k == 0 {
            debug!("Retrieval skipped: zero chunks requested");
            return Ok(Vec::new());
        }
        let Some(index_id) = self.index_id.as_deref() else {
            debug!("Retrieval skipped: no active docs");
            return Ok(Vec::new());
        };

        let index = self
            .indexes
            .open(&self.store_kind, index_id, &self.embeddings_key)?;
        let hits = index.search(question, k).await?;

        debug!(index = index_id, backend = index.name(), hits = hits.len(), "Retrieved context");
        Ok(hits.into_iter().take(k).map(ContextRecord::from).collect())
    }
}

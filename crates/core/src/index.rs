//! Retrieval boundary: the abstraction over document indexes.
//!
//! A turn never searches documents itself. It asks an [`IndexFactory`] for
//! the index named by the caller's source descriptor and runs one
//! nearest-neighbour query against it.

use async_trait::async_trait;
use std::sync::Arc;

use crate::context::SearchHit;
use crate::error::RetrievalError;

/// A searchable document index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// A human-readable name for this index backend (e.g., "file", "memory").
    fn name(&self) -> &str;

    /// Return up to `k` hits for `query`, most relevant first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, RetrievalError>;
}

/// Builds index handles from configuration.
///
/// Implementations: file-backed JSONL indexes, preloaded in-memory indexes,
/// or adapters over an external vector database.
pub trait IndexFactory: Send + Sync {
    /// Open the index `index_id` in store `store_kind` using the given
    /// embedding configuration.
    fn open(
        &self,
        store_kind: &str,
        index_id: &str,
        embeddings_key: &str,
    ) -> Result<Arc<dyn VectorIndex>, RetrievalError>;
}

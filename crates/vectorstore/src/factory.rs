//! Store selection: maps a configured store kind and index id to an index.

use ragturn_core::error::RetrievalError;
use ragturn_core::index::{IndexFactory, VectorIndex};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::file_backend::{FileIndex, INDEX_FILE};
use crate::in_memory::InMemoryIndex;

/// Opens indexes for the `"file"` and `"memory"` store kinds.
///
/// - `"file"`: `<data_dir>/<index id>/index.jsonl`, read on every open
/// - `"memory"`: indexes registered up front with [`StoreFactory::with_memory_index`]
pub struct StoreFactory {
    data_dir: PathBuf,
    memory: HashMap<String, Arc<InMemoryIndex>>,
}

impl StoreFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            memory: HashMap::new(),
        }
    }

    /// Register an in-memory index under `index_id`.
    pub fn with_memory_index(mut self, index_id: impl Into<String>, index: InMemoryIndex) -> Self {
        self.memory.insert(index_id.into(), Arc::new(index));
        self
    }

    /// Directory holding the file-backed index `index_id`.
    pub fn index_dir(&self, index_id: &str) -> Result<PathBuf, RetrievalError> {
        let relative = Path::new(index_id.trim_end_matches('/'));
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || index_id.trim().is_empty() {
            return Err(RetrievalError::Misconfigured(format!(
                "invalid index id '{index_id}'"
            )));
        }
        Ok(self.data_dir.join(relative))
    }
}

impl IndexFactory for StoreFactory {
    fn open(
        &self,
        store_kind: &str,
        index_id: &str,
        embeddings_key: &str,
    ) -> Result<Arc<dyn VectorIndex>, RetrievalError> {
        debug!(store = store_kind, index = index_id, embeddings = embeddings_key, "Opening index");

        match store_kind {
            "file" => {
                let index = FileIndex::open(self.index_dir(index_id)?.join(INDEX_FILE))?;
                debug!(path = %index.path().display(), entries = index.len(), "File index opened");
                Ok(Arc::new(index))
            }
            "memory" => self
                .memory
                .get(index_id)
                .map(|index| Arc::clone(index) as Arc<dyn VectorIndex>)
                .ok_or_else(|| {
                    RetrievalError::IndexUnavailable(format!("no in-memory index '{index_id}'"))
                }),
            other => Err(RetrievalError::Misconfigured(format!(
                "unknown vector store '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragturn_core::context::{DocMetadata, SearchHit};

    const EMBEDDINGS: &str = "test-embeddings";

    #[tokio::test]
    async fn opens_registered_memory_index() {
        let index = InMemoryIndex::from_hits(vec![SearchHit::new("hello world", DocMetadata::default())]);
        let factory = StoreFactory::new("/unused").with_memory_index("docs", index);

        let opened = factory.open("memory", "docs", EMBEDDINGS).unwrap();
        assert_eq!(opened.name(), "memory");
        assert_eq!(opened.search("hello", 2).await.unwrap().len(), 1);
    }

    #[test]
    fn unknown_memory_index_is_unavailable() {
        let factory = StoreFactory::new("/unused");
        let err = factory.open("memory", "nope", EMBEDDINGS).err().unwrap();
        assert!(matches!(err, RetrievalError::IndexUnavailable(_)));
    }

    #[test]
    fn unknown_store_kind_is_misconfigured() {
        let factory = StoreFactory::new("/unused");
        let err = factory.open("faiss", "docs", EMBEDDINGS).err().unwrap();
        assert!(matches!(err, RetrievalError::Misconfigured(_)));
    }

    #[tokio::test]
    async fn opens_file_index_in_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("local").join("manual");
        std::fs::create_dir_all(&index_dir).unwrap();
        std::fs::write(
            index_dir.join(INDEX_FILE),
            "{\"page_content\":\"reset the router\",\"metadata\":{\"title\":\"faq/router.md\"}}\n",
        )
        .unwrap();

        let factory = StoreFactory::new(dir.path());
        let index = factory.open("file", "local/manual/", EMBEDDINGS).unwrap();
        let hits = index.search("router", 2).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn rejects_escaping_index_ids() {
        let factory = StoreFactory::new("/data");
        assert!(factory.index_dir("../etc").is_err());
        assert!(factory.index_dir("/abs").is_err());
        assert!(factory.index_dir("").is_err());
        assert_eq!(factory.index_dir("a/b").unwrap(), PathBuf::from("/data/a/b"));
    }
}

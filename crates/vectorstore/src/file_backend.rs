//! File-based index: one JSON-encoded [`SearchHit`] per line.
//!
//! Storage location: `<data_dir>/<index id>/index.jsonl`
//!
//! The file is read once when the index is opened. A missing file is an
//! error: a turn that names an index must not silently run without context.

use async_trait::async_trait;
use ragturn_core::context::SearchHit;
use ragturn_core::error::RetrievalError;
use ragturn_core::index::VectorIndex;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::in_memory::keyword_rank;

/// File name of the document list inside an index directory.
pub const INDEX_FILE: &str = "index.jsonl";

/// A read-only index loaded from a JSONL file.
pub struct FileIndex {
    path: PathBuf,
    hits: Vec<SearchHit>,
}

impl FileIndex {
    /// Load the index at `path`.
    ///
    /// Corrupted lines are skipped with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RetrievalError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            RetrievalError::IndexUnavailable(format!("{}: {e}", path.display()))
        })?;

        let hits: Vec<SearchHit> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<SearchHit>(line) {
                Ok(hit) => Some(hit),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping corrupted index entry");
                    None
                }
            })
            .collect();

        debug!(path = %path.display(), count = hits.len(), "File index loaded");
        Ok(Self { path, hits })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

#[async_trait]
impl VectorIndex for FileIndex {
    fn name(&self) -> &str {
        "file"
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, RetrievalError> {
        Ok(keyword_rank(&self.hits, query, k))
    }
}

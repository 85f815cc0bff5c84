//! Retrieved context records.
//!
//! A [`SearchHit`] is what an index returns; a [`ContextRecord`] is what the
//! turn works with. The mapping applies an explicit fallback chain instead
//! of ad-hoc key lookups.

use serde::{Deserialize, Serialize};

/// Source value used when a hit carries none.
pub const LOCAL_SOURCE: &str = "local";

/// Metadata attached to an indexed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Anything else the ingester stored
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A raw result from a nearest-neighbour search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub page_content: String,

    #[serde(default)]
    pub metadata: DocMetadata,
}

impl SearchHit {
    pub fn new(page_content: impl Into<String>, metadata: DocMetadata) -> Self {
        Self {
            page_content: page_content.into(),
            metadata,
        }
    }
}

/// One context snippet contributing to the system prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRecord {
    pub title: String,
    pub text: String,
    pub source: String,
}

impl From<SearchHit> for ContextRecord {
    /// Title: `title` → `post_title` → page content, then the last `/` segment.
    /// Source: the stored value when non-empty, otherwise [`LOCAL_SOURCE`].
    fn from(hit: SearchHit) -> Self {
        let SearchHit {
            page_content,
            metadata,
        } = hit;

        let raw_title = metadata
            .title
            .as_deref()
            .or(metadata.post_title.as_deref())
            .unwrap_or(&page_content);
        let title = last_path_segment(raw_title).to_string();

        let source = metadata
            .source
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| LOCAL_SOURCE.to_string());

        Self {
            title,
            text: page_content,
            source,
        }
    }
}

fn last_path_segment(s: &str) -> &str {
    s.rsplit('/').next().unwrap_or(s)
}

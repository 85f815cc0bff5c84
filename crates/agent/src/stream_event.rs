//! Turn-level streaming events.
//!
//! A turn's output is a single ordered stream of [`GenerationEvent`]s with
//! the shape `Source* Answer* ToolCalls`:
//!
//! - `source`:     one retrieved context record
//! - `answer`:     one generated text fragment
//! - `tool_calls`: the agent's tool calls for this turn; always exactly one, always last

use futures::Stream;
use ragturn_core::context::ContextRecord;
use ragturn_core::history::ToolCallRecord;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// One item of a turn's output.
///
/// Serializes as `{"source": {...}}`, `{"answer": "..."}` or
/// `{"tool_calls": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationEvent {
    Source(ContextRecord),
    Answer(String),
    ToolCalls(Vec<ToolCallRecord>),
}

impl GenerationEvent {
    /// SSE event name for this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Source(_) => "source",
            Self::Answer(_) => "answer",
            Self::ToolCalls(_) => "tool_calls",
        }
    }
}

/// A turn's lazy event stream. An `Err` item ends the turn.
pub type GenerationStream =
    Pin<Box<dyn Stream<Item = ragturn_core::Result<GenerationEvent>> + Send + 'static>>;

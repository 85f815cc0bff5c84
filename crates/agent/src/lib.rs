//! Turn orchestration: one retrieval-augmented generation turn, end to end.
//!
//! A turn follows a fixed pipeline:
//!
//! 1. **Retrieve** up to `chunks` context records from the active index
//! 2. **Emit** each record as a [`GenerationEvent::Source`]
//! 3. **Assemble** the system prompt and linearize the stored history
//! 4. **Generate**, forwarding each fragment as a [`GenerationEvent::Answer`]
//! 5. **Finish** with exactly one [`GenerationEvent::ToolCalls`]
//!
//! The pipeline is exposed as a lazy stream: nothing runs until the
//! consumer polls, and dropping the stream abandons the turn.

pub mod history;
pub mod orchestrator;
pub mod params;
pub mod prompt;
pub mod retriever;
pub mod stream_event;

pub use history::{linearize, resolve_call_id};
pub use orchestrator::{TurnOrchestrator, TurnPhase, build_messages};
pub use params::{SourceDescriptor, TurnParams, TurnRequest, effective_token_limit};
pub use prompt::assemble;
pub use retriever::ContextRetriever;
pub use stream_event::{GenerationEvent, GenerationStream};

#[cfg(test)]
pub(crate) mod test_helpers;

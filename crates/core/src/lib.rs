//! # ragturn core
//!
//! Domain types, collaborator traits, and error definitions for a single
//! retrieval-augmented generation turn. This crate has **no framework
//! dependencies**: it defines the data that flows through a turn and the
//! two external capabilities a turn relies on.
//!
//! ## Collaborators
//!
//! - [`index::VectorIndex`] / [`index::IndexFactory`]: the document search
//!   boundary. Implementations live in `ragturn-vectorstore` or in the
//!   embedding application.
//! - [`generation::GenerationAgent`] / [`generation::AgentFactory`]: the
//!   model boundary. Implementations are supplied by the embedding
//!   application; this workspace never performs inference itself.

pub mod context;
pub mod error;
pub mod generation;
pub mod history;
pub mod index;
pub mod message;

// Re-export key types at crate root for ergonomics
pub use context::{ContextRecord, DocMetadata, SearchHit};
pub use error::{Error, GenerationError, Result, RetrievalError};
pub use generation::{AgentFactory, AgentSpec, FragmentStream, GenerationAgent};
pub use history::{ToolCallRecord, Turn};
pub use index::{IndexFactory, VectorIndex};
pub use message::{ContentBlock, FunctionCall, FunctionResponse, Message, MessageContent, Role};

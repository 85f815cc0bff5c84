//! Generation boundary: the abstraction over the language-model agent.
//!
//! A [`GenerationAgent`] takes the assembled message sequence and produces a
//! lazy stream of text fragments. While generating it may invoke tools; it
//! records those invocations itself and exposes them afterwards through
//! [`GenerationAgent::tool_calls`].
//!
//! Agents are per-turn objects: each turn asks the [`AgentFactory`] for a
//! fresh instance, so the tool-call record never leaks between turns.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::GenerationError;
use crate::history::ToolCallRecord;
use crate::message::Message;

/// A boxed stream of generated text fragments.
pub type FragmentStream =
    Pin<Box<dyn Stream<Item = Result<String, GenerationError>> + Send + 'static>>;

/// The core generation trait.
#[async_trait]
pub trait GenerationAgent: Send + Sync {
    /// A human-readable name for this agent (e.g., "openai", "scripted").
    fn name(&self) -> &str;

    /// Start generating a reply to `messages`.
    ///
    /// Fragments are yielded as the model produces them. A failure after
    /// some fragments surfaces as an `Err` item on the stream.
    async fn generate(&self, messages: Vec<Message>) -> Result<FragmentStream, GenerationError>;

    /// Snapshot of the tool calls issued so far, in issue order.
    fn tool_calls(&self) -> Vec<ToolCallRecord>;
}

/// Everything needed to construct an agent for one turn.
#[derive(Clone)]
pub struct AgentSpec {
    /// Backend family (e.g. "openai", "anthropic")
    pub llm_name: String,
    /// Model identifier
    pub model: String,
    /// Process-wide default credential
    pub api_key: Option<String>,
    /// Caller-supplied credential; overrides `api_key`
    pub user_api_key: Option<String>,
}

impl AgentSpec {
    /// The credential the agent should authenticate with.
    pub fn credential(&self) -> Option<&str> {
        self.user_api_key.as_deref().or(self.api_key.as_deref())
    }
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AgentSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSpec")
            .field("llm_name", &self.llm_name)
            .field("model", &self.model)
            .field("api_key", &redact(&self.api_key))
            .field("user_api_key", &redact(&self.user_api_key))
            .finish()
    }
}

/// Builds a fresh agent for each turn.
pub trait AgentFactory: Send + Sync {
    fn create(&self, spec: &AgentSpec) -> Result<Arc<dyn GenerationAgent>, GenerationError>;
}

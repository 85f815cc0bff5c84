//! Stored conversation history.
//!
//! A [`Turn`] is one past exchange as the persistence layer recorded it.
//! Every field is optional: an absent field means that aspect did not occur
//! in the turn, and a turn missing everything simply contributes nothing.
//! Malformed entries are tolerated, never rejected.

use serde::{Deserialize, Serialize};

/// The literal some stores write for "no call id".
pub const PLACEHOLDER_CALL_ID: &str = "None";

/// One historical exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRecord>>,
}

impl Turn {
    /// A turn with a prompt/response pair.
    pub fn exchange(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            response: Some(response.into()),
            tool_calls: None,
        }
    }

    /// Attach tool calls to this turn.
    pub fn with_tool_calls(mut self, calls: Vec<ToolCallRecord>) -> Self {
        self.tool_calls = Some(calls);
        self
    }

    /// The prompt/response pair, only when both halves are present.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (&self.prompt, &self.response) {
            (Some(p), Some(r)) => Some((p, r)),
            _ => None,
        }
    }
}

/// A tool invocation recorded during a turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Correlation token; may be missing or [`PLACEHOLDER_CALL_ID`] in stored history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,

    #[serde(default)]
    pub action_name: String,

    #[serde(default)]
    pub arguments: serde_json::Value,

    #[serde(default)]
    pub result: serde_json::Value,
}

impl ToolCallRecord {
    pub fn new(
        action_name: impl Into<String>,
        arguments: serde_json::Value,
        result: serde_json::Value,
    ) -> Self {
        Self {
            call_id: None,
            action_name: action_name.into(),
            arguments,
            result,
        }
    }

    pub fn with_call_id(mut self, call_id: impl Into<String>) -> Self {
        self.call_id = Some(call_id.into());
        self
    }

    /// The stored call id, unless it is missing, empty, or the placeholder.
    pub fn stored_call_id(&self) -> Option<&str> {
        self.call_id
            .as_deref()
            .filter(|id| !id.is_empty() && *id != PLACEHOLDER_CALL_ID)
    }
}

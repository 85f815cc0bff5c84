//! Message domain types.
//!
//! A turn hands the generation agent an ordered `Vec<Message>`. The order of
//! that vector is the conversational order; nothing downstream regroups
//! messages by role.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions (prompt template with retrieved context)
    System,
    /// Tool execution result
    Tool,
}

/// A single message handed to the generation agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// Plain text or structured content blocks
    pub content: MessageContent,
}

/// Message payload: plain text, or an ordered list of structured blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// A structured content block.
///
/// Serialized externally tagged, e.g. `{"function_call": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentBlock {
    FunctionCall(FunctionCall),
    FunctionResponse(FunctionResponse),
}

/// A function invocation the assistant issued in an earlier turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub args: serde_json::Value,
    /// Correlates this call with its [`FunctionResponse`]
    pub call_id: String,
}

/// The result returned to the assistant for a [`FunctionCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    /// Always an object of the form `{"result": ...}`
    pub response: serde_json::Value,
    pub call_id: String,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create an assistant message carrying a single function call block.
    pub fn function_call(
        name: impl Into<String>,
        args: serde_json::Value,
        call_id: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(vec![ContentBlock::FunctionCall(FunctionCall {
                name: name.into(),
                args,
                call_id: call_id.into(),
            })]),
        }
    }

    /// Create a tool message carrying a single function response block.
    ///
    /// The result is wrapped as `{"result": result}`.
    pub fn function_response(
        name: impl Into<String>,
        result: serde_json::Value,
        call_id: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: MessageContent::Blocks(vec![ContentBlock::FunctionResponse(
                FunctionResponse {
                    name: name.into(),
                    response: serde_json::json!({ "result": result }),
                    call_id: call_id.into(),
                },
            )]),
        }
    }

    /// The text content, if this is a plain-text message.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(s) => Some(s),
            MessageContent::Blocks(_) => None,
        }
    }

    /// The correlation id of the first structured block, if any.
    pub fn call_id(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Blocks(blocks) => blocks.iter().find_map(|b| match b {
                ContentBlock::FunctionCall(c) => Some(c.call_id.as_str()),
                ContentBlock::FunctionResponse(r) => Some(r.call_id.as_str()),
            }),
            MessageContent::Text(_) => None,
        }
    }
}

//! History linearization: stored turns to a flat message sequence.
//!
//! Per turn, in input order:
//!
//! - a complete prompt/response pair becomes `user` then `assistant`
//! - each recorded tool call becomes an `assistant` function-call message
//!   followed by a `tool` function-response message
//!
//! The pair always precedes the turn's tool calls. Both halves of a tool
//! call carry the same resolved call id.

use ragturn_core::history::{ToolCallRecord, Turn};
use ragturn_core::message::Message;
use uuid::Uuid;

/// Flatten `history` into the messages a model sees before the new question.
pub fn linearize(history: &[Turn]) -> Vec<Message> {
    let mut messages = Vec::new();

    for turn in history {
        if let Some((prompt, response)) = turn.pair() {
            messages.push(Message::user(prompt));
            messages.push(Message::assistant(response));
        }

        for call in turn.tool_calls.iter().flatten() {
            let call_id = resolve_call_id(call);
            messages.push(Message::function_call(
                call.action_name.clone(),
                call.arguments.clone(),
                call_id.clone(),
            ));
            messages.push(Message::function_response(
                call.action_name.clone(),
                call.result.clone(),
                call_id,
            ));
        }
    }

    messages
}

/// The call id to use for `call`: the stored one, or a fresh UUID when it
/// is missing, empty, or the placeholder.
pub fn resolve_call_id(call: &ToolCallRecord) -> String {
    call.stored_call_id()
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

//! Graph state for the chat loop and the tool call record.
//!
//! `ChatState` is the single state type flowing through the `model` and `tools`
//! nodes and the value the checkpointer stores per thread.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::message::Message;

/// One tool invocation requested by the model.
///
/// `arguments` is always a JSON object; provider output that does not parse
/// as an object becomes `{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: normalize_arguments(arguments),
        }
    }

    /// Builds a call from the raw JSON argument string the provider streams.
    pub fn from_raw_arguments(
        id: impl Into<String>,
        name: impl Into<String>,
        raw: &str,
    ) -> Self {
        let arguments = if raw.trim().is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::Object(Map::new()))
        };
        Self::new(id, name, arguments)
    }

    /// String argument by key, if present.
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }
}

fn normalize_arguments(arguments: Value) -> Value {
    match arguments {
        Value::Object(_) => arguments,
        _ => Value::Object(Map::new()),
    }
}

/// State of one thread: its full message history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatState {
    pub messages: Vec<Message>,
}

impl ChatState {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Tool calls carried by the last message, if it is an assistant message.
    pub fn pending_tool_calls(&self) -> &[ToolCall] {
        self.messages
            .last()
            .map(Message::tool_calls)
            .unwrap_or(&[])
    }

    /// Answers every pending tool call with a `Tool` message carrying `content`.
    ///
    /// A run that stops between the model and tools steps leaves calls without
    /// replies; the provider rejects such a history. Returns how many calls were closed.
    pub fn close_pending_tool_calls(&mut self, content: &str) -> usize {
        let replies: Vec<Message> = self
            .pending_tool_calls()
            .iter()
            .map(|call| Message::tool(call.id.clone(), call.name.clone(), content))
            .collect();
        let closed = replies.len();
        self.messages.extend(replies);
        closed
    }

    /// Content of the last assistant message.
    pub fn last_answer(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Assistant { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }
}

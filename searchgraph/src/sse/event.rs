//! Wire events of the chat stream.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::ToolCallContent;

/// One SSE event sent to the client. Serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatStreamEvent {
    /// Id of a newly created thread; pass it back as `checkpoint_id` to resume.
    Checkpoint { checkpoint_id: String },
    /// Fragment of assistant text.
    Content { content: String },
    SearchStart { query: String },
    SearchResults { urls: Vec<String> },
    /// The run failed; `end` follows.
    Error { message: String },
    End,
}

impl ChatStreamEvent {
    /// Formats the event as one SSE frame: `data: <json>\n\n`.
    pub fn to_sse_line(&self) -> Result<String, serde_json::Error> {
        Ok(format!("data: {}\n\n", serde_json::to_string(self)?))
    }
}

/// URLs of a search tool's output.
///
/// Reads the structured output (or the text parsed as JSON) as a list and keeps
/// the string `url` of every object entry; anything else yields nothing.
/// Entries whose `url` is present but not a string (null, number) are dropped
/// as well, so `urls` on the wire is always a list of strings.
pub fn extract_urls(output: &ToolCallContent) -> Vec<String> {
    let parsed;
    let value = match output.structured {
        Some(ref v) => v,
        None => match serde_json::from_str::<Value>(&output.text) {
            Ok(v) => {
                parsed = v;
                &parsed
            }
            Err(_) => return Vec::new(),
        },
    };
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("url").and_then(Value::as_str))
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

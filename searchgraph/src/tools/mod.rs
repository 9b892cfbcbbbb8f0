//! Tools the model can call, and the registry that dispatches them by name.
//!
//! A [`Tool`] describes itself with a [`ToolSpec`] (sent to the model) and a
//! [`ToolCategory`] (used by the SSE publisher to recognise search calls).
//! [`ToolRegistry`] maps tool names to `Arc<dyn Tool>`.

mod mock;
mod registry;
#[cfg(feature = "tavily")]
mod search;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use mock::MockSearchTool;
pub use registry::{ToolRegistry, UnknownToolPolicy};
#[cfg(feature = "tavily")]
pub use search::{TavilySearchTool, DEFAULT_MAX_RESULTS, DEFAULT_TAVILY_BASE_URL};

/// Tool name the model uses for web search.
pub const TOOL_TAVILY_SEARCH: &str = "tavily_search_results_json";

/// Spec of the web search tool, shared by the real and mock implementations.
pub(crate) fn search_spec() -> ToolSpec {
    ToolSpec {
        name: TOOL_TAVILY_SEARCH.to_string(),
        description: Some(
            "A search engine optimized for comprehensive, accurate, and trusted results. \
             Useful for when you need to answer questions about current events. \
             Input should be a search query."
                .to_string(),
        ),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "search query to look up"
                }
            },
            "required": ["query"]
        }),
    }
}

/// Tool description sent to the model: name, description and JSON schema for arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Result of one tool call.
///
/// `text` becomes the content of the tool message the model sees next;
/// `structured` keeps the raw JSON for consumers such as the SSE publisher.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolCallContent {
    pub text: String,
    pub structured: Option<Value>,
}

impl ToolCallContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            structured: None,
        }
    }

    /// Structured output; `text` is its compact JSON form.
    pub fn json(value: Value) -> Self {
        Self {
            text: value.to_string(),
            structured: Some(value),
        }
    }
}

/// What a tool does, as far as the event stream is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolCategory {
    /// Web search: emits `search_start` / `search_results` events.
    Search,
    #[default]
    General,
}

/// Errors from tool lookup or execution.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// A capability the model can invoke by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name; the registry key and the name the model calls.
    fn name(&self) -> &str;

    fn spec(&self) -> ToolSpec;

    fn category(&self) -> ToolCategory {
        ToolCategory::General
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError>;
}

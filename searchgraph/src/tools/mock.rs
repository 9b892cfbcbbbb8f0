//! Mock search tool for tests and local runs without a search API key.
//!
//! Serves the search tool name with a fixed result list and counts calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::search_spec;
use super::{Tool, ToolCallContent, ToolCategory, ToolSourceError, ToolSpec, TOOL_TAVILY_SEARCH};

/// Search tool returning fixed results for every query.
///
/// **Interaction**: Register in a `ToolRegistry` in place of `TavilySearchTool`.
pub struct MockSearchTool {
    results: Value,
    error: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl MockSearchTool {
    /// Returns `results` (usually a JSON array of `{title, url, content}`) on every call.
    pub fn new(results: Value) -> Self {
        Self {
            results,
            error: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every call fails with a transport error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            results: Value::Null,
            error: Some(message.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of calls made so far; clone it before registering the tool.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Tool for MockSearchTool {
    fn name(&self) -> &str {
        TOOL_TAVILY_SEARCH
    }

    fn spec(&self) -> ToolSpec {
        search_spec()
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Search
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        args.get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolSourceError::InvalidInput("missing query".to_string()))?;
        if let Some(ref msg) = self.error {
            return Err(ToolSourceError::Transport(msg.clone()));
        }
        Ok(ToolCallContent::json(self.results.clone()))
    }
}

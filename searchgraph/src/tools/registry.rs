//! Tool registry: name → tool.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::{Tool, ToolCallContent, ToolCategory, ToolSourceError, ToolSpec};

/// What the tools node does with a call naming a tool that is not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownToolPolicy {
    /// Answer the call with an error tool message so every call id gets a reply.
    #[default]
    Reply,
    /// Skip the call; no tool message is appended.
    Drop,
    /// Abort the run with `AgentError::UnknownTool`.
    Fail,
}

impl std::str::FromStr for UnknownToolPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reply" => Ok(Self::Reply),
            "drop" => Ok(Self::Drop),
            "fail" => Ok(Self::Fail),
            _ => Err(format!(
                "unknown tool policy: {} (use reply, drop, or fail)",
                s
            )),
        }
    }
}

/// Explicit mapping from tool name to the tool that serves it.
///
/// Ordered by name so `list` is stable across runs.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tool` under its own name; replaces an existing tool with that name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    /// Builder-style `register`.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Specs of every registered tool, for binding to the model.
    pub fn list(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|t| t.spec()).collect()
    }

    /// Names of the registered tools in `category`.
    pub fn names_in(&self, category: ToolCategory) -> Vec<String> {
        self.tools
            .values()
            .filter(|t| t.category() == category)
            .map(|t| t.name().to_string())
            .collect()
    }

    /// Calls the tool registered under `name`.
    pub async fn call(&self, name: &str, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolSourceError::NotFound(name.to_string()))?;
        tool.call(args).await
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

//! Chat runner builder: LLM, tool registry, checkpointer and run options from config.
//!
//! Used by the server (and other callers) that hold a [`ChatBuildConfig`].

mod config;
mod error;
mod llm;

use std::sync::Arc;

use tracing::{info, warn};

use crate::chat::{ChatRunner, ChatRunnerOptions};
use crate::graph::DEFAULT_RECURSION_LIMIT;
use crate::llm::LlmClient;
use crate::memory::MemorySaver;
use crate::tools::ToolRegistry;

use llm::build_default_llm;

pub use config::{ChatBuildConfig, DEFAULT_MODEL};
pub use error::BuildError;

/// Registers the Tavily search tool when `tavily_api_key` is set.
#[cfg(feature = "tavily")]
pub fn build_tool_registry(config: &ChatBuildConfig) -> ToolRegistry {
    use crate::tools::TavilySearchTool;

    let mut registry = ToolRegistry::new();
    match config.tavily_api_key {
        Some(ref key) => {
            let mut tool = TavilySearchTool::new(key.clone());
            if let Some(ref base) = config.tavily_base_url {
                tool = tool.with_base_url(base.clone());
            }
            if let Some(n) = config.tavily_max_results {
                tool = tool.with_max_results(n);
            }
            registry.register(Arc::new(tool));
        }
        None => warn!("TAVILY_API_KEY not set, web search disabled"),
    }
    registry
}

#[cfg(not(feature = "tavily"))]
pub fn build_tool_registry(config: &ChatBuildConfig) -> ToolRegistry {
    if config.tavily_api_key.is_some() {
        warn!("built without the tavily feature, web search disabled");
    }
    ToolRegistry::new()
}

/// Run options from config, with the server's defaults for the rest.
pub fn runner_options(config: &ChatBuildConfig) -> ChatRunnerOptions {
    ChatRunnerOptions {
        system_prompt: config.system_prompt.clone(),
        recursion_limit: config.recursion_limit.unwrap_or(DEFAULT_RECURSION_LIMIT),
        unknown_tool_policy: config.unknown_tool_policy.unwrap_or_default(),
        ..ChatRunnerOptions::default()
    }
}

/// Builds a [`ChatRunner`] with an in-memory checkpointer.
///
/// When `llm` is `Some`, that client is used as is. When `None`, an OpenAI client
/// is built from config with the registry's tools bound.
///
/// # Errors
///
/// [`BuildError::NoLlm`] without an LLM and API key; [`BuildError::Compilation`]
/// for an invalid recursion limit.
pub fn build_chat_runner(
    config: &ChatBuildConfig,
    llm: Option<Box<dyn LlmClient>>,
) -> Result<ChatRunner, BuildError> {
    let registry = build_tool_registry(config);
    let llm = match llm {
        Some(l) => l,
        None => build_default_llm(config, &registry)?,
    };
    let options = runner_options(config);
    info!(
        model = %config.model_or_default(),
        tools = ?registry,
        recursion_limit = options.recursion_limit,
        "chat runner built"
    );
    let runner = ChatRunner::new(llm, registry, Arc::new(MemorySaver::new()), options)?;
    Ok(runner)
}

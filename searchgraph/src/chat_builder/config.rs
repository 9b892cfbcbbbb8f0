//! Configuration for building a [`ChatRunner`](crate::chat::ChatRunner) (LLM, search tool, run options).
//!
//! Used by [`build_chat_runner`](super::build_chat_runner). The server fills it from
//! the environment with [`ChatBuildConfig::from_env`] after loading `.env`.

use crate::llm::ToolChoiceMode;
use crate::tools::UnknownToolPolicy;

/// Default chat model when `OPENAI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Configuration for building the chat runner.
///
/// Every field is optional; `build_chat_runner` applies defaults and fails only
/// when no LLM can be built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatBuildConfig {
    /// OpenAI API key. Required to build the default LLM.
    pub openai_api_key: Option<String>,
    /// Chat model; defaults to [`DEFAULT_MODEL`].
    pub model: Option<String>,
    /// OpenAI-compatible API base (e.g. `https://api.openai.com/v1`).
    pub openai_base_url: Option<String>,
    pub temperature: Option<f32>,
    pub tool_choice: Option<ToolChoiceMode>,
    /// Tavily API key. When set, the web search tool is registered; when None, there are no tools.
    pub tavily_api_key: Option<String>,
    pub tavily_base_url: Option<String>,
    pub tavily_max_results: Option<u32>,
    /// System message prepended to new threads.
    pub system_prompt: Option<String>,
    /// Maximum node steps per run.
    pub recursion_limit: Option<usize>,
    pub unknown_tool_policy: Option<UnknownToolPolicy>,
}

impl ChatBuildConfig {
    /// Reads the config from process environment variables.
    ///
    /// `OPENAI_API_KEY`, `OPENAI_MODEL`, `OPENAI_BASE_URL` (or `OPENAI_API_BASE`),
    /// `OPENAI_TEMPERATURE`, `OPENAI_TOOL_CHOICE` (auto|none|required),
    /// `TAVILY_API_KEY`, `TAVILY_BASE_URL`, `TAVILY_MAX_RESULTS`, `SYSTEM_PROMPT`,
    /// `RECURSION_LIMIT`, `UNKNOWN_TOOL_POLICY` (reply|drop|fail).
    /// Empty values count as unset; unparsable numbers and modes are ignored.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable lookup.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            openai_api_key: var("OPENAI_API_KEY"),
            model: var("OPENAI_MODEL"),
            openai_base_url: var("OPENAI_BASE_URL").or_else(|| var("OPENAI_API_BASE")),
            temperature: parse_value(var("OPENAI_TEMPERATURE")),
            tool_choice: parse_value(var("OPENAI_TOOL_CHOICE")),
            tavily_api_key: var("TAVILY_API_KEY"),
            tavily_base_url: var("TAVILY_BASE_URL"),
            tavily_max_results: parse_value(var("TAVILY_MAX_RESULTS")),
            system_prompt: var("SYSTEM_PROMPT"),
            recursion_limit: parse_value(var("RECURSION_LIMIT")),
            unknown_tool_policy: parse_value(var("UNKNOWN_TOOL_POLICY")),
        }
    }

    /// Model name with the default applied.
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

fn parse_value<T: std::str::FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

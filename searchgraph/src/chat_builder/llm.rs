//! Builds the default OpenAI LLM from [`ChatBuildConfig`](super::ChatBuildConfig).
//!
//! Used by [`build_chat_runner`](super::build_chat_runner) when the caller passes
//! `llm: None`. Reads the key, model, base URL, temperature and tool choice from
//! the config and binds the registry's tool specs.

use crate::llm::LlmClient;
use crate::tools::ToolRegistry;

use super::config::ChatBuildConfig;
use super::error::BuildError;

/// Builds a [`ChatOpenAI`](crate::llm::ChatOpenAI) client with the registry's tools bound.
///
/// # Errors
///
/// * [`BuildError::NoLlm`] when `config.openai_api_key` is `None`.
#[cfg(feature = "openai")]
pub(crate) fn build_default_llm(
    config: &ChatBuildConfig,
    registry: &ToolRegistry,
) -> Result<Box<dyn LlmClient>, BuildError> {
    use async_openai::config::OpenAIConfig;

    use crate::llm::ChatOpenAI;

    let api_key = config.openai_api_key.as_deref().ok_or(BuildError::NoLlm)?;
    let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(ref base) = config.openai_base_url {
        // async_openai appends "/chat/completions"; a trailing slash would double it
        openai_config = openai_config.with_api_base(base.trim_end_matches('/'));
    }

    let mut client =
        ChatOpenAI::with_config(openai_config, config.model_or_default()).with_tools(registry.list());
    if let Some(t) = config.temperature {
        client = client.with_temperature(t);
    }
    if let Some(mode) = config.tool_choice {
        client = client.with_tool_choice(mode);
    }
    Ok(Box::new(client))
}

#[cfg(not(feature = "openai"))]
pub(crate) fn build_default_llm(
    _config: &ChatBuildConfig,
    _registry: &ToolRegistry,
) -> Result<Box<dyn LlmClient>, BuildError> {
    Err(BuildError::NoLlm)
}

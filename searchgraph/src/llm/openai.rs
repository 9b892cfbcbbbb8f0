//! OpenAI Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Uses the real OpenAI Chat Completions API. Requires `OPENAI_API_KEY` (or
//! explicit config). Tools bound with `with_tools` let the API return
//! `tool_calls`; `invoke_stream` reads the streamed deltas, forwards content
//! fragments and reassembles tool calls from their per-index pieces.
//!
//! **Interaction**: Implements `LlmClient`; used by the model node like `MockLlm`.
//! Depends on `async_openai` (feature `openai`).

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;
use crate::state::ToolCall;
use crate::stream::MessageChunk;
use crate::tools::ToolSpec;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCall, ChatCompletionMessageToolCalls,
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestToolMessageArgs,
        ChatCompletionRequestUserMessage, ChatCompletionTool, ChatCompletionToolChoiceOption,
        ChatCompletionTools, CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
        FunctionCall, FunctionObject, ToolChoiceOptions,
    },
    Client,
};

use super::ToolChoiceMode;

/// OpenAI Chat Completions client implementing `LlmClient` (aligns with LangChain ChatOpenAI).
///
/// Uses `OPENAI_API_KEY` from the environment by default; or provide
/// config via `ChatOpenAI::with_config`.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    tools: Option<Vec<ToolSpec>>,
    temperature: Option<f32>,
    tool_choice: Option<ToolChoiceMode>,
}

/// Tool call being reassembled from stream deltas.
#[derive(Default)]
struct PartialToolCall {
    id: Option<String>,
    name: String,
    arguments: String,
}

/// Merges streamed tool-call fragments by their `index`.
///
/// Name and argument fragments are concatenated; the last id seen wins. Entries
/// that never received a name are dropped, and entries without an id get `call_{index}`.
#[derive(Default)]
struct ToolCallDeltas {
    partial: BTreeMap<u32, PartialToolCall>,
}

impl ToolCallDeltas {
    fn push(
        &mut self,
        index: u32,
        id: Option<String>,
        name: Option<String>,
        arguments: Option<String>,
    ) {
        let entry = self.partial.entry(index).or_default();
        if let Some(id) = id {
            entry.id = Some(id);
        }
        if let Some(name) = name {
            entry.name.push_str(&name);
        }
        if let Some(arguments) = arguments {
            entry.arguments.push_str(&arguments);
        }
    }

    fn finish(self) -> Vec<ToolCall> {
        self.partial
            .into_iter()
            .filter(|(_, p)| !p.name.is_empty())
            .map(|(index, p)| {
                let id = p.id.unwrap_or_else(|| format!("call_{}", index));
                ToolCall::from_raw_arguments(id, p.name, &p.arguments)
            })
            .collect()
    }
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new(), model)
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            tools: None,
            temperature: None,
            tool_choice: None,
        }
    }

    /// Set tools for this completion (enables tool_calls in response).
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = if tools.is_empty() { None } else { Some(tools) };
        self
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set tool choice mode (auto, none, required). Overrides API default when tools are present.
    pub fn with_tool_choice(mut self, mode: ToolChoiceMode) -> Self {
        self.tool_choice = Some(mode);
        self
    }

    /// Convert our `Message` list to OpenAI request messages.
    fn messages_to_request(
        messages: &[Message],
    ) -> Result<Vec<ChatCompletionRequestMessage>, AgentError> {
        messages
            .iter()
            .map(|m| {
                let msg = match m {
                    Message::System { content } => ChatCompletionRequestMessage::System(
                        ChatCompletionRequestSystemMessage::from(content.as_str()),
                    ),
                    Message::User { content } => ChatCompletionRequestMessage::User(
                        ChatCompletionRequestUserMessage::from(content.as_str()),
                    ),
                    Message::Assistant {
                        content,
                        tool_calls,
                    } => {
                        let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                        if !content.is_empty() {
                            args.content(content.as_str());
                        }
                        if !tool_calls.is_empty() {
                            args.tool_calls(
                                tool_calls
                                    .iter()
                                    .map(|tc| {
                                        ChatCompletionMessageToolCalls::Function(
                                            ChatCompletionMessageToolCall {
                                                id: tc.id.clone(),
                                                function: FunctionCall {
                                                    name: tc.name.clone(),
                                                    arguments: tc.arguments.to_string(),
                                                },
                                            },
                                        )
                                    })
                                    .collect::<Vec<_>>(),
                            );
                        }
                        ChatCompletionRequestMessage::Assistant(args.build().map_err(build_err)?)
                    }
                    Message::Tool {
                        tool_call_id,
                        content,
                        ..
                    } => ChatCompletionRequestMessage::Tool(
                        ChatCompletionRequestToolMessageArgs::default()
                            .content(content.as_str())
                            .tool_call_id(tool_call_id.as_str())
                            .build()
                            .map_err(build_err)?,
                    ),
                };
                Ok(msg)
            })
            .collect()
    }

    fn build_request(
        &self,
        messages: &[Message],
        stream: bool,
    ) -> Result<CreateChatCompletionRequest, AgentError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(Self::messages_to_request(messages)?);
        if stream {
            args.stream(true);
        }

        if let Some(ref tools) = self.tools {
            let chat_tools: Vec<ChatCompletionTools> = tools
                .iter()
                .map(|t| {
                    ChatCompletionTools::Function(ChatCompletionTool {
                        function: FunctionObject {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: Some(t.input_schema.clone()),
                            ..Default::default()
                        },
                    })
                })
                .collect();
            args.tools(chat_tools);

            if let Some(mode) = self.tool_choice {
                let opt = match mode {
                    ToolChoiceMode::Auto => ToolChoiceOptions::Auto,
                    ToolChoiceMode::None => ToolChoiceOptions::None,
                    ToolChoiceMode::Required => ToolChoiceOptions::Required,
                };
                args.tool_choice(ChatCompletionToolChoiceOption::Mode(opt));
            }
        }

        if let Some(t) = self.temperature {
            args.temperature(t);
        }

        args.build().map_err(build_err)
    }
}

fn build_err(e: impl std::fmt::Display) -> AgentError {
    AgentError::ExecutionFailed(format!("OpenAI request build failed: {}", e))
}

fn api_err(e: impl std::fmt::Display) -> AgentError {
    AgentError::ExecutionFailed(format!("OpenAI API error: {}", e))
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let request = self.build_request(messages, false)?;
        let response = self.client.chat().create(request).await.map_err(api_err)?;

        let choice =
            response.choices.into_iter().next().ok_or_else(|| {
                AgentError::ExecutionFailed("OpenAI returned no choices".to_string())
            })?;

        let msg = choice.message;
        let content = msg.content.unwrap_or_default();
        let tool_calls: Vec<ToolCall> = msg
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tc| {
                if let ChatCompletionMessageToolCalls::Function(f) = tc {
                    Some(ToolCall::from_raw_arguments(
                        f.id,
                        f.function.name,
                        &f.function.arguments,
                    ))
                } else {
                    None
                }
            })
            .collect();

        Ok(LlmResponse {
            content,
            tool_calls,
        })
    }

    async fn invoke_stream(
        &self,
        messages: &[Message],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
    ) -> Result<LlmResponse, AgentError> {
        let request = self.build_request(messages, true)?;
        let mut stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(api_err)?;

        let mut content = String::new();
        let mut deltas = ToolCallDeltas::default();

        while let Some(item) = stream.next().await {
            let response = item.map_err(api_err)?;
            for choice in response.choices {
                let delta = choice.delta;
                if let Some(text) = delta.content.filter(|t| !t.is_empty()) {
                    content.push_str(&text);
                    if let Some(ref tx) = chunk_tx {
                        let _ = tx.send(MessageChunk { content: text }).await;
                    }
                }
                for tc in delta.tool_calls.unwrap_or_default() {
                    let (name, arguments) = match tc.function {
                        Some(f) => (f.name, f.arguments),
                        None => (None, None),
                    };
                    deltas.push(tc.index, tc.id, name, arguments);
                }
            }
        }

        let tool_calls = deltas.finish();

        Ok(LlmResponse {
            content,
            tool_calls,
        })
    }
}

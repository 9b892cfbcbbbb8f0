//! Scripted LLM for tests and examples.
//!
//! Returns queued responses in order (the last one repeats), streams content
//! word by word, and records every message list it was called with.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::mpsc;

use crate::error::AgentError;
use crate::message::Message;
use crate::state::ToolCall;
use crate::stream::MessageChunk;
use crate::tools::TOOL_TAVILY_SEARCH;

use super::{LlmClient, LlmResponse};

/// Mock LLM client with a queue of scripted responses.
///
/// **Interaction**: Implements `LlmClient`; used by the model node in tests and
/// by the server tests in place of `ChatOpenAI`.
pub struct MockLlm {
    script: Mutex<VecDeque<Result<LlmResponse, String>>>,
    seen: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockLlm {
    /// Plays `responses` in order; once one remains it is returned on every call.
    pub fn scripted(responses: Vec<LlmResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().map(Ok).collect()),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answers `content` with no tool calls.
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::scripted(vec![LlmResponse::answer(content)])
    }

    /// First asks the search tool for `query`, then answers `answer`.
    pub fn with_search_then_answer(query: &str, answer: impl Into<String>) -> Self {
        Self::scripted(vec![
            LlmResponse::tool_calls(vec![ToolCall::new(
                "call_1",
                TOOL_TAVILY_SEARCH,
                json!({ "query": query }),
            )]),
            LlmResponse::answer(answer),
        ])
    }

    /// Every call fails with `AgentError::ExecutionFailed(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::from([Err(message.into())])),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared log of the message lists passed to each call.
    pub fn seen_messages(&self) -> Arc<Mutex<Vec<Vec<Message>>>> {
        Arc::clone(&self.seen)
    }

    fn next_response(&self) -> Result<LlmResponse, String> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| "mock script lock poisoned".to_string())?;
        if script.len() > 1 {
            script
                .pop_front()
                .unwrap_or_else(|| Ok(LlmResponse::default()))
        } else {
            script
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(LlmResponse::default()))
        }
    }

    fn record(&self, messages: &[Message]) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(messages.to_vec());
        }
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        self.record(messages);
        self.next_response().map_err(AgentError::ExecutionFailed)
    }

    async fn invoke_stream(
        &self,
        messages: &[Message],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
    ) -> Result<LlmResponse, AgentError> {
        let response = self.invoke(messages).await?;
        if let Some(tx) = chunk_tx {
            for word in response.content.split_inclusive(' ') {
                let _ = tx
                    .send(MessageChunk {
                        content: word.to_string(),
                    })
                    .await;
            }
        }
        Ok(response)
    }
}

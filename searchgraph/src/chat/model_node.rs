//! Model node: read messages, call the LLM, append the assistant message.
//!
//! Routes to the tools node when the model asked for tools and ends the run
//! otherwise; this is the `AWAITING_MODEL` state of the turn loop.
//!
//! # Streaming Support
//!
//! `run_with_context` uses `LlmClient::invoke_stream()` when `StreamMode::Messages`
//! is enabled, forwarding each `MessageChunk` as `StreamEvent::Messages`, then
//! emits `StreamEvent::ModelEnd` with the requested tool calls.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::AgentError;
use crate::graph::{Next, Node, RunContext};
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;
use crate::state::ChatState;
use crate::stream::{MessageChunk, StreamEvent, StreamMetadata, StreamMode};

/// Node id of the model node.
pub const MODEL_NODE: &str = "model";

/// Model node: one LLM completion over the thread's messages.
///
/// **Interaction**: Implements `Node<ChatState>`; consumes `LlmClient` (e.g.
/// MockLlm, ChatOpenAI); writes one `Message::Assistant` to `ChatState::messages`.
pub struct ModelNode {
    llm: Box<dyn LlmClient>,
}

impl ModelNode {
    pub fn new(llm: Box<dyn LlmClient>) -> Self {
        Self { llm }
    }

    fn apply(state: ChatState, response: LlmResponse) -> (ChatState, Next) {
        let next = if response.tool_calls.is_empty() {
            Next::End
        } else {
            Next::Continue
        };
        let mut messages = state.messages;
        messages.push(Message::assistant_with_tools(
            response.content,
            response.tool_calls,
        ));
        (ChatState { messages }, next)
    }
}

#[async_trait]
impl Node<ChatState> for ModelNode {
    fn id(&self) -> &str {
        MODEL_NODE
    }

    /// Calls the LLM; `Next::Continue` (to tools) when tool calls came back, else `Next::End`.
    async fn run(&self, state: ChatState) -> Result<(ChatState, Next), AgentError> {
        let response = self.llm.invoke(&state.messages).await?;
        Ok(Self::apply(state, response))
    }

    async fn run_with_context(
        &self,
        state: ChatState,
        ctx: &RunContext<ChatState>,
    ) -> Result<(ChatState, Next), AgentError> {
        let response = match ctx.stream_tx.clone() {
            Some(stream_tx) if ctx.wants(StreamMode::Messages) => {
                let (chunk_tx, mut chunk_rx) = mpsc::channel::<MessageChunk>(128);
                let node = self.id().to_string();

                let forward_task = tokio::spawn(async move {
                    while let Some(chunk) = chunk_rx.recv().await {
                        let event = StreamEvent::Messages {
                            chunk,
                            metadata: StreamMetadata { node: node.clone() },
                        };
                        // Consumer may have dropped
                        let _ = stream_tx.send(event).await;
                    }
                });

                let result = self.llm.invoke_stream(&state.messages, Some(chunk_tx)).await;

                // chunk_tx is dropped once invoke_stream returns, so the forwarder drains and exits
                let _ = forward_task.await;
                result?
            }
            _ => self.llm.invoke(&state.messages).await?,
        };

        ctx.emit(
            StreamMode::Messages,
            StreamEvent::ModelEnd {
                tool_calls: response.tool_calls.clone(),
            },
        )
        .await;

        Ok(Self::apply(state, response))
    }
}

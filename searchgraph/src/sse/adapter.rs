//! Adapter from run events to SSE lines.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::state::ChatState;
use crate::stream::StreamEvent;

use super::event::{extract_urls, ChatStreamEvent};

/// Converts `StreamEvent`s of one run into SSE lines written to a channel sink.
///
/// Guarantees at most one `end`, and nothing after it. A closed sink (client
/// gone) is remembered and later writes are skipped.
///
/// **Interaction**: Fed by [`publish_chat`](super::publish_chat) from
/// `ChatRunner::stream`; the sink's receiver becomes the HTTP body.
pub struct StreamToSse {
    sink: mpsc::Sender<String>,
    search_tools: Vec<String>,
    ended: bool,
    closed: bool,
}

impl StreamToSse {
    /// `search_tools` are the tool names whose calls produce search events.
    pub fn new(search_tools: Vec<String>, sink: mpsc::Sender<String>) -> Self {
        Self {
            sink,
            search_tools,
            ended: false,
            closed: false,
        }
    }

    fn is_search(&self, name: &str) -> bool {
        self.search_tools.iter().any(|t| t == name)
    }

    /// Wire event for one run event, if it has one.
    pub fn map_event(&self, event: &StreamEvent<ChatState>) -> Option<ChatStreamEvent> {
        match event {
            StreamEvent::Messages { chunk, .. } if !chunk.content.is_empty() => {
                Some(ChatStreamEvent::Content {
                    content: chunk.content.clone(),
                })
            }
            StreamEvent::ModelEnd { tool_calls } => tool_calls
                .iter()
                .find(|call| self.is_search(&call.name))
                .map(|call| ChatStreamEvent::SearchStart {
                    query: call.str_arg("query").unwrap_or_default().to_string(),
                }),
            StreamEvent::ToolEnd { name, output, .. } if self.is_search(name) => {
                Some(ChatStreamEvent::SearchResults {
                    urls: extract_urls(output),
                })
            }
            StreamEvent::Error(message) => Some(ChatStreamEvent::Error {
                message: message.clone(),
            }),
            _ => None,
        }
    }

    async fn send(&mut self, event: ChatStreamEvent) {
        if self.ended || self.closed {
            return;
        }
        let line = match event.to_sse_line() {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to encode SSE event");
                return;
            }
        };
        if self.sink.send(line).await.is_err() {
            debug!("SSE client disconnected");
            self.closed = true;
        }
    }

    /// Announces the id of a newly created thread.
    pub async fn checkpoint(&mut self, thread_id: &str) {
        self.send(ChatStreamEvent::Checkpoint {
            checkpoint_id: thread_id.to_string(),
        })
        .await;
    }

    /// Reports a failure that happened outside the run's own event stream.
    pub async fn error(&mut self, message: impl Into<String>) {
        self.send(ChatStreamEvent::Error {
            message: message.into(),
        })
        .await;
    }

    pub async fn feed(&mut self, event: StreamEvent<ChatState>) {
        if let Some(wire) = self.map_event(&event) {
            self.send(wire).await;
        }
    }

    /// Sends `end` once; later calls and events are ignored.
    pub async fn finish(&mut self) {
        self.send(ChatStreamEvent::End).await;
        self.ended = true;
    }
}

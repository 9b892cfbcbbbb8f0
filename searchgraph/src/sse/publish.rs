//! One chat request from thread id to final `end`.

use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tracing::{debug, error};
use uuid::Uuid;

use crate::chat::ChatRunner;

use super::adapter::StreamToSse;

/// Runs `message` against a thread and writes the SSE lines into `sink`.
///
/// Without `checkpoint_id` a new thread id (UUID v4) is generated and sent
/// first as a `checkpoint` event. With an id, the thread is resumed (or created
/// under that id if it does not exist) and no `checkpoint` event is sent.
///
/// Every call ends with exactly one `end`; a failed run sends `error` before it.
/// The run continues to completion if the receiver of `sink` is dropped.
pub async fn publish_chat(
    runner: &ChatRunner,
    message: &str,
    checkpoint_id: Option<String>,
    sink: mpsc::Sender<String>,
) {
    let mut adapter = StreamToSse::new(runner.search_tool_names(), sink);

    let thread_id = match checkpoint_id {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4().to_string();
            adapter.checkpoint(&id).await;
            id
        }
    };
    debug!(thread_id = %thread_id, "chat stream started");

    match runner.stream(message, &thread_id).await {
        Ok(mut events) => {
            while let Some(event) = events.next().await {
                adapter.feed(event).await;
            }
        }
        Err(e) => {
            error!(thread_id = %thread_id, error = %e, "chat run failed to start");
            adapter.error(e.to_string()).await;
        }
    }

    adapter.finish().await;
    debug!(thread_id = %thread_id, "chat stream finished");
}

//! Run context passed into nodes for streaming-aware execution.
//!
//! Holds runnable config and optional stream sender plus selected stream modes.

use std::collections::HashSet;
use std::fmt::Debug;

use tokio::sync::mpsc;

use crate::memory::RunnableConfig;
use crate::stream::{StreamEvent, StreamMode};

#[derive(Clone)]
pub struct RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Config for the current run (thread_id).
    pub config: RunnableConfig,
    /// Optional sender for streaming events.
    pub stream_tx: Option<mpsc::Sender<StreamEvent<S>>>,
    /// Enabled stream modes.
    pub stream_mode: HashSet<StreamMode>,
}

impl<S> RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// True when `mode` is enabled and there is a sender to receive it.
    pub fn wants(&self, mode: StreamMode) -> bool {
        self.stream_tx.is_some() && self.stream_mode.contains(&mode)
    }

    /// Sends `event` when `mode` is enabled. A dropped consumer is not an error.
    pub async fn emit(&self, mode: StreamMode, event: StreamEvent<S>) {
        if !self.stream_mode.contains(&mode) {
            return;
        }
        if let Some(tx) = &self.stream_tx {
            let _ = tx.send(event).await;
        }
    }
}

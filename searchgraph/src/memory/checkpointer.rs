//! Checkpointer trait: the storage capability behind threads.
//!
//! The turn loop only reads the latest snapshot (`get_tuple`) and appends new
//! ones (`put`); a persistent backend implements the same trait.

use async_trait::async_trait;
use thiserror::Error;

use super::{Checkpoint, CheckpointListItem, CheckpointMetadata, RunnableConfig};

/// Errors from checkpoint storage.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("thread_id is required")]
    ThreadIdRequired,
    #[error("storage error: {0}")]
    Storage(String),
}

/// Saves and loads per-thread state snapshots.
#[async_trait]
pub trait Checkpointer<S>: Send + Sync
where
    S: Clone + Send + Sync + 'static,
{
    /// Appends a checkpoint to the thread named by `config.thread_id`; returns its id.
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: &Checkpoint<S>,
    ) -> Result<String, CheckpointError>;

    /// Latest checkpoint of the thread; `Ok(None)` when the thread does not exist.
    async fn get_tuple(
        &self,
        config: &RunnableConfig,
    ) -> Result<Option<(Checkpoint<S>, CheckpointMetadata)>, CheckpointError>;

    /// All checkpoints of the thread, oldest first.
    async fn list(&self, config: &RunnableConfig)
        -> Result<Vec<CheckpointListItem>, CheckpointError>;
}

//! In-memory checkpointer keyed by thread id.
//!
//! State lives for the lifetime of the process; there is no eviction.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{
    Checkpoint, CheckpointError, CheckpointListItem, CheckpointMetadata, Checkpointer,
    RunnableConfig,
};

/// In-memory `Checkpointer`: one ordered list of checkpoints per thread.
///
/// Distinct threads live in separate map shards, so they do not contend.
pub struct MemorySaver<S> {
    threads: DashMap<String, Vec<Checkpoint<S>>>,
}

impl<S> Default for MemorySaver<S> {
    fn default() -> Self {
        Self {
            threads: DashMap::new(),
        }
    }
}

impl<S> MemorySaver<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of threads with at least one checkpoint.
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Drops every thread.
    pub fn clear(&self) {
        self.threads.clear();
    }
}

fn thread_id(config: &RunnableConfig) -> Result<&str, CheckpointError> {
    config
        .thread_id
        .as_deref()
        .ok_or(CheckpointError::ThreadIdRequired)
}

#[async_trait]
impl<S> Checkpointer<S> for MemorySaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: &Checkpoint<S>,
    ) -> Result<String, CheckpointError> {
        let tid = thread_id(config)?;
        self.threads
            .entry(tid.to_string())
            .or_default()
            .push(checkpoint.clone());
        Ok(checkpoint.id.clone())
    }

    async fn get_tuple(
        &self,
        config: &RunnableConfig,
    ) -> Result<Option<(Checkpoint<S>, CheckpointMetadata)>, CheckpointError> {
        let tid = thread_id(config)?;
        Ok(self
            .threads
            .get(tid)
            .and_then(|list| list.last().map(|c| (c.clone(), c.metadata.clone()))))
    }

    async fn list(
        &self,
        config: &RunnableConfig,
    ) -> Result<Vec<CheckpointListItem>, CheckpointError> {
        let tid = thread_id(config)?;
        Ok(self
            .threads
            .get(tid)
            .map(|list| {
                list.iter()
                    .map(|c| CheckpointListItem {
                        checkpoint_id: c.id.clone(),
                        metadata: c.metadata.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

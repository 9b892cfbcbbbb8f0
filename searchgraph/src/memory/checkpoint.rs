//! Checkpoint and metadata types.
//!
//! A checkpoint is one saved snapshot of a thread's state plus the metadata
//! describing which step produced it.

use std::time::SystemTime;

/// Metadata for a single checkpoint (source, step, created_at).
#[derive(Debug, Clone)]
pub struct CheckpointMetadata {
    pub source: CheckpointSource,
    pub step: u64,
    pub created_at: Option<SystemTime>,
}

/// Source of the checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointSource {
    /// Saved when a new user message was appended, before any node ran.
    Input,
    /// Saved after a node step inside the run loop.
    Loop,
}

/// One checkpoint: state snapshot + id/ts + metadata.
///
/// Stored by Checkpointer keyed by (thread_id, checkpoint_id).
#[derive(Debug, Clone)]
pub struct Checkpoint<S> {
    pub id: String,
    pub ts: String,
    pub channel_values: S,
    pub metadata: CheckpointMetadata,
}

/// Item returned by Checkpointer::list for thread history.
#[derive(Debug, Clone)]
pub struct CheckpointListItem {
    pub checkpoint_id: String,
    pub metadata: CheckpointMetadata,
}

impl<S> Checkpoint<S> {
    /// Creates a checkpoint from current state. Uses current time for ts and a fresh UUID for id.
    pub fn from_state(state: S, source: CheckpointSource, step: u64) -> Self {
        let now = SystemTime::now();
        let ts = format!(
            "{}",
            now.duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0)
        );
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ts,
            channel_values: state,
            metadata: CheckpointMetadata {
                source,
                step,
                created_at: Some(now),
            },
        }
    }
}

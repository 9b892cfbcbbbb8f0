//! # Memory: thread checkpointing
//!
//! Threads are stored as ordered lists of state snapshots behind the
//! [`Checkpointer`] trait. [`MemorySaver`] keeps them in process memory;
//! [`ThreadLocks`] serializes concurrent runs against one thread.
//!
//! [`RunnableConfig`] names the thread (and optionally a checkpoint) for a run.

mod checkpoint;
mod checkpointer;
mod config;
mod memory_saver;
mod thread_lock;

pub use checkpoint::{Checkpoint, CheckpointListItem, CheckpointMetadata, CheckpointSource};
pub use checkpointer::{CheckpointError, Checkpointer};
pub use config::RunnableConfig;
pub use memory_saver::MemorySaver;
pub use thread_lock::ThreadLocks;

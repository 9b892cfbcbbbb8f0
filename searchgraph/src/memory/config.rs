//! Run config: the thread a run reads and writes.
//!
//! Aligns with LangGraph's config["configurable"]. Used by
//! `CompiledStateGraph::invoke` / `stream` and by `Checkpointer`.

/// Config for a single run. Identifies the thread.
///
/// When using a checkpointer, the run must provide a `thread_id`; runs without
/// one are not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnableConfig {
    /// Unique id for this conversation/thread. Required when using a checkpointer.
    pub thread_id: Option<String>,
}

impl RunnableConfig {
    /// Config for `thread_id`.
    pub fn for_thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
        }
    }
}

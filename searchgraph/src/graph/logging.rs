//! Logging helpers for graph execution.
//!
//! Structured `tracing` events for node start/complete, checkpoint saves and
//! run failures, so every run logs the same fields.

use crate::error::AgentError;
use crate::graph::Next;

/// Log node execution start.
pub fn log_node_start(node_id: &str, step: usize) {
    tracing::debug!(node_id, step, "Starting node execution");
}

/// Log node execution completion with the routing decision.
pub fn log_node_complete(node_id: &str, next: &Next) {
    tracing::debug!(node_id, ?next, "Node execution complete");
}

/// Log a checkpoint save for a thread.
pub fn log_checkpoint_saved(thread_id: &str, checkpoint_id: &str, step: u64) {
    tracing::trace!(thread_id, checkpoint_id, step, "Checkpoint saved");
}

/// Log graph execution start.
pub fn log_graph_start(thread_id: Option<&str>) {
    tracing::info!(thread_id = ?thread_id, "Starting graph execution");
}

/// Log graph execution completion.
pub fn log_graph_complete(steps: usize) {
    tracing::info!(steps, "Graph execution complete");
}

/// Log graph execution error.
pub fn log_graph_error(error: &AgentError) {
    tracing::error!(error = %error, "Graph execution error");
}

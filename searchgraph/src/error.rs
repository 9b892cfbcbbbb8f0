//! Agent execution error types.
//!
//! Returned by graph nodes and `CompiledStateGraph` runs. Tool and checkpoint
//! layers keep their own error enums and are converted at the node boundary.

use thiserror::Error;

/// Agent execution error.
///
/// Returned by `Node::run` when a step fails, and by the compiled graph when
/// the run cannot make progress.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. LLM call failed, tool error).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The model/tool loop ran more node steps than the configured limit.
    #[error("recursion limit of {0} steps reached without a final answer")]
    RecursionLimit(usize),

    /// The model asked for a tool that is not registered (with `UnknownToolPolicy::Fail`).
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

//! Errors from building the chat runner.

use thiserror::Error;

use crate::graph::CompilationError;

/// Error when building a [`ChatRunner`](crate::chat::ChatRunner) from config.
#[derive(Debug, Error)]
pub enum BuildError {
    /// No LLM passed in and none could be built (missing key or `openai` feature off).
    #[error("no LLM available: OPENAI_API_KEY must be set")]
    NoLlm,
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompilationError),
}

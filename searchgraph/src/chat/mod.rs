//! Turn controller: the `model` / `tools` loop and the runner that drives it.
//!
//! - [`ModelNode`]: asks the LLM; ends the run when no tools were requested.
//! - [`ToolNode`]: runs the requested tools and loops back to the model.
//! - [`ChatRunner`]: compiles the graph, loads and saves threads, streams runs.

mod model_node;
mod runner;
mod tool_node;

pub use model_node::{ModelNode, MODEL_NODE};
pub use runner::{ChatRunner, ChatRunnerOptions, RunError, INTERRUPTED_TOOL_REPLY};
pub use tool_node::{
    ErrorHandlerFn, HandleToolErrors, ToolNode, DEFAULT_EXECUTION_ERROR_TEMPLATE,
    DEFAULT_TOOL_ERROR_TEMPLATE, TOOLS_NODE,
};

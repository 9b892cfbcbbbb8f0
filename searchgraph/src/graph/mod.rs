//! State graph: nodes + linear edges with jumps, compile and run.
//!
//! Nodes return `Next` to continue the edge order, jump to another node, or
//! end. Back-jumps make loops possible; the compiled graph bounds them with a
//! recursion limit.

mod compile_error;
mod compiled;
pub mod logging;
mod next;
mod node;
mod run_context;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::{CompiledStateGraph, DEFAULT_RECURSION_LIMIT};
pub use next::Next;
pub use node::Node;
pub use run_context::RunContext;
pub use state_graph::{StateGraph, END, START};

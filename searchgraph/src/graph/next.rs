//! Routing decision returned by a node.

/// What the compiled graph runs after a node returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Next {
    /// Follow the linear edge order; end after the last node.
    Continue,
    /// Jump to the node with this id (`END` stops the run).
    Node(String),
    /// Stop the run with the current state.
    End,
}

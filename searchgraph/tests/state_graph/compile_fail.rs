//! StateGraph compile failure cases: unknown node, missing START/END, invalid chain.

use std::sync::Arc;

use searchgraph::graph::{END, START};
use searchgraph::{CompilationError, StateGraph};

use crate::common::{CounterState, IncrementNode};

#[tokio::test]
async fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::<CounterState>::new();
    graph.add_node("a", Arc::new(IncrementNode::new("a")));
    graph.add_edge(START, "a");
    graph.add_edge("a", "missing");

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "missing"),
        _ => panic!("expected NodeNotFound"),
    }
}

#[tokio::test]
async fn compile_fails_without_start_edge() {
    let mut graph = StateGraph::<CounterState>::new();
    graph.add_node("a", Arc::new(IncrementNode::new("a")));
    graph.add_edge("a", END);

    assert!(matches!(graph.compile(), Err(CompilationError::MissingStart)));
}

#[tokio::test]
async fn compile_fails_without_end_edge() {
    let mut graph = StateGraph::<CounterState>::new();
    graph.add_node("a", Arc::new(IncrementNode::new("a")));
    graph.add_edge(START, "a");

    assert!(matches!(graph.compile(), Err(CompilationError::MissingEnd)));
}

#[tokio::test]
async fn compile_fails_on_branch() {
    let mut graph = StateGraph::<CounterState>::new();
    graph
        .add_node("a", Arc::new(IncrementNode::new("a")))
        .add_node("b", Arc::new(IncrementNode::new("b")))
        .add_node("c", Arc::new(IncrementNode::new("c")))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("a", "c")
        .add_edge("c", END);

    assert!(matches!(graph.compile(), Err(CompilationError::InvalidChain(_))));
}

#[tokio::test]
async fn compile_fails_with_zero_recursion_limit() {
    let mut graph = StateGraph::<CounterState>::new().with_recursion_limit(0);
    graph.add_node("a", Arc::new(IncrementNode::new("a")));
    graph.add_edge(START, "a").add_edge("a", END);

    assert!(matches!(graph.compile(), Err(CompilationError::ZeroRecursionLimit)));
}

//! StateGraph invoke: linear chain, early end, checkpoints per step.

use std::sync::Arc;

use searchgraph::graph::{END, START};
use searchgraph::{CheckpointSource, Checkpointer, MemorySaver, RunnableConfig, StateGraph};

use crate::common::{CounterState, IncrementNode};

#[tokio::test]
async fn invoke_runs_chain_in_edge_order() {
    let mut graph = StateGraph::<CounterState>::new();
    graph
        .add_node("a", Arc::new(IncrementNode::new("a")))
        .add_node("b", Arc::new(IncrementNode::new("b")))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let compiled = graph.compile().unwrap();

    let out = compiled.invoke(CounterState::default(), None).await.unwrap();
    assert_eq!(out.count, 2);
    assert_eq!(out.visited, vec!["a", "b"]);
}

#[tokio::test]
async fn next_end_stops_before_later_nodes() {
    let mut graph = StateGraph::<CounterState>::new();
    graph
        .add_node("a", Arc::new(IncrementNode::stopping_at("a", 1)))
        .add_node("b", Arc::new(IncrementNode::new("b")))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let out = graph
        .compile()
        .unwrap()
        .invoke(CounterState::default(), None)
        .await
        .unwrap();
    assert_eq!(out.visited, vec!["a"]);
}

#[tokio::test]
async fn checkpointer_saves_each_step_for_thread() {
    let saver = Arc::new(MemorySaver::<CounterState>::new());
    let mut graph = StateGraph::<CounterState>::new();
    graph
        .add_node("a", Arc::new(IncrementNode::new("a")))
        .add_node("b", Arc::new(IncrementNode::new("b")))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let compiled = graph.compile_with_checkpointer(saver.clone()).unwrap();

    let config = RunnableConfig::for_thread("t1");
    compiled
        .invoke(CounterState::default(), Some(config.clone()))
        .await
        .unwrap();

    let items = saver.list(&config).await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items
        .iter()
        .all(|i| i.metadata.source == CheckpointSource::Loop));
    let (latest, _) = saver.get_tuple(&config).await.unwrap().unwrap();
    assert_eq!(latest.channel_values.count, 2);
}

//! State graph: nodes + explicit edges (from → to).
//!
//! Add nodes with `add_node`, define the chain with `add_edge(from, to)` using
//! `START` and `END` for graph entry/exit, then `compile` or
//! `compile_with_checkpointer` to get a `CompiledStateGraph`. Loops are built by
//! nodes returning `Next::Node` to an earlier id.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::{CompiledStateGraph, DEFAULT_RECURSION_LIMIT};
use crate::graph::node::Node;
use crate::memory::Checkpointer;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to_id` in `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

/// State graph: nodes plus explicit edges.
///
/// Generic over state type `S`. Build with `add_node` / `add_edge(from, to)`,
/// then `compile()` to obtain an executable graph.
pub struct StateGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// Edges (from_id, to_id). Compiled graph derives linear execution order from these.
    edges: Vec<(String, String)>,
    recursion_limit: usize,
}

impl<S> Default for StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Creates an empty graph with the default recursion limit.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Sets the maximum number of node steps one run may take.
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Adds a node; id must be unique. Replaces if same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds an edge from `from_id` to `to_id`.
    ///
    /// Use `START` for graph entry and `END` for graph exit. Edges must form a
    /// single linear chain: one edge from START, one edge to END.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Builds the executable graph without persistence.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.compile_internal(None)
    }

    /// Builds the executable graph with a checkpointer. Runs whose config has a
    /// `thread_id` save the state after every node step.
    pub fn compile_with_checkpointer(
        self,
        checkpointer: Arc<dyn Checkpointer<S>>,
    ) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.compile_internal(Some(checkpointer))
    }

    fn compile_internal(
        self,
        checkpointer: Option<Arc<dyn Checkpointer<S>>>,
    ) -> Result<CompiledStateGraph<S>, CompilationError> {
        if self.recursion_limit == 0 {
            return Err(CompilationError::ZeroRecursionLimit);
        }
        for (from, to) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
        }

        let mut start_edges = self.edges.iter().filter(|(f, _)| f == START);
        let first = match (start_edges.next(), start_edges.next()) {
            (Some((_, t)), None) => t.clone(),
            _ => return Err(CompilationError::MissingStart),
        };

        let mut end_edges = self.edges.iter().filter(|(_, t)| t == END);
        let expected_last = match (end_edges.next(), end_edges.next()) {
            (Some((f, _)), None) => f.clone(),
            _ => return Err(CompilationError::MissingEnd),
        };

        let mut next_map: HashMap<String, String> = HashMap::new();
        for (from, to) in self.edges.iter().filter(|(f, _)| f.as_str() != START) {
            if next_map.insert(from.clone(), to.clone()).is_some() {
                return Err(CompilationError::InvalidChain("duplicate from (branch)".into()));
            }
        }

        let mut edge_order = vec![first.clone()];
        let mut current = first;
        let mut visited = HashSet::from([current.clone()]);
        while let Some(next) = next_map.get(&current) {
            if next == END {
                if current != expected_last {
                    return Err(CompilationError::InvalidChain(
                        "chain tail does not match the single edge to END".into(),
                    ));
                }
                break;
            }
            if !visited.insert(next.clone()) {
                return Err(CompilationError::InvalidChain("cycle detected".into()));
            }
            edge_order.push(next.clone());
            current = next.clone();
        }
        if current != expected_last {
            return Err(CompilationError::InvalidChain(
                "chain does not reach END".into(),
            ));
        }

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            edge_order,
            checkpointer,
            recursion_limit: self.recursion_limit,
        })
    }
}

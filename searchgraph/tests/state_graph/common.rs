//! Shared state and node for the StateGraph tests.

use async_trait::async_trait;
use searchgraph::{AgentError, Next, Node};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterState {
    pub count: u32,
    pub visited: Vec<String>,
}

/// Adds one to the count and records its id; stops the run once `stop_at` is reached.
pub struct IncrementNode {
    id: String,
    stop_at: Option<u32>,
}

impl IncrementNode {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            stop_at: None,
        }
    }

    pub fn stopping_at(id: &str, stop_at: u32) -> Self {
        Self {
            id: id.to_string(),
            stop_at: Some(stop_at),
        }
    }
}

#[async_trait]
impl Node<CounterState> for IncrementNode {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, mut state: CounterState) -> Result<(CounterState, Next), AgentError> {
        state.count += 1;
        state.visited.push(self.id.clone());
        let next = match self.stop_at {
            Some(n) if state.count >= n => Next::End,
            _ => Next::Continue,
        };
        Ok((state, next))
    }
}

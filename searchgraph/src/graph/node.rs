//! Node trait: one step of a state graph.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::AgentError;

use super::{Next, RunContext};

/// One graph step: state in, state out, plus where to go next.
///
/// `run_with_context` is called when the graph is streamed; nodes that emit
/// incremental events override it. The default ignores the context.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Node id used in logs and stream metadata.
    fn id(&self) -> &str;

    async fn run(&self, state: S) -> Result<(S, Next), AgentError>;

    async fn run_with_context(
        &self,
        state: S,
        _ctx: &RunContext<S>,
    ) -> Result<(S, Next), AgentError> {
        self.run(state).await
    }
}

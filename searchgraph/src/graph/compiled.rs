//! Compiled state graph: immutable, supports invoke and stream.
//!
//! Built by `StateGraph::compile` or `compile_with_checkpointer`. Holds nodes,
//! the edge order derived at compile time, an optional checkpointer and the
//! recursion limit. When a checkpointer is set and config.thread_id is
//! provided, the state is saved after every node step.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::AgentError;
use crate::memory::{Checkpoint, CheckpointSource, Checkpointer, RunnableConfig};
use crate::stream::{StreamEvent, StreamMode};

use super::logging::{
    log_checkpoint_saved, log_graph_complete, log_graph_error, log_graph_start,
    log_node_complete, log_node_start,
};
use super::{Next, Node, RunContext, END};

/// Default maximum node steps per run.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Compiled graph: immutable structure, supports invoke and stream.
///
/// Runs from the first node; uses each node's returned `Next` to choose the
/// next node. A run that takes more than `recursion_limit` node steps fails
/// with `AgentError::RecursionLimit`.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) edge_order: Vec<String>,
    pub(super) checkpointer: Option<Arc<dyn Checkpointer<S>>>,
    pub(super) recursion_limit: usize,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Shared run loop used by invoke() and stream(): steps through nodes until completion.
    async fn run_loop_inner(
        &self,
        state: &mut S,
        config: &Option<RunnableConfig>,
        run_ctx: Option<&RunContext<S>>,
    ) -> Result<usize, AgentError> {
        let mut current_id = self
            .edge_order
            .first()
            .cloned()
            .ok_or_else(|| AgentError::ExecutionFailed("empty graph".into()))?;
        let mut steps = 0usize;

        loop {
            if steps >= self.recursion_limit {
                return Err(AgentError::RecursionLimit(self.recursion_limit));
            }
            steps += 1;

            let node = self.nodes.get(&current_id).cloned().ok_or_else(|| {
                AgentError::ExecutionFailed(format!("node not found: {}", current_id))
            })?;
            log_node_start(&current_id, steps);

            let current_state = state.clone();
            let (new_state, next) = match run_ctx {
                Some(ctx) => node.run_with_context(current_state, ctx).await?,
                None => node.run(current_state).await?,
            };
            *state = new_state;
            log_node_complete(&current_id, &next);

            self.save_checkpoint(state, config, CheckpointSource::Loop, steps as u64)
                .await?;

            if let Some(ctx) = run_ctx {
                ctx.emit(StreamMode::Values, StreamEvent::Values(state.clone()))
                    .await;
                ctx.emit(
                    StreamMode::Updates,
                    StreamEvent::Updates {
                        node_id: current_id.clone(),
                        state: state.clone(),
                    },
                )
                .await;
            }

            match next {
                Next::End => return Ok(steps),
                Next::Node(id) if id == END => return Ok(steps),
                Next::Node(id) => current_id = id,
                Next::Continue => {
                    let pos = self
                        .edge_order
                        .iter()
                        .position(|x| *x == current_id)
                        .ok_or_else(|| {
                            AgentError::ExecutionFailed(format!(
                                "node {} is not on the edge chain",
                                current_id
                            ))
                        })?;
                    match self.edge_order.get(pos + 1) {
                        Some(id) => current_id = id.clone(),
                        None => return Ok(steps),
                    }
                }
            }
        }
    }

    /// Saves `state` for `config.thread_id` when a checkpointer is configured.
    pub async fn save_checkpoint(
        &self,
        state: &S,
        config: &Option<RunnableConfig>,
        source: CheckpointSource,
        step: u64,
    ) -> Result<(), AgentError> {
        let (Some(cp), Some(cfg)) = (&self.checkpointer, config) else {
            return Ok(());
        };
        let Some(thread_id) = cfg.thread_id.as_deref() else {
            return Ok(());
        };
        let checkpoint = Checkpoint::from_state(state.clone(), source, step);
        let id = cp
            .put(cfg, &checkpoint)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("checkpoint save failed: {}", e)))?;
        log_checkpoint_saved(thread_id, &id, step);
        Ok(())
    }

    /// Runs the graph with the given state and returns the final state.
    ///
    /// - `Next::Continue`: run the next node in edge_order, or end if last.
    /// - `Next::Node(id)`: run the node with that id next.
    /// - `Next::End`: stop and return current state.
    pub async fn invoke(&self, state: S, config: Option<RunnableConfig>) -> Result<S, AgentError> {
        let mut state = state;
        log_graph_start(config.as_ref().and_then(|c| c.thread_id.as_deref()));
        match self.run_loop_inner(&mut state, &config, None).await {
            Ok(steps) => {
                log_graph_complete(steps);
                Ok(state)
            }
            Err(e) => {
                log_graph_error(&e);
                Err(e)
            }
        }
    }

    /// Runs the graph, sending events for the enabled modes into `tx`.
    ///
    /// Returns the final state; the caller decides how to report an error.
    pub async fn run_streaming(
        &self,
        state: S,
        config: Option<RunnableConfig>,
        stream_mode: HashSet<StreamMode>,
        tx: mpsc::Sender<StreamEvent<S>>,
    ) -> Result<S, AgentError> {
        let mut state = state;
        let run_ctx = RunContext {
            config: config.clone().unwrap_or_default(),
            stream_tx: Some(tx),
            stream_mode,
        };
        log_graph_start(run_ctx.config.thread_id.as_deref());
        match self.run_loop_inner(&mut state, &config, Some(&run_ctx)).await {
            Ok(steps) => {
                log_graph_complete(steps);
                Ok(state)
            }
            Err(e) => {
                log_graph_error(&e);
                Err(e)
            }
        }
    }

    /// Streams graph execution, emitting events via channel-backed Stream.
    ///
    /// A failed run ends the stream with `StreamEvent::Error`.
    pub fn stream(
        &self,
        state: S,
        config: Option<RunnableConfig>,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent<S>> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let mode_set: HashSet<StreamMode> = stream_mode.into();

        tokio::spawn(async move {
            if let Err(e) = graph
                .run_streaming(state, config, mode_set, tx.clone())
                .await
            {
                let _ = tx.send(StreamEvent::Error(e.to_string())).await;
            }
        });

        ReceiverStream::new(rx)
    }

    /// Maximum node steps per run.
    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }
}

//! Streaming types for graph runs.
//!
//! Defines stream modes and the events nodes emit while a run is in progress.
//! Used by `CompiledStateGraph::stream` and consumed by the SSE publisher.

use std::fmt::Debug;

use crate::state::ToolCall;
use crate::tools::ToolCallContent;

/// Stream mode selector: which kinds of events to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Emit full state after each node completes.
    Values,
    /// Emit incremental updates with node id and state.
    Updates,
    /// Emit message chunks (LLM streaming) and the model-end summary.
    Messages,
    /// Emit tool start/end events from the tools node.
    Tools,
}

/// Metadata attached to streamed messages.
#[derive(Clone, Debug)]
pub struct StreamMetadata {
    /// Node id that produced the message.
    pub node: String,
}

/// One chunk of streamed message content.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageChunk {
    pub content: String,
}

/// Event emitted while running a graph.
#[derive(Clone, Debug)]
pub enum StreamEvent<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Full state snapshot after a node finishes.
    Values(S),
    /// Incremental update with the node id and state after that node.
    Updates { node_id: String, state: S },
    /// Token chunk from the model node.
    Messages {
        chunk: MessageChunk,
        metadata: StreamMetadata,
    },
    /// The model finished one completion; `tool_calls` is what it asked for.
    ModelEnd { tool_calls: Vec<ToolCall> },
    /// A registered tool is about to run.
    ToolStart { call: ToolCall },
    /// A tool finished successfully.
    ToolEnd {
        call_id: String,
        name: String,
        output: ToolCallContent,
    },
    /// The run failed; no further events follow.
    Error(String),
}

//! Chat runner: builds the model/tools graph and runs one user turn against a thread.
//!
//! Owns the compiled graph, the checkpointer and the per-thread locks. Used by
//! the SSE publisher ([`publish_chat`](crate::sse::publish_chat)) and by callers
//! that want the final state directly ([`ChatRunner::invoke`]).

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use crate::error::AgentError;
use crate::graph::{CompilationError, CompiledStateGraph, StateGraph, DEFAULT_RECURSION_LIMIT, END, START};
use crate::llm::LlmClient;
use crate::memory::{
    CheckpointError, CheckpointListItem, CheckpointSource, Checkpointer, RunnableConfig,
    ThreadLocks,
};
use crate::message::Message;
use crate::state::ChatState;
use crate::stream::{StreamEvent, StreamMode};
use crate::tools::{ToolCategory, ToolRegistry, UnknownToolPolicy};

use super::model_node::{ModelNode, MODEL_NODE};
use super::tool_node::{HandleToolErrors, ToolNode, TOOLS_NODE};

/// Capacity of the event channel between a run and its consumer.
const STREAM_BUFFER: usize = 128;

/// Tool reply recorded for calls left unanswered by a run that stopped early.
pub const INTERRUPTED_TOOL_REPLY: &str = "Error: the tool call was not executed because the previous run stopped.";

/// Error type for ChatRunner invoke/stream operations.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompilationError),
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
    #[error("execution failed: {0}")]
    Execution(#[from] AgentError),
}

/// Run options that do not depend on the LLM or the tools.
#[derive(Debug, Clone)]
pub struct ChatRunnerOptions {
    /// Prepended as a system message when a thread is created.
    pub system_prompt: Option<String>,
    /// Maximum node steps per run.
    pub recursion_limit: usize,
    pub unknown_tool_policy: UnknownToolPolicy,
    pub handle_tool_errors: HandleToolErrors,
}

impl Default for ChatRunnerOptions {
    fn default() -> Self {
        Self {
            system_prompt: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            unknown_tool_policy: UnknownToolPolicy::default(),
            handle_tool_errors: HandleToolErrors::Always(None),
        }
    }
}

/// Runs user turns against checkpointed threads.
///
/// Graph: `START → model → tools → END`, where the model node ends the run when
/// the model asks for no tools and the tools node loops back to the model.
///
/// # Example
///
/// ```ignore
/// let runner = ChatRunner::new(llm, registry, checkpointer, ChatRunnerOptions::default())?;
/// let state = runner.invoke("Hello", "thread-1").await?;
/// ```
pub struct ChatRunner {
    compiled: CompiledStateGraph<ChatState>,
    checkpointer: Arc<dyn Checkpointer<ChatState>>,
    registry: Arc<ToolRegistry>,
    system_prompt: Option<String>,
    locks: ThreadLocks,
}

impl ChatRunner {
    /// Builds and compiles the graph. The LLM should already have `registry.list()` bound.
    pub fn new(
        llm: Box<dyn LlmClient>,
        registry: ToolRegistry,
        checkpointer: Arc<dyn Checkpointer<ChatState>>,
        options: ChatRunnerOptions,
    ) -> Result<Self, CompilationError> {
        let registry = Arc::new(registry);
        let model = ModelNode::new(llm);
        let tools = ToolNode::new(Arc::clone(&registry))
            .with_handle_tool_errors(options.handle_tool_errors)
            .with_unknown_tool_policy(options.unknown_tool_policy);

        let mut graph = StateGraph::<ChatState>::new().with_recursion_limit(options.recursion_limit);
        graph
            .add_node(MODEL_NODE, Arc::new(model))
            .add_node(TOOLS_NODE, Arc::new(tools))
            .add_edge(START, MODEL_NODE)
            .add_edge(MODEL_NODE, TOOLS_NODE)
            .add_edge(TOOLS_NODE, END);
        let compiled = graph.compile_with_checkpointer(Arc::clone(&checkpointer))?;

        Ok(Self {
            compiled,
            checkpointer,
            registry,
            system_prompt: options.system_prompt,
            locks: ThreadLocks::new(),
        })
    }

    /// Names of the registered tools whose calls produce search events.
    pub fn search_tool_names(&self) -> Vec<String> {
        self.registry.names_in(ToolCategory::Search)
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Whether the thread has at least one checkpoint.
    pub async fn thread_exists(&self, thread_id: &str) -> Result<bool, RunError> {
        let config = RunnableConfig::for_thread(thread_id);
        Ok(self.checkpointer.get_tuple(&config).await?.is_some())
    }

    /// Checkpoints of the thread, oldest first.
    pub async fn checkpoints(&self, thread_id: &str) -> Result<Vec<CheckpointListItem>, RunError> {
        let config = RunnableConfig::for_thread(thread_id);
        Ok(self.checkpointer.list(&config).await?)
    }

    /// Latest saved state of the thread.
    pub async fn thread_state(&self, thread_id: &str) -> Result<Option<ChatState>, RunError> {
        let config = RunnableConfig::for_thread(thread_id);
        Ok(self
            .checkpointer
            .get_tuple(&config)
            .await?
            .map(|(cp, _)| cp.channel_values))
    }

    /// Loads the thread (or starts it with the system prompt), closes tool calls
    /// a stopped run left unanswered, appends the user message and saves the
    /// result as the run's input checkpoint.
    async fn build_initial_state(
        &self,
        user_message: &str,
        config: &RunnableConfig,
    ) -> Result<ChatState, RunError> {
        let mut state = match self.checkpointer.get_tuple(config).await? {
            Some((checkpoint, _)) => checkpoint.channel_values,
            None => {
                debug!(thread_id = ?config.thread_id, "starting new thread");
                let mut state = ChatState::default();
                if let Some(ref prompt) = self.system_prompt {
                    state.messages.push(Message::system(prompt.clone()));
                }
                state
            }
        };
        let closed = state.close_pending_tool_calls(INTERRUPTED_TOOL_REPLY);
        if closed > 0 {
            warn!(thread_id = ?config.thread_id, closed, "closed tool calls left by a stopped run");
        }
        state.messages.push(Message::user(user_message));
        self.compiled
            .save_checkpoint(&state, &Some(config.clone()), CheckpointSource::Input, 0)
            .await?;
        Ok(state)
    }

    /// Runs one turn to completion and returns the final state.
    pub async fn invoke(&self, user_message: &str, thread_id: &str) -> Result<ChatState, RunError> {
        let _guard = self.locks.acquire(thread_id).await;
        let config = RunnableConfig::for_thread(thread_id);
        let state = self.build_initial_state(user_message, &config).await?;
        Ok(self.compiled.invoke(state, Some(config)).await?)
    }

    /// Starts one turn in a background task and returns its event stream.
    ///
    /// The stream carries `Messages`/`ModelEnd` and `ToolStart`/`ToolEnd` events;
    /// a failed run ends with `StreamEvent::Error`. The thread stays locked until
    /// the run finishes, even if the consumer drops the stream.
    pub async fn stream(
        &self,
        user_message: &str,
        thread_id: &str,
    ) -> Result<ReceiverStream<StreamEvent<ChatState>>, RunError> {
        let guard = self.locks.acquire(thread_id).await;
        let config = RunnableConfig::for_thread(thread_id);
        let state = self.build_initial_state(user_message, &config).await?;

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let graph = self.compiled.clone();
        let modes = HashSet::from([StreamMode::Messages, StreamMode::Tools]);
        tokio::spawn(async move {
            let _guard = guard;
            if let Err(e) = graph
                .run_streaming(state, Some(config), modes, tx.clone())
                .await
            {
                let _ = tx.send(StreamEvent::Error(e.to_string())).await;
            }
        });
        Ok(ReceiverStream::new(rx))
    }
}

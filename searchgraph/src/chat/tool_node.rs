//! Tools node: run every tool call the model requested and append the results.
//!
//! Reads the tool calls of the last assistant message, runs them concurrently
//! through the `ToolRegistry` and appends one `Message::Tool` per call in the
//! order the model requested them. Routes back to the model node.
//!
//! # Error Handling
//!
//! By default, tool errors propagate and abort the run. Use `with_handle_tool_errors`
//! to turn failures into tool messages the model can read:
//!
//! - `HandleToolErrors::Never` - Errors propagate (default)
//! - `HandleToolErrors::Always` - Errors become tool messages
//! - `HandleToolErrors::Custom(handler)` - Custom error message function
//!
//! Calls naming an unregistered tool follow the node's [`UnknownToolPolicy`].

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::AgentError;
use crate::graph::{Next, Node, RunContext};
use crate::message::Message;
use crate::state::{ChatState, ToolCall};
use crate::stream::{StreamEvent, StreamMode};
use crate::tools::{ToolCallContent, ToolRegistry, ToolSourceError, UnknownToolPolicy};

use super::model_node::MODEL_NODE;

/// Node id of the tools node.
pub const TOOLS_NODE: &str = "tools";

/// Truncates a string for logging, appending "..." if longer than max_len.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// Default error message template for tool errors.
pub const DEFAULT_TOOL_ERROR_TEMPLATE: &str = "Error: {error}\n Please fix your mistakes.";

/// Default execution error message template with tool name and kwargs.
pub const DEFAULT_EXECUTION_ERROR_TEMPLATE: &str =
    "Error executing tool '{tool_name}' with kwargs {tool_kwargs} with error:\n {error}\n Please fix the error and try again.";

/// Reply for a call naming an unregistered tool under `UnknownToolPolicy::Reply`.
const UNKNOWN_TOOL_TEMPLATE: &str =
    "Error: {tool_name} is not a valid tool, try one of [{available_tools}].";

/// Error handler function type.
///
/// Takes the error, tool name, and tool arguments, returns an error message string.
pub type ErrorHandlerFn =
    Arc<dyn Fn(&ToolSourceError, &str, &Value) -> String + Send + Sync + 'static>;

/// How the tools node handles tool failures.
#[derive(Clone, Default)]
pub enum HandleToolErrors {
    /// Errors propagate and abort the run.
    #[default]
    Never,
    /// Errors become tool messages; `None` uses [`DEFAULT_EXECUTION_ERROR_TEMPLATE`].
    /// A custom template may use `{error}`, `{tool_name}` and `{tool_kwargs}`.
    Always(Option<String>),
    /// Custom error handler function.
    Custom(ErrorHandlerFn),
}

impl std::fmt::Debug for HandleToolErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Never => write!(f, "HandleToolErrors::Never"),
            Self::Always(msg) => write!(f, "HandleToolErrors::Always({:?})", msg),
            Self::Custom(_) => write!(f, "HandleToolErrors::Custom(<fn>)"),
        }
    }
}

/// Tools node: one step that executes the pending tool calls.
///
/// **Interaction**: Implements `Node<ChatState>`; consumes `ToolRegistry`;
/// reads the last assistant message's tool calls and appends `Message::Tool`s.
/// Emits `ToolStart` / `ToolEnd` when `StreamMode::Tools` is enabled.
pub struct ToolNode {
    registry: Arc<ToolRegistry>,
    handle_tool_errors: HandleToolErrors,
    unknown_tool_policy: UnknownToolPolicy,
}

/// What happened to one requested call.
enum CallOutcome {
    Reply(Message),
    Skipped,
}

impl ToolNode {
    /// Tools node over `registry`; errors propagate and unknown tools get a reply.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            handle_tool_errors: HandleToolErrors::Never,
            unknown_tool_policy: UnknownToolPolicy::default(),
        }
    }

    pub fn with_handle_tool_errors(mut self, handle_tool_errors: HandleToolErrors) -> Self {
        self.handle_tool_errors = handle_tool_errors;
        self
    }

    pub fn with_unknown_tool_policy(mut self, policy: UnknownToolPolicy) -> Self {
        self.unknown_tool_policy = policy;
        self
    }

    /// Returns Some(message) if the error should become a tool message, None if it propagates.
    fn handle_error(
        &self,
        error: &ToolSourceError,
        tool_name: &str,
        tool_args: &Value,
    ) -> Option<String> {
        let fill = |template: &str| {
            template
                .replace("{tool_name}", tool_name)
                .replace("{tool_kwargs}", &tool_args.to_string())
                .replace("{error}", &error.to_string())
        };
        match &self.handle_tool_errors {
            HandleToolErrors::Never => None,
            HandleToolErrors::Always(template) => Some(fill(
                template.as_deref().unwrap_or(DEFAULT_EXECUTION_ERROR_TEMPLATE),
            )),
            HandleToolErrors::Custom(handler) => Some(handler(error, tool_name, tool_args)),
        }
    }

    fn unknown_tool_reply(&self, call: &ToolCall) -> Message {
        let available = self
            .registry
            .list()
            .into_iter()
            .map(|s| s.name)
            .collect::<Vec<_>>()
            .join(", ");
        let content = UNKNOWN_TOOL_TEMPLATE
            .replace("{tool_name}", &call.name)
            .replace("{available_tools}", &available);
        Message::tool(call.id.clone(), call.name.clone(), content)
    }

    /// Runs one call: events, registry dispatch and error handling.
    async fn run_call(
        &self,
        call: &ToolCall,
        ctx: Option<&RunContext<ChatState>>,
    ) -> Result<CallOutcome, AgentError> {
        if !self.registry.contains(&call.name) {
            return match self.unknown_tool_policy {
                UnknownToolPolicy::Reply => {
                    warn!(tool = %call.name, call_id = %call.id, "unknown tool, replying with error");
                    Ok(CallOutcome::Reply(self.unknown_tool_reply(call)))
                }
                UnknownToolPolicy::Drop => {
                    warn!(tool = %call.name, call_id = %call.id, "unknown tool, dropping call");
                    Ok(CallOutcome::Skipped)
                }
                UnknownToolPolicy::Fail => Err(AgentError::UnknownTool(call.name.clone())),
            };
        }

        if let Some(ctx) = ctx {
            ctx.emit(StreamMode::Tools, StreamEvent::ToolStart { call: call.clone() })
                .await;
        }

        debug!(tool = %call.name, call_id = %call.id, "calling tool");
        let output = match self.registry.call(&call.name, call.arguments.clone()).await {
            Ok(output) => {
                trace!(
                    tool = %call.name,
                    result = %truncate_for_log(&output.text, 200),
                    "tool result"
                );
                output
            }
            Err(e) => match self.handle_error(&e, &call.name, &call.arguments) {
                Some(message) => {
                    warn!(tool = %call.name, error = %e, "tool failed, replying with error");
                    ToolCallContent::text(message)
                }
                None => {
                    return Err(AgentError::ExecutionFailed(format!(
                        "tool '{}' failed: {}",
                        call.name, e
                    )))
                }
            },
        };

        if let Some(ctx) = ctx {
            ctx.emit(
                StreamMode::Tools,
                StreamEvent::ToolEnd {
                    call_id: call.id.clone(),
                    name: call.name.clone(),
                    output: output.clone(),
                },
            )
            .await;
        }

        Ok(CallOutcome::Reply(Message::tool(
            call.id.clone(),
            call.name.clone(),
            output.text,
        )))
    }

    async fn execute(
        &self,
        state: ChatState,
        ctx: Option<&RunContext<ChatState>>,
    ) -> Result<(ChatState, Next), AgentError> {
        let calls = state.pending_tool_calls().to_vec();
        debug!(count = calls.len(), "running tool calls");

        let outcomes = join_all(calls.iter().map(|call| self.run_call(call, ctx))).await;

        let mut messages = state.messages;
        for outcome in outcomes {
            if let CallOutcome::Reply(message) = outcome? {
                messages.push(message);
            }
        }
        Ok((ChatState { messages }, Next::Node(MODEL_NODE.to_string())))
    }
}

#[async_trait]
impl Node<ChatState> for ToolNode {
    fn id(&self) -> &str {
        TOOLS_NODE
    }

    /// Runs the pending tool calls and routes back to the model node.
    async fn run(&self, state: ChatState) -> Result<(ChatState, Next), AgentError> {
        self.execute(state, None).await
    }

    async fn run_with_context(
        &self,
        state: ChatState,
        ctx: &RunContext<ChatState>,
    ) -> Result<(ChatState, Next), AgentError> {
        self.execute(state, Some(ctx)).await
    }
}

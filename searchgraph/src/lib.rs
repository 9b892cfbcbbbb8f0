//! # searchgraph
//!
//! A chat-with-search backend library: a user message goes to an LLM, the LLM
//! may call a web search tool, and the run is streamed to the client as
//! Server-Sent Events. Conversation threads are checkpointed so a client can
//! resume them by id.
//!
//! ## Design Principles
//!
//! - **Single state type**: [`ChatState`] (the thread's messages) flows through
//!   every node and is what the checkpointer stores.
//! - **Two-node loop**: `model` asks the LLM; `tools` runs the tools it asked
//!   for and loops back. The loop is bounded by a recursion limit.
//! - **Collaborators behind traits**: [`LlmClient`], [`Tool`] and
//!   [`Checkpointer`] hide the LLM provider, the search provider and the store.
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `Next`.
//! - [`chat`]: `ModelNode`, `ToolNode` and `ChatRunner`.
//! - [`sse`]: wire events, `StreamToSse` and `publish_chat`.
//! - [`llm`]: `LlmClient`, `MockLlm` and `ChatOpenAI` (feature `openai`).
//! - [`tools`]: `Tool`, `ToolRegistry`, `MockSearchTool` and `TavilySearchTool` (feature `tavily`).
//! - [`memory`]: checkpoints, `MemorySaver`, per-thread locks.
//! - [`chat_builder`]: `ChatBuildConfig::from_env` and `build_chat_runner`.
//!
//! ## Features
//!
//! - `openai` (default): OpenAI Chat Completions client via `async-openai`.
//! - `tavily` (default): Tavily web search tool via `reqwest`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use searchgraph::{ChatRunner, ChatRunnerOptions, MemorySaver, MockLlm, ToolRegistry};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let runner = ChatRunner::new(
//!     Box::new(MockLlm::with_no_tool_calls("Hello!")),
//!     ToolRegistry::new(),
//!     Arc::new(MemorySaver::new()),
//!     ChatRunnerOptions::default(),
//! )
//! .unwrap();
//! let state = runner.invoke("hi", "thread-1").await.unwrap();
//! assert_eq!(state.last_answer(), Some("Hello!"));
//! # }
//! ```

pub mod chat;
pub mod chat_builder;
pub mod error;
pub mod graph;
pub mod llm;
pub mod memory;
pub mod message;
pub mod sse;
pub mod state;
pub mod stream;
pub mod tools;

pub use chat::{
    ChatRunner, ChatRunnerOptions, HandleToolErrors, ModelNode, RunError, ToolNode,
    INTERRUPTED_TOOL_REPLY,
};
pub use chat_builder::{build_chat_runner, BuildError, ChatBuildConfig};
pub use error::AgentError;
pub use graph::{CompilationError, CompiledStateGraph, Next, Node, StateGraph};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use llm::{LlmClient, LlmResponse, MockLlm, ToolChoiceMode};
pub use memory::{
    Checkpoint, CheckpointError, CheckpointListItem, CheckpointMetadata, CheckpointSource,
    Checkpointer, MemorySaver, RunnableConfig, ThreadLocks,
};
pub use message::Message;
pub use sse::{extract_urls, publish_chat, ChatStreamEvent, StreamToSse};
pub use state::{ChatState, ToolCall};
pub use stream::{MessageChunk, StreamEvent, StreamMetadata, StreamMode};
#[cfg(feature = "tavily")]
pub use tools::TavilySearchTool;
pub use tools::{
    MockSearchTool, Tool, ToolCallContent, ToolCategory, ToolRegistry, ToolSourceError, ToolSpec,
    UnknownToolPolicy, TOOL_TAVILY_SEARCH,
};

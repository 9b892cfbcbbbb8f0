//! Integration tests for the chat stream: runner → publish_chat → SSE lines.
//!
//! Tests are split into modules under `chat_stream/`:
//! - `common`: runner setup and SSE line collection
//! - `events`: event order and content of one run
//! - `threads`: thread creation, resume and serialization
//! - `failures`: run errors reported as `error` then `end`

#[path = "chat_stream/common.rs"]
mod common;

#[path = "chat_stream/events.rs"]
mod events;

#[path = "chat_stream/threads.rs"]
mod threads;

#[path = "chat_stream/failures.rs"]
mod failures;

//! Server-Sent Events for chat runs.
//!
//! Maps the internal [`StreamEvent`](crate::stream::StreamEvent) stream of a
//! [`ChatRunner`](crate::chat::ChatRunner) run to the wire events clients read:
//!
//! ```text
//! data: {"type":"checkpoint","checkpoint_id":"…"}
//! data: {"type":"content","content":"…"}
//! data: {"type":"search_start","query":"…"}
//! data: {"type":"search_results","urls":["…"]}
//! data: {"type":"error","message":"…"}
//! data: {"type":"end"}
//! ```
//!
//! [`StreamToSse`] writes formatted lines into a channel sink; [`publish_chat`]
//! drives one whole request (thread id, run, final `end`).

mod adapter;
mod event;
mod publish;

pub use adapter::StreamToSse;
pub use event::{extract_urls, ChatStreamEvent};
pub use publish::publish_chat;

//! Shared setup: a runner with the mock search tool and an SSE collector.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;

use searchgraph::{
    publish_chat, ChatRunner, ChatRunnerOptions, ChatStreamEvent, MemorySaver, MockLlm,
    MockSearchTool, ToolRegistry,
};

/// Results of the mock search: two entries with urls, one without, one stray string.
pub fn search_results() -> serde_json::Value {
    json!([
        {"title": "Paris forecast", "url": "https://weather.example/paris", "content": "Sunny, 21C"},
        {"title": "No link", "content": "missing url"},
        "stray",
        {"title": "Paris news", "url": "https://news.example/paris", "content": "..."}
    ])
}

pub fn runner_with(llm: MockLlm, options: ChatRunnerOptions) -> ChatRunner {
    runner_with_tool(llm, MockSearchTool::new(search_results()), options)
}

pub fn runner_with_tool(
    llm: MockLlm,
    tool: MockSearchTool,
    options: ChatRunnerOptions,
) -> ChatRunner {
    ChatRunner::new(
        Box::new(llm),
        ToolRegistry::new().with_tool(Arc::new(tool)),
        Arc::new(MemorySaver::new()),
        options,
    )
    .expect("compile")
}

/// Runs one request and returns the decoded wire events in order.
pub async fn collect(
    runner: &ChatRunner,
    message: &str,
    checkpoint_id: Option<String>,
) -> Vec<ChatStreamEvent> {
    let (tx, mut rx) = mpsc::channel::<String>(1024);
    publish_chat(runner, message, checkpoint_id, tx).await;

    let mut events = Vec::new();
    while let Some(line) = rx.recv().await {
        let json = line
            .strip_prefix("data: ")
            .and_then(|l| l.strip_suffix("\n\n"))
            .unwrap_or_else(|| panic!("not an SSE frame: {:?}", line));
        events.push(serde_json::from_str(json).expect("wire event"));
    }
    events
}

pub fn checkpoint_ids(events: &[ChatStreamEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            ChatStreamEvent::Checkpoint { checkpoint_id } => Some(checkpoint_id.clone()),
            _ => None,
        })
        .collect()
}

pub fn content(events: &[ChatStreamEvent]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            ChatStreamEvent::Content { content } => Some(content.as_str()),
            _ => None,
        })
        .collect()
}

pub fn assert_single_end_last(events: &[ChatStreamEvent]) {
    let ends = events
        .iter()
        .filter(|e| matches!(e, ChatStreamEvent::End))
        .count();
    assert_eq!(ends, 1, "exactly one end: {:?}", events);
    assert_eq!(events.last(), Some(&ChatStreamEvent::End));
}

//! Run failures: every failure is an `error` event followed by one `end`.

use serde_json::json;

use searchgraph::{
    ChatRunnerOptions, ChatStreamEvent, HandleToolErrors, LlmResponse, MockLlm, MockSearchTool,
    ToolCall, UnknownToolPolicy, TOOL_TAVILY_SEARCH,
};

use crate::common::{assert_single_end_last, collect, content, runner_with, runner_with_tool};

fn error_message(events: &[ChatStreamEvent]) -> Option<&str> {
    events.iter().find_map(|e| match e {
        ChatStreamEvent::Error { message } => Some(message.as_str()),
        _ => None,
    })
}

fn assert_error_then_end(events: &[ChatStreamEvent]) {
    assert_single_end_last(events);
    let n = events.len();
    assert!(n >= 2);
    assert!(
        matches!(events[n - 2], ChatStreamEvent::Error { .. }),
        "error right before end: {:?}",
        events
    );
}

/// **Scenario**: A model that never stops calling tools hits the recursion limit → error then end.
#[tokio::test]
async fn recursion_limit_reports_error() {
    let llm = MockLlm::scripted(vec![LlmResponse::tool_calls(vec![ToolCall::new(
        "loop",
        TOOL_TAVILY_SEARCH,
        json!({"query": "again"}),
    )])]);
    let options = ChatRunnerOptions {
        recursion_limit: 3,
        ..Default::default()
    };
    let events = collect(&runner_with(llm, options), "loop forever", None).await;
    assert_error_then_end(&events);
    assert!(error_message(&events).unwrap().contains("recursion limit of 3"));
}

/// **Scenario**: LLM provider failure → error then end, after the checkpoint.
#[tokio::test]
async fn llm_failure_reports_error() {
    let runner = runner_with(MockLlm::failing("provider unavailable"), ChatRunnerOptions::default());
    let events = collect(&runner, "Hi", None).await;
    assert!(matches!(events[0], ChatStreamEvent::Checkpoint { .. }));
    assert_error_then_end(&events);
    assert!(error_message(&events).unwrap().contains("provider unavailable"));
}

/// **Scenario**: With default options a failing search becomes a tool message; the run answers.
#[tokio::test]
async fn failing_search_is_reported_to_model() {
    let runner = runner_with_tool(
        MockLlm::with_search_then_answer("q", "Search is down, sorry."),
        MockSearchTool::failing("rate limited"),
        ChatRunnerOptions::default(),
    );
    let events = collect(&runner, "search", None).await;
    assert!(error_message(&events).is_none());
    assert!(events.contains(&ChatStreamEvent::SearchResults { urls: vec![] }));
    assert_eq!(content(&events), "Search is down, sorry.");
    assert_single_end_last(&events);
}

/// **Scenario**: HandleToolErrors::Never makes a failing search abort the run.
#[tokio::test]
async fn failing_search_can_abort() {
    let options = ChatRunnerOptions {
        handle_tool_errors: HandleToolErrors::Never,
        ..Default::default()
    };
    let runner = runner_with_tool(
        MockLlm::with_search_then_answer("q", "unused"),
        MockSearchTool::failing("rate limited"),
        options,
    );
    let events = collect(&runner, "search", None).await;
    assert_error_then_end(&events);
    assert!(error_message(&events).unwrap().contains("rate limited"));
}

/// **Scenario**: Unknown tool with Fail policy aborts; with Reply the run completes.
#[tokio::test]
async fn unknown_tool_policies() {
    let script = || {
        MockLlm::scripted(vec![
            LlmResponse::tool_calls(vec![ToolCall::new("c1", "calculator", json!({"x": 1}))]),
            LlmResponse::answer("fine"),
        ])
    };

    let fail = ChatRunnerOptions {
        unknown_tool_policy: UnknownToolPolicy::Fail,
        ..Default::default()
    };
    let events = collect(&runner_with(script(), fail), "calc", None).await;
    assert_error_then_end(&events);
    assert!(error_message(&events).unwrap().contains("unknown tool: calculator"));

    let events = collect(&runner_with(script(), ChatRunnerOptions::default()), "calc", None).await;
    assert!(error_message(&events).is_none());
    assert_eq!(content(&events), "fine");
    assert!(!events
        .iter()
        .any(|e| matches!(e, ChatStreamEvent::SearchStart { .. })));
}

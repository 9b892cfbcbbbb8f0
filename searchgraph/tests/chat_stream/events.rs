//! Event order and content of a single run.

use searchgraph::{ChatRunnerOptions, ChatStreamEvent, MockLlm};

use crate::common::{assert_single_end_last, checkpoint_ids, collect, content, runner_with};

/// **Scenario**: New thread without search: checkpoint first, content, then end.
#[tokio::test]
async fn new_thread_plain_answer() {
    let runner = runner_with(
        MockLlm::with_no_tool_calls("Hello there, how can I help?"),
        ChatRunnerOptions::default(),
    );
    let events = collect(&runner, "Hi", None).await;

    assert!(matches!(events[0], ChatStreamEvent::Checkpoint { .. }));
    assert_eq!(checkpoint_ids(&events).len(), 1);
    assert_eq!(content(&events), "Hello there, how can I help?");
    assert!(!events.iter().any(|e| matches!(
        e,
        ChatStreamEvent::SearchStart { .. } | ChatStreamEvent::SearchResults { .. }
    )));
    assert_single_end_last(&events);
}

/// **Scenario**: The checkpoint id is a UUID v4.
#[tokio::test]
async fn checkpoint_id_is_uuid() {
    let runner = runner_with(MockLlm::with_no_tool_calls("ok"), ChatRunnerOptions::default());
    let events = collect(&runner, "Hi", None).await;
    let id = &checkpoint_ids(&events)[0];
    let parsed = uuid::Uuid::parse_str(id).expect("uuid");
    assert_eq!(parsed.get_version_num(), 4);
}

/// **Scenario**: "What's the weather in Paris?" with search: search_start before
/// search_results, urls only from entries with a url, answer after the results.
#[tokio::test]
async fn search_flow_order_and_urls() {
    let runner = runner_with(
        MockLlm::with_search_then_answer("weather in Paris", "It is sunny in Paris."),
        ChatRunnerOptions::default(),
    );
    let events = collect(&runner, "What's the weather in Paris?", None).await;

    let start = events
        .iter()
        .position(|e| matches!(e, ChatStreamEvent::SearchStart { .. }))
        .expect("search_start");
    let results = events
        .iter()
        .position(|e| matches!(e, ChatStreamEvent::SearchResults { .. }))
        .expect("search_results");
    assert!(start < results);
    let starts = events
        .iter()
        .filter(|e| matches!(e, ChatStreamEvent::SearchStart { .. }))
        .count();
    let result_events = events
        .iter()
        .filter(|e| matches!(e, ChatStreamEvent::SearchResults { .. }))
        .count();
    assert_eq!((starts, result_events), (1, 1));
    assert_eq!(
        events[start],
        ChatStreamEvent::SearchStart {
            query: "weather in Paris".into()
        }
    );
    assert_eq!(
        events[results],
        ChatStreamEvent::SearchResults {
            urls: vec![
                "https://weather.example/paris".into(),
                "https://news.example/paris".into(),
            ]
        }
    );

    let first_content = events
        .iter()
        .position(|e| matches!(e, ChatStreamEvent::Content { .. }))
        .expect("content");
    assert!(first_content > results);
    assert_eq!(content(&events), "It is sunny in Paris.");
    assert_single_end_last(&events);
}

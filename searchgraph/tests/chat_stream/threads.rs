//! Thread creation, resume and concurrent runs on one thread.

use std::sync::Arc;

use serde_json::json;

use searchgraph::{
    ChatRunnerOptions, ChatStreamEvent, LlmResponse, Message, MockLlm, ToolCall,
    INTERRUPTED_TOOL_REPLY, TOOL_TAVILY_SEARCH,
};

use crate::common::{assert_single_end_last, checkpoint_ids, collect, runner_with};

/// **Scenario**: Resuming with the returned id sends no checkpoint and gives the model the prior turns.
#[tokio::test]
async fn resume_sends_history_without_checkpoint() {
    let llm = MockLlm::with_no_tool_calls("noted");
    let seen = llm.seen_messages();
    let runner = runner_with(llm, ChatRunnerOptions::default());

    let first = collect(&runner, "My name is Ada.", None).await;
    let id = checkpoint_ids(&first).remove(0);

    let second = collect(&runner, "What is my name?", Some(id)).await;
    assert!(checkpoint_ids(&second).is_empty());
    assert_single_end_last(&second);

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen.last().unwrap(),
        &vec![
            Message::user("My name is Ada."),
            Message::assistant("noted"),
            Message::user("What is my name?"),
        ]
    );
}

/// **Scenario**: An unknown checkpoint_id starts a thread under that id, without a checkpoint event.
#[tokio::test]
async fn unknown_id_creates_thread_with_that_id() {
    let runner = runner_with(MockLlm::with_no_tool_calls("ok"), ChatRunnerOptions::default());
    assert!(!runner.thread_exists("client-chosen").await.unwrap());

    let events = collect(&runner, "Hi", Some("client-chosen".into())).await;
    assert!(checkpoint_ids(&events).is_empty());
    assert!(runner.thread_exists("client-chosen").await.unwrap());
}

/// **Scenario**: Two threads do not see each other's messages.
#[tokio::test]
async fn threads_are_isolated() {
    let runner = runner_with(MockLlm::with_no_tool_calls("ok"), ChatRunnerOptions::default());
    let a = checkpoint_ids(&collect(&runner, "from a", None).await).remove(0);
    let b = checkpoint_ids(&collect(&runner, "from b", None).await).remove(0);
    assert_ne!(a, b);

    let state_b = runner.thread_state(&b).await.unwrap().unwrap();
    assert!(!state_b.messages.iter().any(|m| m.content() == "from a"));
}

/// **Scenario**: Concurrent requests on one thread run one after the other; history stays paired.
#[tokio::test]
async fn concurrent_runs_on_one_thread_are_serialized() {
    let runner = Arc::new(runner_with(
        MockLlm::with_no_tool_calls("reply"),
        ChatRunnerOptions::default(),
    ));
    let r1 = Arc::clone(&runner);
    let r2 = Arc::clone(&runner);
    let (e1, e2) = tokio::join!(
        async move { collect(&r1, "one", Some("shared".into())).await },
        async move { collect(&r2, "two", Some("shared".into())).await },
    );
    assert_single_end_last(&e1);
    assert_single_end_last(&e2);

    let state = runner.thread_state("shared").await.unwrap().unwrap();
    assert_eq!(state.messages.len(), 4);
    for pair in state.messages.chunks(2) {
        assert!(matches!(pair[0], Message::User { .. }));
        assert_eq!(pair[1], Message::assistant("reply"));
    }
}

/// **Scenario**: A run saves an input checkpoint and one per node step.
#[tokio::test]
async fn checkpoints_per_step() {
    let runner = runner_with(
        MockLlm::with_search_then_answer("q", "done"),
        ChatRunnerOptions::default(),
    );
    let events = collect(&runner, "search please", None).await;
    let id = checkpoint_ids(&events).remove(0);
    assert!(matches!(events[0], ChatStreamEvent::Checkpoint { .. }));

    let cps = runner.checkpoints(&id).await.unwrap();
    let steps: Vec<u64> = cps.iter().map(|c| c.metadata.step).collect();
    assert_eq!(steps, vec![0, 1, 2, 3]);
}

/// Panics if an assistant message with tool calls is not followed by a reply to each call.
fn assert_tool_calls_answered(messages: &[Message]) {
    for (i, message) in messages.iter().enumerate() {
        for (offset, call) in message.tool_calls().iter().enumerate() {
            match messages.get(i + 1 + offset) {
                Some(Message::Tool { tool_call_id, .. }) if *tool_call_id == call.id => {}
                other => panic!("call {} at {} answered by {:?}", call.id, i, other),
            }
        }
    }
}

/// **Scenario**: A run stopped by the recursion limit leaves no unanswered tool call for the next turn.
#[tokio::test]
async fn resume_after_recursion_limit_closes_pending_calls() {
    let search = |id: &str| {
        LlmResponse::tool_calls(vec![ToolCall::new(
            id,
            TOOL_TAVILY_SEARCH,
            json!({ "query": "paris" }),
        )])
    };
    let llm = MockLlm::scripted(vec![
        search("c1"),
        search("c2"),
        LlmResponse::answer("done"),
    ]);
    let seen = llm.seen_messages();
    let options = ChatRunnerOptions {
        recursion_limit: 3,
        ..Default::default()
    };
    let runner = runner_with(llm, options);

    let first = collect(&runner, "weather?", Some("stopped".into())).await;
    assert!(first
        .iter()
        .any(|e| matches!(e, ChatStreamEvent::Error { .. })));
    assert_single_end_last(&first);
    let stopped = runner.thread_state("stopped").await.unwrap().unwrap();
    assert_eq!(stopped.pending_tool_calls().len(), 1);

    let second = collect(&runner, "next turn", Some("stopped".into())).await;
    assert!(!second
        .iter()
        .any(|e| matches!(e, ChatStreamEvent::Error { .. })));
    assert_single_end_last(&second);

    let seen = seen.lock().unwrap();
    let resumed_input = seen.last().unwrap();
    assert_tool_calls_answered(resumed_input);
    let n = resumed_input.len();
    assert_eq!(
        resumed_input[n - 2],
        Message::tool("c2", TOOL_TAVILY_SEARCH, INTERRUPTED_TOOL_REPLY)
    );
    assert_eq!(resumed_input[n - 1], Message::user("next turn"));

    let state = runner.thread_state("stopped").await.unwrap().unwrap();
    assert_tool_calls_answered(&state.messages);
    assert_eq!(state.last_answer(), Some("done"));
}

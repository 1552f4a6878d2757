//! Integration tests for the mailsense-agent crate.
//!
//! Drives the dispatcher through a scripted multi-turn conversation against
//! a fake mailbox adapter, the way the real service strings the pieces
//! together.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use mailsense_agent::{
    ChatMessage, CompletionBackend, Dispatcher, LlmReply, Result, ToolAdapter, ToolCall,
    ToolDefinition,
};

/// Backend that replays a scripted conversation and records what it was
/// shown each turn.
struct ScriptedBackend {
    replies: Mutex<Vec<LlmReply>>,
    transcripts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedBackend {
    fn new(replies: Vec<LlmReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            transcripts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> Result<LlmReply> {
        self.transcripts.lock().unwrap().push(messages.to_vec());
        Ok(self.replies.lock().unwrap().remove(0))
    }
}

/// Fake mailbox with two canned unread messages.
struct FakeMailbox {
    calls: Mutex<Vec<String>>,
}

impl FakeMailbox {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ToolAdapter for FakeMailbox {
    fn adapter_id(&self) -> &str {
        "fake-mailbox"
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        ["list_unread_emails", "mark_as_read"]
            .into_iter()
            .map(|name| ToolDefinition {
                name: name.into(),
                description: format!("fake {name}"),
                parameters: json!({"type": "object"}),
            })
            .collect()
    }

    async fn execute(&self, tool_name: &str, arguments: Value) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{tool_name}:{arguments}"));

        match tool_name {
            "list_unread_emails" => Ok("Unread emails: 2\n\n#1 [UNREAD]\n   ID: m1\n\n#2 [UNREAD]\n   ID: m2\n\n".into()),
            "mark_as_read" => {
                let id = arguments["email_id"].as_str().unwrap_or_default();
                Ok(format!("Email {id} marked as read."))
            }
            other => panic!("unexpected tool {other}"),
        }
    }
}

fn tool_call(id: &str, name: &str, arguments: Value) -> ToolCall {
    ToolCall {
        id: id.into(),
        name: name.into(),
        arguments,
    }
}

#[tokio::test]
async fn multi_turn_flow_lists_then_marks_and_answers() {
    let backend = ScriptedBackend::new(vec![
        LlmReply::ToolCalls(vec![tool_call("c1", "list_unread_emails", json!({}))]),
        LlmReply::ToolCalls(vec![
            tool_call("c2", "mark_as_read", json!({"email_id": "m1"})),
            tool_call("c3", "mark_as_read", json!({"email_id": "m2"})),
        ]),
        LlmReply::Text("Both unread emails are now marked as read.".into()),
    ]);
    let mailbox = FakeMailbox::new();

    let dispatcher = Dispatcher::new(Arc::clone(&backend) as _, vec![Arc::clone(&mailbox) as _]);
    let answer = dispatcher
        .process_message("mark all my unread emails as read")
        .await;

    assert_eq!(answer, "Both unread emails are now marked as read.");

    let calls = mailbox.calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].starts_with("list_unread_emails:"));
    assert!(calls[1].contains("m1"));
    assert!(calls[2].contains("m2"));
}

#[tokio::test]
async fn conversation_accumulates_tool_results_between_turns() {
    let backend = ScriptedBackend::new(vec![
        LlmReply::ToolCalls(vec![tool_call("c1", "list_unread_emails", json!({}))]),
        LlmReply::Text("You have 2 unread emails.".into()),
    ]);
    let mailbox = FakeMailbox::new();

    let dispatcher = Dispatcher::new(Arc::clone(&backend) as _, vec![mailbox as _]);
    dispatcher.process_message("any unread mail?").await;

    let transcripts = backend.transcripts.lock().unwrap();
    assert_eq!(transcripts.len(), 2);

    // First turn: system prompt + user message only.
    assert_eq!(transcripts[0].len(), 2);

    // Second turn adds the assistant tool-call message and the tool result.
    assert_eq!(transcripts[1].len(), 4);
    let tool_result = transcripts[1].last().unwrap();
    assert_eq!(tool_result.tool_call_id.as_deref(), Some("c1"));
    assert!(tool_result.content.contains("Unread emails: 2"));
}

#[tokio::test]
async fn fresh_calls_share_no_state() {
    let backend = ScriptedBackend::new(vec![
        LlmReply::Text("First answer.".into()),
        LlmReply::Text("Second answer.".into()),
    ]);

    let dispatcher = Dispatcher::new(Arc::clone(&backend) as _, vec![]);
    dispatcher.process_message("first").await;
    dispatcher.process_message("second").await;

    let transcripts = backend.transcripts.lock().unwrap();
    // Each call starts from scratch: system prompt + its own user message.
    assert_eq!(transcripts[1].len(), 2);
    assert_eq!(transcripts[1][1].content, "second");
}

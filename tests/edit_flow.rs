//! End-to-end flows through the conversation state machine: optimistic
//! submit, server reply, edit truncation, failure handling under both
//! policies, and snapshot load-and-replace.

use ai_chat_frontend::conversation::{
    self, ChatMessage, ERROR_REPLY, EditController, FailurePolicy, Role, Thread,
};
use ai_chat_frontend::models::{LoadConversationResponse, StoredMessage};

fn texts(thread: &Thread) -> Vec<&str> {
    thread.messages().iter().map(|m| m.text.as_str()).collect()
}

#[test]
fn full_conversation_lifecycle() {
    let mut thread = Thread::with_welcome();
    let mut edit = EditController::default();

    // First exchange: optimistic user append, then the server reply.
    let first = conversation::submit(&mut thread, &mut edit, "what is Rust?")
        .expect("non-empty input is accepted");
    assert!(!first.is_edited);
    thread.append(ChatMessage::bot("bot_1", "A systems language."));

    // Second exchange.
    let second = conversation::submit(&mut thread, &mut edit, "who makes it?")
        .expect("non-empty input is accepted");
    thread.append(ChatMessage::bot("bot_2", "A community project."));

    assert_eq!(
        texts(&thread),
        vec![
            "Hello! I'm your AI assistant. How can I help you today?",
            "what is Rust?",
            "A systems language.",
            "who makes it?",
            "A community project.",
        ],
        "rendered order equals append order"
    );

    // Edit the second question: everything after it must go.
    edit.begin(&second.message_id);
    let resend = conversation::submit(&mut thread, &mut edit, "who maintains it?")
        .expect("edit submit is accepted");
    assert!(resend.is_edited);
    assert_eq!(resend.message_id, second.message_id);
    assert_eq!(thread.len(), 4, "bot_2 was truncated");
    assert!(thread.get("bot_2").is_none());
    assert!(thread.get("bot_1").is_some(), "earlier reply survives");
    assert!(thread.get(&first.message_id).is_some());

    let edited = thread.get(&second.message_id).unwrap();
    assert_eq!(edited.text, "who maintains it?");
    assert!(edited.edited);

    // The new reply arrives as if it were a fresh message.
    thread.append(ChatMessage::bot("bot_3", "The Rust project."));
    assert_eq!(thread.messages().last().unwrap().id, "bot_3");
}

#[test]
fn edit_failure_policies_diverge_as_configured() {
    let seed = {
        let mut thread = Thread::new();
        thread.append(ChatMessage::user("u1", "hi"));
        thread.append(ChatMessage::bot("b1", "hello"));
        thread.append(ChatMessage::user("u2", "bye"));
        thread
    };

    // Faithful policy: truncation sticks, one synthetic reply is appended.
    let mut kept = seed.clone();
    let mut edit = EditController::default();
    edit.begin("u1");
    let outbound = conversation::submit(&mut kept, &mut edit, "hey").unwrap();
    conversation::apply_send_failure(&mut kept, &outbound, FailurePolicy::KeepOptimistic);

    assert_eq!(texts(&kept), vec!["hey", ERROR_REPLY]);
    assert_eq!(
        kept.messages().iter().filter(|m| m.text == ERROR_REPLY).count(),
        1,
        "exactly one synthetic error message"
    );

    // Rollback policy: the pre-submit thread is restored bit for bit.
    let mut rolled = seed.clone();
    let mut edit = EditController::default();
    edit.begin("u1");
    let outbound = conversation::submit(&mut rolled, &mut edit, "hey").unwrap();
    conversation::apply_send_failure(&mut rolled, &outbound, FailurePolicy::Rollback);

    assert_eq!(rolled, seed);
}

#[test]
fn loading_a_snapshot_replaces_thread_wholesale() {
    let mut thread = Thread::with_welcome();
    let mut edit = EditController::default();
    conversation::submit(&mut thread, &mut edit, "old session talk").unwrap();

    let payload = r#"{
        "status": "success",
        "session_id": "session_restored",
        "messages": [
            {"role": "user", "parts": ["show me the plan"], "message_id": "msg_a"},
            {"role": "model", "parts": ["**Step one**: breathe."], "message_id": "msg_b"},
            {"role": "user", "parts": ["Analyze this image"], "message_id": "msg_c",
             "has_image": true, "image_path": "/uploads/plan.png"},
            {"role": "system", "parts": ["internal"], "message_id": "msg_d"}
        ]
    }"#;
    let parsed: LoadConversationResponse = serde_json::from_str(payload).unwrap();
    assert_eq!(parsed.status, "success");

    let restored: Vec<ChatMessage> = parsed
        .messages
        .into_iter()
        .filter_map(StoredMessage::into_chat_message)
        .collect();
    thread.replace_all(restored);
    edit.cancel();

    assert_eq!(thread.len(), 3, "unknown roles are dropped");
    assert!(
        thread.messages().iter().all(|m| m.id.starts_with("msg_")),
        "no messages from the previous session remain"
    );
    assert_eq!(thread.messages()[0].role, Role::User);
    assert_eq!(thread.messages()[1].role, Role::Bot);

    let image_message = &thread.messages()[2];
    assert_eq!(image_message.image_url.as_deref(), Some("/uploads/plan.png"));
    assert!(
        !image_message.shows_caption(),
        "sentinel default caption stays hidden"
    );
}

#[test]
fn cancel_during_edit_leaves_no_trace() {
    let mut thread = Thread::with_welcome();
    let mut edit = EditController::default();
    let sent = conversation::submit(&mut thread, &mut edit, "keep me").unwrap();
    let before = thread.clone();

    edit.begin(&sent.message_id);
    assert!(edit.is_target(&sent.message_id), "target highlighted");
    edit.cancel();

    assert!(!edit.is_editing());
    assert_eq!(thread, before, "zero thread mutation");
}

//! Conversation core: the message thread and the edit state machine.
//!
//! Everything in this module is plain data, independent of the DOM and the
//! network, so the whole submit/edit/failure cycle can be exercised in
//! native tests. The rendered message list is a keyed projection of
//! [`Thread`], which keeps model and view from diverging.

use crate::session;

/// Reply appended locally when a chat request fails outright.
pub const ERROR_REPLY: &str =
    "I'm sorry, I encountered an error processing your request. Please try again.";

/// Caption used when an image is sent without one. Hidden when rendering.
pub const DEFAULT_IMAGE_PROMPT: &str = "Analyze this image";

/// Greeting seeded into a fresh thread and restored by a reset.
pub const WELCOME_TEXT: &str = "Hello! I'm your AI assistant. How can I help you today?";

const WELCOME_ID: &str = "welcome";

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// One entry of the visible thread.
///
/// `edited` is one-way: once a message has been edited it stays marked, and
/// the "(edited)" annotation is derived from this flag so re-marking cannot
/// duplicate it.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub image_url: Option<String>,
    pub edited: bool,
}

impl ChatMessage {
    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            text: text.into(),
            image_url: None,
            edited: false,
        }
    }

    pub fn bot(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Bot,
            text: text.into(),
            image_url: None,
            edited: false,
        }
    }

    pub fn user_with_image(
        id: impl Into<String>,
        caption: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            text: caption.into(),
            image_url: Some(image_url.into()),
            edited: false,
        }
    }

    fn welcome() -> Self {
        Self::bot(WELCOME_ID, WELCOME_TEXT)
    }

    /// Whether the text line should be rendered. Image messages hide the
    /// sentinel default prompt.
    pub fn shows_caption(&self) -> bool {
        self.image_url.is_none() || (!self.text.is_empty() && self.text != DEFAULT_IMAGE_PROMPT)
    }
}

/// Ordered message sequence backing the visible thread.
///
/// Vector order is the only ordering authority; no timestamps are consulted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Thread {
    messages: Vec<ChatMessage>,
}

impl Thread {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh thread containing only the welcome greeting.
    pub fn with_welcome() -> Self {
        Self {
            messages: vec![ChatMessage::welcome()],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.messages.iter().position(|m| m.id == id)
    }

    /// Appends at the end; never reorders existing entries.
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Drops every message after `id`, leaving `id` itself in place, and
    /// returns the removed tail. Unknown ids are a silent no-op: the UI only
    /// calls this with ids it just looked up.
    pub fn truncate_after(&mut self, id: &str) -> Vec<ChatMessage> {
        match self.position(id) {
            Some(pos) => self.messages.split_off(pos + 1),
            None => Vec::new(),
        }
    }

    pub fn set_text(&mut self, id: &str, text: &str) {
        if let Some(pos) = self.position(id) {
            self.messages[pos].text = text.to_string();
        }
    }

    /// Idempotently flags a message as edited.
    pub fn mark_edited(&mut self, id: &str) {
        if let Some(pos) = self.position(id) {
            self.messages[pos].edited = true;
        }
    }

    /// Replaces the whole thread, used when loading a saved conversation.
    pub fn replace_all(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    /// Clears back to the welcome-only state.
    pub fn reset(&mut self) {
        self.messages = vec![ChatMessage::welcome()];
    }

    fn restore(&mut self, rollback: &EditRollback) {
        if let Some(pos) = self.position(&rollback.original.id) {
            self.messages[pos] = rollback.original.clone();
            self.messages.truncate(pos + 1);
            self.messages.extend(rollback.tail.iter().cloned());
        }
    }
}

/// Edit-mode state: at most one message is being edited at a time.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EditState {
    #[default]
    Idle,
    Editing {
        target_id: String,
    },
}

/// Owns the editing target, replacing what the source kept as an ambient
/// module-level variable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditController {
    state: EditState,
}

impl EditController {
    pub fn begin(&mut self, target_id: &str) {
        self.state = EditState::Editing {
            target_id: target_id.to_string(),
        };
    }

    pub fn cancel(&mut self) {
        self.state = EditState::Idle;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    pub fn target(&self) -> Option<&str> {
        match &self.state {
            EditState::Idle => None,
            EditState::Editing { target_id } => Some(target_id),
        }
    }

    pub fn is_target(&self, id: &str) -> bool {
        self.target() == Some(id)
    }
}

/// Snapshot taken before an optimistic edit, sufficient to restore the
/// pre-submit thread.
#[derive(Clone, Debug, PartialEq)]
pub struct EditRollback {
    original: ChatMessage,
    tail: Vec<ChatMessage>,
}

/// Description of the request a submit produced, handed to the transport
/// caller together with the rollback bookkeeping.
#[derive(Clone, Debug, PartialEq)]
pub struct Outbound {
    pub message_id: String,
    pub is_edited: bool,
    pub rollback: Option<EditRollback>,
}

/// What happens to the optimistic mutation when the send fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Source behavior: keep the truncation, append a synthetic error reply.
    #[default]
    KeepOptimistic,
    /// Restore the exact pre-submit thread from the rollback record.
    Rollback,
}

/// Applies a composer submit to the thread and edit state.
///
/// Empty input is rejected with zero mutation. In `Idle` a fresh user
/// message is appended; in `Editing` the target is rewritten in place,
/// marked edited, and its successors are dropped. The optimistic mutation
/// happens here, synchronously, before any request is issued. If the edit
/// target is no longer present the local mutation is skipped but the
/// request description is still produced.
pub fn submit(thread: &mut Thread, edit: &mut EditController, text: &str) -> Option<Outbound> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(target_id) = edit.target().map(str::to_owned) {
        let rollback = thread.get(&target_id).cloned().map(|original| {
            let tail = thread.truncate_after(&target_id);
            thread.set_text(&target_id, text);
            thread.mark_edited(&target_id);
            EditRollback { original, tail }
        });
        edit.cancel();
        Some(Outbound {
            message_id: target_id,
            is_edited: true,
            rollback,
        })
    } else {
        let message_id = session::generate_message_id();
        thread.append(ChatMessage::user(message_id.clone(), text));
        Some(Outbound {
            message_id,
            is_edited: false,
            rollback: None,
        })
    }
}

/// Resolves a failed send against the thread according to the policy.
pub fn apply_send_failure(thread: &mut Thread, outbound: &Outbound, policy: FailurePolicy) {
    match (policy, &outbound.rollback) {
        (FailurePolicy::Rollback, Some(rollback)) => thread.restore(rollback),
        _ => thread.append(ChatMessage::bot(session::generate_message_id(), ERROR_REPLY)),
    }
}

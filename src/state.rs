use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::File;

use crate::api;
use crate::conversation::{
    self, ChatMessage, DEFAULT_IMAGE_PROMPT, EditController, FailurePolicy, Thread,
};
use crate::models::{ChatRequest, ConversationSummary};
use crate::session;

/// Lifecycle of the conversation catalog panel.
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogState {
    Loading,
    Ready(Vec<ConversationSummary>),
    Failed(String),
}

impl CatalogState {
    /// True when the panel should show the explicit no-conversations
    /// placeholder rather than a blank list.
    pub fn is_empty_ready(&self) -> bool {
        matches!(self, CatalogState::Ready(list) if list.is_empty())
    }
}

/// Shared application state, provided via Leptos context.
///
/// All mutation happens on the browser's single thread; optimistic changes
/// are applied synchronously before each request is issued, so the visible
/// thread reflects user intent immediately. Nothing blocks a second send
/// while one is in flight, so replies append in arrival order.
#[derive(Clone, Copy)]
pub struct AppState {
    // --- Read signals (for components to subscribe to) ---
    pub session_id: ReadSignal<String>,
    pub thread: ReadSignal<Thread>,
    pub edit: ReadSignal<EditController>,
    pub input: ReadSignal<String>,
    pub is_typing: ReadSignal<bool>,
    pub catalog_open: ReadSignal<bool>,
    pub catalog: ReadSignal<CatalogState>,
    pub save_open: ReadSignal<bool>,

    // --- Write signals (for mutating state) ---
    pub set_session_id: WriteSignal<String>,
    pub set_thread: WriteSignal<Thread>,
    pub set_edit: WriteSignal<EditController>,
    pub set_input: WriteSignal<String>,
    pub set_is_typing: WriteSignal<bool>,
    pub set_catalog_open: WriteSignal<bool>,
    pub set_catalog: WriteSignal<CatalogState>,
    pub set_save_open: WriteSignal<bool>,

    // File handles are not Send, so this one lives in local storage.
    pub pending_image: RwSignal<Option<File>, LocalStorage>,

    failure_policy: FailurePolicy,
}

impl AppState {
    /// Create a new `AppState` and provide it in the current Leptos context.
    pub fn provide() -> Self {
        Self::provide_with_policy(FailurePolicy::default())
    }

    /// As [`AppState::provide`], with an explicit edit-failure policy.
    pub fn provide_with_policy(failure_policy: FailurePolicy) -> Self {
        let (session_id, set_session_id) = signal(session::ensure_session_id());
        let (thread, set_thread) = signal(Thread::with_welcome());
        let (edit, set_edit) = signal(EditController::default());
        let (input, set_input) = signal(String::new());
        let (is_typing, set_is_typing) = signal(false);
        let (catalog_open, set_catalog_open) = signal(false);
        let (catalog, set_catalog) = signal(CatalogState::Ready(Vec::new()));
        let (save_open, set_save_open) = signal(false);

        let state = Self {
            session_id,
            thread,
            edit,
            input,
            is_typing,
            catalog_open,
            catalog,
            save_open,
            set_session_id,
            set_thread,
            set_edit,
            set_input,
            set_is_typing,
            set_catalog_open,
            set_catalog,
            set_save_open,
            pending_image: RwSignal::new_local(None),
            failure_policy,
        };

        provide_context(state);
        state
    }

    /// Submit the composer: either a fresh message or the active edit.
    pub fn submit_input(&self) {
        let message = self.input.get_untracked().trim().to_string();
        let mut edit = self.edit.get_untracked();
        let mut outbound = None;
        self.set_thread
            .update(|thread| outbound = conversation::submit(thread, &mut edit, &message));
        self.set_edit.set(edit);
        let Some(outbound) = outbound else {
            return;
        };

        self.set_input.set(String::new());
        self.set_is_typing.set(true);

        let request = ChatRequest {
            message,
            session_id: self.session_id.get_untracked(),
            message_id: outbound.message_id.clone(),
            is_edited: outbound.is_edited.then_some(true),
        };
        let state = *self;
        spawn_local(async move {
            match api::send_chat(&request).await {
                Ok(reply) => {
                    state.set_is_typing.set(false);
                    state.set_thread.update(|thread| {
                        thread.append(ChatMessage::bot(reply.bot_message_id, reply.response));
                    });
                }
                Err(e) => {
                    log::error!("Chat request failed: {e}");
                    state.set_is_typing.set(false);
                    state.set_thread.update(|thread| {
                        conversation::apply_send_failure(thread, &outbound, state.failure_policy);
                    });
                }
            }
        });
    }

    /// Enter edit mode on a user message, preloading the composer with its
    /// current text.
    pub fn begin_edit(&self, message_id: &str) {
        let Some(current) = self
            .thread
            .get_untracked()
            .get(message_id)
            .map(|m| m.text.clone())
        else {
            return;
        };
        self.set_edit.update(|edit| edit.begin(message_id));
        self.set_input.set(current);
    }

    /// Leave edit mode without touching the thread.
    pub fn cancel_edit(&self) {
        self.set_edit.update(|edit| edit.cancel());
        self.set_input.set(String::new());
    }

    /// Stage a selected file for the preview dialog. Non-image files are
    /// rejected before any state mutation.
    pub fn attach_image(&self, file: File) {
        if !file.type_().starts_with("image/") {
            alert("Please select an image file.");
            return;
        }
        self.pending_image.set(Some(file));
    }

    /// Send the staged image with its caption. The preview dialog closes
    /// immediately; the staged file is cleared regardless of the outcome.
    pub fn send_pending_image(&self, caption: String) {
        let Some(file) = self.pending_image.get_untracked() else {
            return;
        };
        self.pending_image.set(None);

        let caption = {
            let trimmed = caption.trim();
            if trimmed.is_empty() {
                DEFAULT_IMAGE_PROMPT.to_string()
            } else {
                trimmed.to_string()
            }
        };
        self.set_is_typing.set(true);

        let session_id = self.session_id.get_untracked();
        let message_id = session::generate_message_id();
        let state = *self;
        spawn_local(async move {
            match api::send_chat_with_image(&file, &caption, &session_id, &message_id).await {
                Ok(reply) => {
                    state.set_is_typing.set(false);
                    state.set_thread.update(|thread| {
                        thread.append(ChatMessage::user_with_image(
                            reply.user_message_id,
                            caption,
                            reply.image_url,
                        ));
                        thread.append(ChatMessage::bot(reply.bot_message_id, reply.response));
                    });
                }
                Err(e) => {
                    log::error!("Image upload failed: {e}");
                    state.set_is_typing.set(false);
                    alert("Error uploading image. Please try again.");
                }
            }
        });
    }

    /// Start a new chat: clear the thread locally, then ask the backend to
    /// drop the session. A fresh session id is only issued once the backend
    /// acknowledges; a failed reset is logged and otherwise best-effort.
    pub fn reset(&self) {
        if !confirm(
            "Are you sure you want to start a new chat? This will clear your conversation history.",
        ) {
            return;
        }

        self.set_thread.update(|thread| thread.reset());
        self.set_edit.update(|edit| edit.cancel());
        self.set_input.set(String::new());

        let old_session = self.session_id.get_untracked();
        let state = *self;
        spawn_local(async move {
            match api::reset_session(&old_session).await {
                Ok(ack) => {
                    log::debug!("Chat reset: {ack}");
                    let fresh = session::generate_session_id();
                    session::replace_session_id(&fresh);
                    state.set_session_id.set(fresh);
                }
                Err(e) => log::error!("Error resetting chat: {e}"),
            }
        });
    }

    /// Persist the current conversation under a title.
    pub fn save(&self, title: String) {
        self.set_save_open.set(false);
        let session_id = self.session_id.get_untracked();
        spawn_local(async move {
            match api::save_conversation(&session_id, &title).await {
                Ok(()) => alert("Conversation saved successfully!"),
                Err(e) => match e.backend_detail() {
                    Some(detail) => alert(&format!("Error: {detail}")),
                    None => {
                        log::error!("Save failed: {e}");
                        alert("Error saving conversation. Please try again.");
                    }
                },
            }
        });
    }

    /// Open the catalog panel and refresh its contents.
    pub fn open_catalog(&self) {
        self.set_catalog_open.set(true);
        self.refresh_conversations();
    }

    pub fn refresh_conversations(&self) {
        self.set_catalog.set(CatalogState::Loading);
        let state = *self;
        spawn_local(async move {
            match api::fetch_conversations().await {
                Ok(list) => state.set_catalog.set(CatalogState::Ready(list)),
                Err(e) => {
                    log::error!("Failed to fetch conversations: {e}");
                    state
                        .set_catalog
                        .set(CatalogState::Failed("Error loading conversations".to_string()));
                }
            }
        });
    }

    /// Load a saved conversation, replacing the active session and thread
    /// wholesale. Closes the catalog panel on success.
    pub fn select_conversation(&self, filename: String) {
        let state = *self;
        spawn_local(async move {
            match api::load_conversation(&filename).await {
                Ok(loaded) => {
                    session::replace_session_id(&loaded.session_id);
                    state.set_session_id.set(loaded.session_id);
                    state
                        .set_thread
                        .update(|thread| thread.replace_all(loaded.messages));
                    state.set_edit.update(|edit| edit.cancel());
                    state.set_input.set(String::new());
                    state.set_catalog_open.set(false);
                }
                Err(e) => match e.backend_detail() {
                    Some(detail) => alert(&format!("Error: {detail}")),
                    None => {
                        log::error!("Load failed: {e}");
                        alert("Error loading conversation. Please try again.");
                    }
                },
            }
        });
    }
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_catalog_is_distinguishable_from_blank_states() {
        assert!(CatalogState::Ready(Vec::new()).is_empty_ready());
        assert!(!CatalogState::Loading.is_empty_ready());
        assert!(!CatalogState::Failed("x".into()).is_empty_ready());
        let one = ConversationSummary {
            title: "t".into(),
            date: "d".into(),
            filename: "f".into(),
        };
        assert!(!CatalogState::Ready(vec![one]).is_empty_ready());
    }
}

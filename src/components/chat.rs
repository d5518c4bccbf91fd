use leptos::ev;
use leptos::html::{Div, Input};
use leptos::prelude::*;

use crate::conversation::{ChatMessage, Role};
use crate::markdown;
use crate::state::AppState;

/// Main chat area: message history, typing indicator, and composer.
#[component]
pub fn ChatArea() -> impl IntoView {
    let state = expect_context::<AppState>();
    let messages_ref = NodeRef::<Div>::new();

    // Keep the newest entry in view after every thread change.
    Effect::new(move |_| {
        state.thread.track();
        state.is_typing.track();
        if let Some(el) = messages_ref.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    view! {
        <main class="chat-area">
            <div class="chat-messages" node_ref=messages_ref>
                <For
                    // The key covers text and the edited flag so an in-place
                    // edit re-renders its row.
                    each=move || state.thread.get().messages().to_vec()
                    key=|m| (m.id.clone(), m.text.clone(), m.edited)
                    let:message
                >
                    <MessageBubble message=message />
                </For>
                {move || {
                    state.is_typing.get().then(|| {
                        view! {
                            <div class="message bot-message typing-indicator">
                                <div class="message-content">
                                    <p>"…"</p>
                                </div>
                            </div>
                        }
                    })
                }}
            </div>
            <ChatInput />
            <ImagePreviewDialog />
        </main>
    }
}

/// A single message bubble. Bot replies render as markdown trusted from the
/// backend; user messages are plain text nodes (escaped by construction)
/// with an edit affordance.
#[component]
fn MessageBubble(message: ChatMessage) -> impl IntoView {
    let state = expect_context::<AppState>();

    match message.role {
        Role::Bot => view! {
            <div class="message bot-message">
                <div class="message-content" inner_html=markdown::render(&message.text)></div>
            </div>
        }
        .into_any(),
        Role::User => {
            let highlight_id = message.id.clone();
            let edit_id = message.id.clone();
            let editable = message.image_url.is_none();
            view! {
                <div
                    class="message user-message"
                    class:editing=move || state.edit.get().is_target(&highlight_id)
                >
                    <div class="message-content">
                        {message.image_url.clone().map(|url| {
                            view! {
                                <div class="image-container">
                                    <img class="uploaded-image" src=url alt="Uploaded image" />
                                </div>
                            }
                        })}
                        {message
                            .shows_caption()
                            .then(|| view! { <p>{message.text.clone()}</p> })}
                        {message.edited.then(|| {
                            view! { <span class="edited-indicator">"(edited)"</span> }
                        })}
                    </div>
                    {editable.then(|| {
                        view! {
                            <div class="message-actions">
                                <button
                                    class="action-btn edit-btn"
                                    title="Edit message"
                                    on:click=move |_| state.begin_edit(&edit_id)
                                >
                                    "Edit"
                                </button>
                            </div>
                        }
                    })}
                </div>
            }
            .into_any()
        }
    }
}

/// Composer with edit banner, image attach, and Enter-to-send. The input
/// stays enabled while a request is pending: overlapping sends are allowed
/// and their replies append in arrival order.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<AppState>();
    let file_ref = NodeRef::<Input>::new();

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            state.submit_input();
        }
    };

    view! {
        <div class="input-area">
            {move || {
                state.edit.get().is_editing().then(|| {
                    view! {
                        <div class="edit-info">
                            <span>"Editing message"</span>
                            <button class="cancel-edit-btn" on:click=move |_| state.cancel_edit()>
                                "Cancel"
                            </button>
                        </div>
                    }
                })
            }}
            <div class="input-row">
                <button
                    class="image-upload-btn"
                    title="Send an image"
                    on:click=move |_| {
                        if let Some(input) = file_ref.get() {
                            input.click();
                        }
                    }
                >
                    "Image"
                </button>
                <input
                    type="file"
                    accept="image/*"
                    style="display:none"
                    node_ref=file_ref
                    on:change=move |ev| {
                        let input = event_target::<web_sys::HtmlInputElement>(&ev);
                        if let Some(file) = input.files().and_then(|files| files.get(0)) {
                            state.attach_image(file);
                        }
                        input.set_value("");
                    }
                />
                <textarea
                    rows="1"
                    placeholder="Type a message… (Enter to send, Shift+Enter for newline)"
                    prop:value=move || state.input.get()
                    on:input=move |ev| state.set_input.set(event_target_value(&ev))
                    on:keydown=on_keydown
                />
                <button
                    class="send-btn"
                    on:click=move |_| state.submit_input()
                    disabled=move || state.input.get().trim().is_empty()
                >
                    "Send"
                </button>
            </div>
        </div>
    }
}

/// Preview/caption dialog for a staged image; the upload is only issued
/// from here.
#[component]
fn ImagePreviewDialog() -> impl IntoView {
    let state = expect_context::<AppState>();
    let (caption, set_caption) = signal(String::new());

    view! {
        {move || {
            state.pending_image.get().map(|file| {
                let preview_url = web_sys::Url::create_object_url_with_blob(&file)
                    .ok()
                    .unwrap_or_default();
                view! {
                    <div class="modal-backdrop">
                        <div class="modal image-preview-modal">
                            <img class="preview-image" src=preview_url alt="Preview" />
                            <input
                                type="text"
                                placeholder="Add a caption (optional)"
                                prop:value=caption
                                on:input=move |ev| set_caption.set(event_target_value(&ev))
                            />
                            <div class="modal-actions">
                                <button on:click=move |_| {
                                    state.pending_image.set(None);
                                    set_caption.set(String::new());
                                }>"Cancel"</button>
                                <button
                                    class="send-btn"
                                    on:click=move |_| {
                                        state.send_pending_image(caption.get_untracked());
                                        set_caption.set(String::new());
                                    }
                                >
                                    "Send"
                                </button>
                            </div>
                        </div>
                    </div>
                }
            })
        }}
    }
}

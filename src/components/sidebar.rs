use leptos::prelude::*;
use wasm_bindgen::JsValue;

use crate::models::ConversationSummary;
use crate::state::{AppState, CatalogState};

/// Sidebar: conversation actions plus the saved-conversation catalog.
#[component]
pub fn Sidebar() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <aside class="sidebar">
            <div class="sidebar-header">
                <h2>"AI Chat"</h2>
                <button class="new-chat-btn" on:click=move |_| state.reset()>
                    "+ New Chat"
                </button>
            </div>
            <div class="sidebar-actions">
                <button class="save-btn" on:click=move |_| state.set_save_open.set(true)>
                    "Save"
                </button>
                <button
                    class="load-btn"
                    on:click=move |_| {
                        if state.catalog_open.get_untracked() {
                            state.set_catalog_open.set(false);
                        } else {
                            state.open_catalog();
                        }
                    }
                >
                    "Load"
                </button>
            </div>
            {move || state.catalog_open.get().then(|| view! { <ConversationCatalog /> })}
            {move || state.save_open.get().then(|| view! { <SaveDialog /> })}
            <div class="session-footer">
                {move || {
                    let id = state.session_id.get();
                    format!("Session: {}", &id[..16.min(id.len())])
                }}
            </div>
        </aside>
    }
}

/// Saved-conversation panel: loading notice, inline error placeholder,
/// explicit empty state, or clickable rows.
#[component]
fn ConversationCatalog() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <div class="conversation-list">
            {move || match state.catalog.get() {
                CatalogState::Loading => {
                    view! { <div class="catalog-notice">"Loading conversations…"</div> }.into_any()
                }
                CatalogState::Failed(message) => {
                    view! { <div class="catalog-notice error-msg">{message}</div> }.into_any()
                }
                ready if ready.is_empty_ready() => {
                    view! {
                        <div class="catalog-notice no-conversations-msg">
                            "No saved conversations found"
                        </div>
                    }
                    .into_any()
                }
                CatalogState::Ready(list) => {
                    view! {
                        <For each=move || list.clone() key=|c| c.filename.clone() let:conv>
                            <CatalogRow conv=conv />
                        </For>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}

/// One clickable catalog entry; selecting it replaces the active thread.
#[component]
fn CatalogRow(conv: ConversationSummary) -> impl IntoView {
    let state = expect_context::<AppState>();
    let filename = conv.filename.clone();

    view! {
        <div
            class="conversation-item"
            on:click=move |_| state.select_conversation(filename.clone())
        >
            <div class="conversation-title">{conv.title.clone()}</div>
            <small class="conversation-date">{format_date(&conv.date)}</small>
        </div>
    }
}

/// Title dialog for saving the current conversation.
#[component]
fn SaveDialog() -> impl IntoView {
    let state = expect_context::<AppState>();
    let (title, set_title) = signal(default_title());

    view! {
        <div class="modal-backdrop">
            <div class="modal save-modal">
                <h3>"Save conversation"</h3>
                <input
                    type="text"
                    prop:value=title
                    on:input=move |ev| set_title.set(event_target_value(&ev))
                />
                <div class="modal-actions">
                    <button on:click=move |_| state.set_save_open.set(false)>"Cancel"</button>
                    <button
                        class="save-btn"
                        on:click=move |_| {
                            let entered = title.get_untracked();
                            let entered = entered.trim();
                            let title = if entered.is_empty() {
                                default_title()
                            } else {
                                entered.to_string()
                            };
                            state.save(title);
                        }
                    >
                        "Save"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Default save title: `Conversation <local date>`.
fn default_title() -> String {
    let date = js_sys::Date::new_0().to_locale_date_string("default", &JsValue::UNDEFINED);
    format!("Conversation {}", String::from(date))
}

/// Locale-formats a catalog row's date, falling back to the raw value.
fn format_date(value: &str) -> String {
    let parsed = js_sys::Date::new(&JsValue::from_str(value));
    if parsed.get_time().is_nan() {
        value.to_string()
    } else {
        String::from(parsed.to_locale_string("default", &JsValue::UNDEFINED))
    }
}

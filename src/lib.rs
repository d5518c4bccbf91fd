//! Browser-resident chat client for a conversational HTTP backend.
//!
//! The client keeps a locally rendered message thread in sync with a remote
//! backend that is the sole source of truth for generated replies. It
//! supports:
//!
//! - Text messages and image-attached messages
//! - In-place message editing, truncating the history after the edit
//! - Save/load of named conversation snapshots
//! - A session identity persisted across reloads
//!
//! The conversation state machine in [`conversation`] is plain data with no
//! DOM or network coupling, so the optimistic submit/edit/failure cycle is
//! fully exercised by native tests; the Leptos components project that
//! state into the document.

pub mod api;
pub mod components;
pub mod conversation;
pub mod markdown;
pub mod models;
pub mod session;
pub mod state;

pub use conversation::{ChatMessage, EditController, FailurePolicy, Role, Thread};
pub use state::{AppState, CatalogState};

//! Transport layer: one wrapper per backend endpoint.
//!
//! Every operation follows the same lifecycle: issue exactly one request,
//! map any non-success status or network failure to a typed error, parse
//! the body on success. Pending-indicator handling belongs to the caller,
//! which shows it before invoking these and hides it on either outcome.

use gloo_net::http::Request;
use thiserror::Error;
use web_sys::{File, FormData};

use crate::conversation::ChatMessage;
use crate::models::{
    ChatRequest, ChatResponse, ConversationsResponse, ConversationSummary, ImageChatResponse,
    LoadConversationResponse, ResetRequest, SaveRequest, SaveResponse,
};

/// Base URL for backend requests. Empty means same-origin, the deployment
/// where the backend serves this client.
const API_BASE: &str = "";

/// Failures surfaced by the transport layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Parse(String),
    /// HTTP success, but the backend reported an application-level failure.
    #[error("{0}")]
    Backend(String),
}

impl ApiError {
    /// Server-provided detail for user-facing dialogs, if any.
    pub fn backend_detail(&self) -> Option<&str> {
        match self {
            ApiError::Backend(detail) => Some(detail),
            _ => None,
        }
    }
}

/// A snapshot ready to replace the active thread.
pub struct LoadedConversation {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
}

/// `POST /chat` — send a text message (fresh or edited).
pub async fn send_chat(request: &ChatRequest) -> Result<ChatResponse, ApiError> {
    let resp = Request::post(&format!("{API_BASE}/chat"))
        .json(request)
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !resp.ok() {
        return Err(ApiError::Status(resp.status()));
    }

    resp.json::<ChatResponse>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

/// `POST /chat-with-image` — multipart upload of an image plus caption.
pub async fn send_chat_with_image(
    image: &File,
    caption: &str,
    session_id: &str,
    message_id: &str,
) -> Result<ImageChatResponse, ApiError> {
    let form = FormData::new().map_err(|e| ApiError::Network(format!("{e:?}")))?;
    form.append_with_blob("image", image)
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;
    form.append_with_str("message", caption)
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;
    form.append_with_str("session_id", session_id)
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;
    form.append_with_str("message_id", message_id)
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;

    let resp = Request::post(&format!("{API_BASE}/chat-with-image"))
        .body(form)
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !resp.ok() {
        return Err(ApiError::Status(resp.status()));
    }

    resp.json::<ImageChatResponse>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

/// `POST /reset` — ask the backend to drop the session's history. The
/// acknowledgement payload is arbitrary and only worth logging.
pub async fn reset_session(session_id: &str) -> Result<serde_json::Value, ApiError> {
    let body = ResetRequest {
        session_id: session_id.to_string(),
    };
    let resp = Request::post(&format!("{API_BASE}/reset"))
        .json(&body)
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !resp.ok() {
        return Err(ApiError::Status(resp.status()));
    }

    resp.json::<serde_json::Value>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

/// `POST /save-conversation` — persist the session under a title.
pub async fn save_conversation(session_id: &str, title: &str) -> Result<(), ApiError> {
    let body = SaveRequest {
        session_id: session_id.to_string(),
        title: title.to_string(),
    };
    let resp = Request::post(&format!("{API_BASE}/save-conversation"))
        .json(&body)
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !resp.ok() {
        return Err(ApiError::Status(resp.status()));
    }

    let parsed = resp
        .json::<SaveResponse>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))?;

    if parsed.status != "success" {
        return Err(ApiError::Backend(
            parsed.error.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }
    Ok(())
}

/// `GET /get-conversations` — fetch the list of saved conversations.
pub async fn fetch_conversations() -> Result<Vec<ConversationSummary>, ApiError> {
    let resp = Request::get(&format!("{API_BASE}/get-conversations"))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !resp.ok() {
        return Err(ApiError::Status(resp.status()));
    }

    resp.json::<ConversationsResponse>()
        .await
        .map(|parsed| parsed.conversations)
        .map_err(|e| ApiError::Parse(e.to_string()))
}

/// `GET /load-conversation/{filename}` — fetch a snapshot and convert its
/// stored messages into the client model.
pub async fn load_conversation(filename: &str) -> Result<LoadedConversation, ApiError> {
    let resp = Request::get(&format!("{API_BASE}/load-conversation/{filename}"))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !resp.ok() {
        return Err(ApiError::Status(resp.status()));
    }

    let parsed = resp
        .json::<LoadConversationResponse>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))?;

    if parsed.status != "success" {
        return Err(ApiError::Backend(
            parsed.error.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }

    let session_id = parsed
        .session_id
        .ok_or_else(|| ApiError::Parse("missing session_id".to_string()))?;
    let messages = parsed
        .messages
        .into_iter()
        .filter_map(|m| m.into_chat_message())
        .collect();

    Ok(LoadedConversation {
        session_id,
        messages,
    })
}

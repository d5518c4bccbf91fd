use serde::{Deserialize, Serialize};

use crate::conversation::ChatMessage;

/// Body for `POST /chat`.
#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
    pub message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_edited: Option<bool>,
}

/// Reply from `POST /chat`.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub bot_message_id: String,
}

/// Reply from `POST /chat-with-image`.
#[derive(Clone, Debug, Deserialize)]
pub struct ImageChatResponse {
    pub response: String,
    pub bot_message_id: String,
    pub user_message_id: String,
    pub image_url: String,
}

/// Body for `POST /reset`.
#[derive(Clone, Debug, Serialize)]
pub struct ResetRequest {
    pub session_id: String,
}

/// Body for `POST /save-conversation`.
#[derive(Clone, Debug, Serialize)]
pub struct SaveRequest {
    pub session_id: String,
    pub title: String,
}

/// Reply from `POST /save-conversation`.
#[derive(Clone, Debug, Deserialize)]
pub struct SaveResponse {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// One row of `GET /get-conversations`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ConversationSummary {
    pub title: String,
    pub date: String,
    pub filename: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ConversationsResponse {
    #[serde(default)]
    pub conversations: Vec<ConversationSummary>,
}

/// Reply from `GET /load-conversation/{filename}`.
#[derive(Clone, Debug, Deserialize)]
pub struct LoadConversationResponse {
    pub status: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<StoredMessage>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One message as persisted by the backend. `parts[0]` is the text; roles
/// use the server vocabulary (`"user"` / `"model"`).
#[derive(Clone, Debug, Deserialize)]
pub struct StoredMessage {
    pub role: String,
    #[serde(default)]
    pub parts: Vec<String>,
    pub message_id: String,
    #[serde(default)]
    pub has_image: bool,
    #[serde(default)]
    pub image_path: Option<String>,
}

impl StoredMessage {
    /// Maps a stored message into the client model. Unknown roles are
    /// dropped rather than rendered.
    pub fn into_chat_message(self) -> Option<ChatMessage> {
        let text = self.parts.into_iter().next().unwrap_or_default();
        match self.role.as_str() {
            "user" => {
                let mut message = ChatMessage::user(self.message_id, text);
                if self.has_image {
                    message.image_url = self.image_path;
                }
                Some(message)
            }
            "model" => Some(ChatMessage::bot(self.message_id, text)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;

    #[test]
    fn chat_request_omits_edit_fields_for_fresh_messages() {
        let body = serde_json::to_value(ChatRequest {
            message: "hi".into(),
            session_id: "session_1".into(),
            message_id: "msg_1".into(),
            is_edited: None,
        })
        .unwrap();
        assert!(body.get("is_edited").is_none());
        assert_eq!(body["message"], "hi");
    }

    #[test]
    fn chat_request_carries_edit_fields_when_set() {
        let body = serde_json::to_value(ChatRequest {
            message: "hey".into(),
            session_id: "session_1".into(),
            message_id: "msg_1".into(),
            is_edited: Some(true),
        })
        .unwrap();
        assert_eq!(body["is_edited"], true);
        assert_eq!(body["message_id"], "msg_1");
    }

    #[test]
    fn conversations_response_tolerates_missing_list() {
        let parsed: ConversationsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.conversations.is_empty());

        let parsed: ConversationsResponse = serde_json::from_str(
            r#"{"conversations":[{"title":"Trip notes","date":"2026-08-01T10:00:00","filename":"conv_1.json"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.conversations.len(), 1);
        assert_eq!(parsed.conversations[0].filename, "conv_1.json");
    }

    #[test]
    fn load_response_parses_error_envelope() {
        let parsed: LoadConversationResponse =
            serde_json::from_str(r#"{"status":"error","error":"File not found"}"#).unwrap();
        assert_eq!(parsed.status, "error");
        assert_eq!(parsed.error.as_deref(), Some("File not found"));
        assert!(parsed.messages.is_empty());
    }

    #[test]
    fn stored_user_message_converts_with_image() {
        let stored: StoredMessage = serde_json::from_str(
            r#"{"role":"user","parts":["look at this"],"message_id":"msg_9","has_image":true,"image_path":"/uploads/a.png"}"#,
        )
        .unwrap();
        let message = stored.into_chat_message().unwrap();
        assert_eq!(message.role, Role::User);
        assert_eq!(message.text, "look at this");
        assert_eq!(message.image_url.as_deref(), Some("/uploads/a.png"));
    }

    #[test]
    fn stored_model_message_converts_to_bot() {
        let stored: StoredMessage =
            serde_json::from_str(r#"{"role":"model","parts":["hello"],"message_id":"msg_2"}"#)
                .unwrap();
        let message = stored.into_chat_message().unwrap();
        assert_eq!(message.role, Role::Bot);
        assert!(message.image_url.is_none());
    }

    #[test]
    fn stored_unknown_role_is_dropped() {
        let stored: StoredMessage =
            serde_json::from_str(r#"{"role":"system","parts":["x"],"message_id":"msg_3"}"#)
                .unwrap();
        assert!(stored.into_chat_message().is_none());
    }
}

//! Session identity: one durable `localStorage` key holding the active
//! session id, surviving reloads and overwritten on reset/load.
//!
//! Ids are opaque random strings; sessions are not a security boundary.

use uuid::Uuid;

const SESSION_STORAGE_KEY: &str = "chat_session_id";

/// Returns the persisted session id, creating and persisting one if absent.
pub fn ensure_session_id() -> String {
    if let Some(existing) = storage()
        .and_then(|s| s.get_item(SESSION_STORAGE_KEY).ok().flatten())
        .filter(|id| !id.is_empty())
    {
        return existing;
    }
    let id = generate_session_id();
    replace_session_id(&id);
    id
}

/// Overwrites the persisted session id. No network call.
pub fn replace_session_id(new_id: &str) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(SESSION_STORAGE_KEY, new_id);
    }
}

pub fn generate_session_id() -> String {
    format!("session_{}", Uuid::new_v4().simple())
}

pub fn generate_message_id() -> String {
    format!("msg_{}", Uuid::new_v4().simple())
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_their_prefix() {
        assert!(generate_session_id().starts_with("session_"));
        assert!(generate_message_id().starts_with("msg_"));
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(generate_session_id(), generate_session_id());
        assert_ne!(generate_message_id(), generate_message_id());
    }
}

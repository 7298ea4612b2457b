//! Durable session persistence.
//!
//! The token and display name survive reloads; restore is optimistic (no
//! server round-trip) and validity is confirmed lazily by the first
//! authenticated request.

pub(crate) const TOKEN_KEY: &str = "scriptwriter_token";
pub(crate) const USER_KEY: &str = "scriptwriter_username";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct StoredSession {
    pub token: String,
    pub username: String,
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// A value historically written by buggy clients serializing `undefined`.
/// Treat it, and blanks, as absent rather than as a session.
pub(crate) fn is_placeholder(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == "undefined"
}

pub(crate) fn load_session() -> Option<StoredSession> {
    let storage = local_storage()?;
    let token = storage.get_item(TOKEN_KEY).ok().flatten()?;
    let username = storage.get_item(USER_KEY).ok().flatten()?;

    if is_placeholder(&token) || is_placeholder(&username) {
        return None;
    }

    Some(StoredSession { token, username })
}

pub(crate) fn save_session(token: &str, username: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(TOKEN_KEY, token);
        let _ = storage.set_item(USER_KEY, username);
    }
}

pub(crate) fn clear_session() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(TOKEN_KEY);
        let _ = storage.remove_item(USER_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_values_rejected() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("   "));
        assert!(is_placeholder("undefined"));
        assert!(!is_placeholder("eyJhbGciOi..."));
        assert!(!is_placeholder("ada"));
    }
}

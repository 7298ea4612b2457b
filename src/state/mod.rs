mod session;

pub(crate) use session::SessionController;

use crate::api::ApiClient;
use crate::editor::EditorSession;
use crate::storage;
use leptos::prelude::*;

/// Transient save-pipeline status shown next to the Save button. Purely
/// observational; it never gates any transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Failed,
}

impl SaveStatus {
    pub fn label(self) -> Option<&'static str> {
        match self {
            SaveStatus::Idle => None,
            SaveStatus::Saving => Some("Saving..."),
            SaveStatus::Saved => Some("Saved"),
            SaveStatus::Failed => Some("Save failed"),
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Display name of the signed-in user.
    pub current_user: RwSignal<Option<String>>,

    /// The editing-session core: registry cache, selection, edit buffer.
    pub session: RwSignal<EditorSession>,

    pub save_status: RwSignal<SaveStatus>,

    /// Inline error for the editor view.
    pub error: RwSignal<Option<String>>,

    /// Login-page notice (e.g. forced logout after token expiry).
    pub notice: RwSignal<Option<String>>,
}

impl AppState {
    pub fn new() -> Self {
        // Optimistic restore: trust durable storage without a server
        // round-trip; the first authenticated request invalidates a stale
        // token via the forced-logout path.
        let stored_user = storage::load_session().map(|s| s.username);
        let stored_client = ApiClient::load_from_storage();

        Self {
            api_client: RwSignal::new(stored_client),
            current_user: RwSignal::new(stored_user),
            session: RwSignal::new(EditorSession::default()),
            save_status: RwSignal::new(SaveStatus::Idle),
            error: RwSignal::new(None),
            notice: RwSignal::new(None),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_status_labels() {
        assert!(SaveStatus::Idle.label().is_none());
        assert_eq!(SaveStatus::Saving.label(), Some("Saving..."));
        assert_eq!(SaveStatus::Saved.label(), Some("Saved"));
        assert_eq!(SaveStatus::Failed.label(), Some("Save failed"));
    }
}

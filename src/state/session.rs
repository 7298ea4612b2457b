use crate::api::{ApiError, ApiErrorKind};
use crate::editor::{Command, SaveSnapshot};
use crate::models::Screenplay;
use crate::state::{AppContext, SaveStatus};
use crate::util;
use leptos::logging;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

/// Debounce window after the most recent keystroke.
const AUTOSAVE_MS: i32 = 2000;

/// How long Saved / Failed stay visible before reverting to Idle.
const STATUS_SAVED_MS: i32 = 2000;
const STATUS_FAILED_MS: i32 = 3000;

const SESSION_EXPIRED_NOTICE: &str = "Session expired. Please sign in again.";

/// Reactive shell around the [`crate::editor::EditorSession`] core.
///
/// Owns the real side effects the core only describes:
/// - the single pending autosave timer (arming replaces, never queues)
/// - the status auto-revert timer
/// - every Remote Gateway round-trip, always driven by a [`SaveSnapshot`]
///   captured before the suspension point
/// - the forced-logout path reachable from every authenticated call
#[derive(Clone)]
pub(crate) struct SessionController {
    app_state: AppContext,

    /// Handle of the pending debounce timer, if any.
    autosave_timer_id: RwSignal<Option<i32>>,

    /// Handle of the pending status revert, if any.
    status_timer_id: RwSignal<Option<i32>>,
}

impl SessionController {
    pub fn new(app_state: AppContext) -> Self {
        Self {
            app_state,
            autosave_timer_id: RwSignal::new(None),
            status_timer_id: RwSignal::new(None),
        }
    }

    fn run(&self, cmds: Vec<Command>) {
        for cmd in cmds {
            match cmd {
                Command::ArmTimer => self.schedule_autosave(),
                Command::CancelTimer => self.clear_autosave_timer(),
                Command::Flush(snap) => self.flush(snap, true),
            }
        }
    }

    /* ========================================================== */
    /*                      EDIT BUFFER INPUT                     */
    /* ========================================================== */

    pub fn on_title_input(&self, value: &str) {
        let cmd = self
            .app_state
            .0
            .session
            .try_update(|s| s.edit_title(value))
            .flatten();
        if let Some(cmd) = cmd {
            self.run(vec![cmd]);
        }
    }

    pub fn on_content_input(&self, value: &str) {
        let cmd = self
            .app_state
            .0
            .session
            .try_update(|s| s.edit_content(value))
            .flatten();
        if let Some(cmd) = cmd {
            self.run(vec![cmd]);
        }
    }

    /* ========================================================== */
    /*                          TIMERS                            */
    /* ========================================================== */

    fn schedule_autosave(&self) {
        let Some(win) = web_sys::window() else {
            return;
        };

        // Cancel-then-rearm: at most one pending timer.
        if let Some(tid) = self.autosave_timer_id.get_untracked() {
            let _ = win.clear_timeout_with_handle(tid);
        }

        let s2 = self.clone();
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            s2.autosave_timer_id.set(None);

            // Selection was captured at arm time; buffer values are read now.
            let snap = s2
                .app_state
                .0
                .session
                .try_update(|s| s.timer_fired())
                .flatten();
            if let Some(snap) = snap {
                s2.flush(snap, true);
            }
        });

        let tid = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                AUTOSAVE_MS,
            )
            .unwrap_or(0);

        self.autosave_timer_id.set(Some(tid));
    }

    fn clear_autosave_timer(&self) {
        if let Some(win) = web_sys::window() {
            if let Some(tid) = self.autosave_timer_id.get_untracked() {
                let _ = win.clear_timeout_with_handle(tid);
            }
        }
        self.autosave_timer_id.set(None);
    }

    fn set_status(&self, status: SaveStatus) {
        self.clear_status_timer();
        self.app_state.0.save_status.set(status);
    }

    /// Show `status`, then revert to Idle after `ms`. A newer status always
    /// replaces the pending revert.
    fn set_status_reverting(&self, status: SaveStatus, ms: i32) {
        self.set_status(status);

        let Some(win) = web_sys::window() else {
            return;
        };

        let s2 = self.clone();
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            s2.status_timer_id.set(None);
            s2.app_state.0.save_status.set(SaveStatus::Idle);
        });

        let tid = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), ms)
            .unwrap_or(0);
        self.status_timer_id.set(Some(tid));
    }

    fn clear_status_timer(&self) {
        if let Some(win) = web_sys::window() {
            if let Some(tid) = self.status_timer_id.get_untracked() {
                let _ = win.clear_timeout_with_handle(tid);
            }
        }
        self.status_timer_id.set(None);
    }

    /* ========================================================== */
    /*                          SAVES                             */
    /* ========================================================== */

    /// Push one captured snapshot to the server. Silent saves surface no
    /// inline error; authorization expiry always tears the session down.
    fn flush(&self, snap: SaveSnapshot, silent: bool) {
        self.set_status(SaveStatus::Saving);

        let api_client = self.app_state.0.api_client.get_untracked();
        let s2 = self.clone();
        spawn_local(async move {
            match api_client
                .update_screenplay(snap.id, &snap.title, &snap.content)
                .await
            {
                Ok(_) => {
                    s2.set_status_reverting(SaveStatus::Saved, STATUS_SAVED_MS);
                    // Post-save reconciliation: sidebar ordering and titles
                    // come back from the server.
                    s2.refresh();
                }
                Err(e) => {
                    logging::error!("save failed for screenplay {}: {}", snap.id, e);
                    s2.set_status_reverting(SaveStatus::Failed, STATUS_FAILED_MS);

                    if !s2.handle_unauthorized(&e) && !silent {
                        s2.app_state
                            .0
                            .error
                            .set(Some(format!("Failed to save screenplay: {}", e)));
                    }
                }
            }
        });
    }

    /// Explicit user save: bypasses the debounce window, leaves any armed
    /// timer alone, and is allowed to surface failure.
    pub fn save_now(&self) {
        let snap = self
            .app_state
            .0
            .session
            .with_untracked(|s| s.manual_snapshot());

        match snap {
            Some(snap) => {
                self.app_state.0.error.set(None);
                self.flush(snap, false);
            }
            None => {
                self.app_state
                    .0
                    .error
                    .set(Some("No screenplay selected to save.".to_string()));
            }
        }
    }

    /* ========================================================== */
    /*                    REGISTRY OPERATIONS                     */
    /* ========================================================== */

    /// Fetch the full list and reconcile the selection. The reconciliation
    /// runs against the selection as it stands when the response arrives, so
    /// a slow fetch can never clobber a newer selection's buffer.
    pub fn refresh(&self) {
        let api_client = self.app_state.0.api_client.get_untracked();
        let s2 = self.clone();
        spawn_local(async move {
            match api_client.list_screenplays().await {
                Ok(list) => {
                    let cmd = s2
                        .app_state
                        .0
                        .session
                        .try_update(|s| s.apply_fetch(list))
                        .flatten();
                    if let Some(cmd) = cmd {
                        s2.run(vec![cmd]);
                    }
                }
                Err(e) => {
                    logging::error!("screenplay list fetch failed: {}", e);
                    if !s2.handle_unauthorized(&e) {
                        s2.app_state
                            .0
                            .error
                            .set(Some(format!("Failed to load screenplays: {}", e)));
                    }
                }
            }
        });
    }

    pub fn select(&self, doc: &Screenplay) {
        let cmds = self
            .app_state
            .0
            .session
            .try_update(|s| s.select(doc))
            .unwrap_or_default();

        if !cmds.is_empty() {
            // Status belongs to the previous document's pipeline.
            self.set_status(SaveStatus::Idle);
        }
        self.run(cmds);
    }

    /// Create a new screenplay with server-side defaults. The current buffer
    /// is flushed first so switching focus loses nothing; the flush happens
    /// before the create so the two writes cannot reorder.
    pub fn create(&self) {
        let cmds = self
            .app_state
            .0
            .session
            .try_update(|s| s.prepare_create())
            .unwrap_or_default();

        let mut flush_snap = None;
        for cmd in cmds {
            match cmd {
                Command::CancelTimer => self.clear_autosave_timer(),
                Command::Flush(snap) => flush_snap = Some(snap),
                Command::ArmTimer => {}
            }
        }

        let api_client = self.app_state.0.api_client.get_untracked();
        let s2 = self.clone();
        spawn_local(async move {
            if let Some(snap) = flush_snap {
                if let Err(e) = api_client
                    .update_screenplay(snap.id, &snap.title, &snap.content)
                    .await
                {
                    logging::error!("pre-create flush failed for screenplay {}: {}", snap.id, e);
                    if s2.handle_unauthorized(&e) {
                        return;
                    }
                    // Other flush failures don't block creation.
                }
            }

            match api_client.create_screenplay(None, None).await {
                Ok(doc) => {
                    s2.app_state.0.error.set(None);
                    s2.app_state.0.session.update(|s| s.apply_created(doc));
                }
                Err(e) => {
                    logging::error!("create failed: {}", e);
                    if !s2.handle_unauthorized(&e) {
                        s2.app_state
                            .0
                            .error
                            .set(Some(format!("Failed to create screenplay: {}", e)));
                    }
                }
            }
        });
    }

    /// Delete by id. On success the registry is re-fetched rather than
    /// locally patched, which also re-establishes a consistent selection.
    pub fn remove(&self, id: i64) {
        let cmd = self.app_state.0.session.try_update(|s| s.prepare_remove());
        if let Some(cmd) = cmd {
            self.run(vec![cmd]);
        }

        let api_client = self.app_state.0.api_client.get_untracked();
        let s2 = self.clone();
        spawn_local(async move {
            match api_client.delete_screenplay(id).await {
                Ok(()) => {
                    s2.app_state.0.error.set(None);
                    s2.refresh();
                }
                Err(e) => {
                    logging::error!("delete failed for screenplay {}: {}", id, e);
                    if !s2.handle_unauthorized(&e) {
                        s2.app_state
                            .0
                            .error
                            .set(Some(format!("Failed to delete screenplay: {}", e)));
                        if e.kind == ApiErrorKind::NotFound {
                            // Deleted elsewhere; resync the cache.
                            s2.refresh();
                        }
                    }
                }
            }
        });
    }

    /// Export the selected screenplay as a PDF download. Id and title are
    /// captured before the request leaves.
    pub fn export_pdf(&self) {
        let snap = self
            .app_state
            .0
            .session
            .with_untracked(|s| s.manual_snapshot());

        let Some(snap) = snap else {
            self.app_state
                .0
                .error
                .set(Some("No screenplay selected to export.".to_string()));
            return;
        };

        let filename = util::pdf_download_name(&snap.title);
        let api_client = self.app_state.0.api_client.get_untracked();
        let s2 = self.clone();
        spawn_local(async move {
            match api_client.export_pdf(snap.id).await {
                Ok(bytes) => {
                    s2.app_state.0.error.set(None);
                    util::trigger_file_download(&bytes, &filename);
                }
                Err(e) => {
                    logging::error!("pdf export failed for screenplay {}: {}", snap.id, e);
                    if !s2.handle_unauthorized(&e) {
                        s2.app_state
                            .0
                            .error
                            .set(Some(format!("Failed to export PDF: {}", e)));
                    }
                }
            }
        });
    }

    /* ========================================================== */
    /*                     SESSION LIFECYCLE                      */
    /* ========================================================== */

    /// Editor view unmounted: nothing may fire afterwards.
    pub fn cancel_timers(&self) {
        self.clear_autosave_timer();
        self.clear_status_timer();
        self.app_state.0.session.update(|s| s.cancel_pending());
    }

    /// Explicit logout: tear down timers, token, registry, buffer.
    pub fn logout(&self) {
        self.clear_autosave_timer();
        self.clear_status_timer();

        let mut client = self.app_state.0.api_client.get_untracked();
        client.logout();
        self.app_state.0.api_client.set(client);

        self.app_state.0.current_user.set(None);
        self.app_state.0.session.update(|s| {
            s.clear();
        });
        self.app_state.0.save_status.set(SaveStatus::Idle);
        self.app_state.0.error.set(None);
    }

    /// Token rejected mid-session: same teardown, plus a visible notice.
    /// Unsent edits are intentionally discarded; the last successful
    /// autosave is the recovery point.
    pub fn force_logout(&self, notice: &str) {
        self.logout();
        self.app_state.0.notice.set(Some(notice.to_string()));
    }

    /// Route any authenticated call's failure through the forced-logout
    /// path when the token is no longer valid. Returns true when handled.
    fn handle_unauthorized(&self, e: &ApiError) -> bool {
        if e.kind == ApiErrorKind::Unauthorized {
            self.force_logout(SESSION_EXPIRED_NOTICE);
            true
        } else {
            false
        }
    }
}

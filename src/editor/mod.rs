//! Editing-session core.
//!
//! Pure state machine for the list of screenplays, the current selection and
//! the in-progress edit buffer. Mutations return [`Command`]s describing the
//! side effects the reactive shell must perform (arm/cancel the autosave
//! timer, fire a silent flush). Nothing in here touches the DOM, timers or
//! the network, so every ordering rule is unit-testable natively.
//!
//! Responsibilities:
//! - registry cache + selection reconciliation after each list fetch
//! - edit buffer ownership (detached from the cached rows)
//! - debounce bookkeeping: which selection a pending flush was armed for
//!
//! Non-responsibilities:
//! - real timers, network calls, storage (see `state::session`)

use crate::models::Screenplay;

/// The title/content pair currently being typed. Detached from the registry
/// row it was loaded from; a save round-trip is what reconciles the two.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct EditBuffer {
    pub title: String,
    pub content: String,
}

/// Everything a save needs, captured by value at initiation time. Response
/// handling never re-reads live selection state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SaveSnapshot {
    pub id: i64,
    pub title: String,
    pub content: String,
}

/// Side effects requested by a state transition.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Command {
    /// Cancel any pending debounce timer and arm a fresh one.
    ArmTimer,
    CancelTimer,
    /// Fire-and-forget silent save of the captured snapshot.
    Flush(SaveSnapshot),
}

#[derive(Clone, Debug, Default)]
pub(crate) struct EditorSession {
    screenplays: Vec<Screenplay>,
    selected_id: Option<i64>,
    buffer: EditBuffer,

    /// Selection captured when the debounce window was armed. A timer fire
    /// flushes to this id with whatever the buffer holds at fire time.
    armed_for: Option<i64>,
}

impl EditorSession {
    pub fn screenplays(&self) -> &[Screenplay] {
        &self.screenplays
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected_id
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn has_pending_autosave(&self) -> bool {
        self.armed_for.is_some()
    }

    fn snapshot_for(&self, id: i64) -> SaveSnapshot {
        SaveSnapshot {
            id,
            title: self.buffer.title.clone(),
            content: self.buffer.content.clone(),
        }
    }

    fn load_buffer_from(&mut self, doc: &Screenplay) {
        self.buffer = EditBuffer {
            title: doc.title.clone(),
            content: doc.content.clone(),
        };
    }

    /// Keystroke on the title field.
    pub fn edit_title(&mut self, value: &str) -> Option<Command> {
        self.buffer.title = value.to_string();
        self.arm()
    }

    /// Keystroke on the content field.
    pub fn edit_content(&mut self, value: &str) -> Option<Command> {
        self.buffer.content = value.to_string();
        self.arm()
    }

    fn arm(&mut self) -> Option<Command> {
        // Debounce only runs while something is selected; arming (or
        // re-arming) supersedes any prior window.
        let id = self.selected_id?;
        self.armed_for = Some(id);
        Some(Command::ArmTimer)
    }

    /// The debounce timer expired. Returns the snapshot to flush: the
    /// selection captured at arm time, buffer values read now.
    pub fn timer_fired(&mut self) -> Option<SaveSnapshot> {
        let id = self.armed_for.take()?;
        Some(self.snapshot_for(id))
    }

    /// Forget any armed debounce window (the shell clears the real timer).
    pub fn cancel_pending(&mut self) {
        self.armed_for = None;
    }

    /// Snapshot for a manual save: current selection + current buffer. Does
    /// not disturb a separately armed debounce window.
    pub fn manual_snapshot(&self) -> Option<SaveSnapshot> {
        self.selected_id.map(|id| self.snapshot_for(id))
    }

    /// Switch the selection to `doc`.
    ///
    /// No-op when `doc` is already selected. Otherwise the pending timer is
    /// cancelled and the previous document's buffer is flushed silently to
    /// the previous id before the buffer is replaced with `doc`'s fields.
    pub fn select(&mut self, doc: &Screenplay) -> Vec<Command> {
        if self.selected_id == Some(doc.id) {
            return vec![];
        }

        let mut cmds = vec![Command::CancelTimer];
        self.armed_for = None;

        if let Some(prev) = self.selected_id {
            cmds.push(Command::Flush(self.snapshot_for(prev)));
        }

        self.selected_id = Some(doc.id);
        self.load_buffer_from(doc);
        cmds
    }

    /// About to create a new document: cancel the pending timer and flush
    /// the current buffer (if anything is selected) so no edits are lost.
    pub fn prepare_create(&mut self) -> Vec<Command> {
        self.armed_for = None;
        let mut cmds = vec![Command::CancelTimer];
        if let Some(prev) = self.selected_id {
            cmds.push(Command::Flush(self.snapshot_for(prev)));
        }
        cmds
    }

    /// The server created a document: prepend (deduplicating by id), select
    /// it and load its fields into the buffer.
    pub fn apply_created(&mut self, doc: Screenplay) {
        self.screenplays.retain(|sp| sp.id != doc.id);
        self.screenplays.insert(0, doc.clone());
        self.selected_id = Some(doc.id);
        self.load_buffer_from(&doc);
        self.armed_for = None;
    }

    /// About to delete: a pending flush must not race the removal.
    pub fn prepare_remove(&mut self) -> Command {
        self.armed_for = None;
        Command::CancelTimer
    }

    /// Replace the cached list wholesale and reconcile the selection.
    ///
    /// Same identity still present: keep it selected and mirror the server's
    /// title/content into the buffer (post-save reconciliation). Identity
    /// gone: fall back to the first entry, or to nothing when the list is
    /// empty — either way the armed window is void, so `CancelTimer` is
    /// returned for the shell to honor.
    pub fn apply_fetch(&mut self, list: Vec<Screenplay>) -> Option<Command> {
        self.screenplays = list;

        if let Some(id) = self.selected_id {
            if let Some(doc) = self.screenplays.iter().find(|sp| sp.id == id).cloned() {
                self.load_buffer_from(&doc);
                return None;
            }

            // Previously selected row vanished (deleted elsewhere).
            self.armed_for = None;
            if let Some(first) = self.screenplays.first().cloned() {
                self.selected_id = Some(first.id);
                self.load_buffer_from(&first);
            } else {
                self.selected_id = None;
                self.buffer = EditBuffer::default();
            }
            return Some(Command::CancelTimer);
        }

        if let Some(first) = self.screenplays.first().cloned() {
            self.selected_id = Some(first.id);
            self.load_buffer_from(&first);
        }
        None
    }

    /// Logout / session teardown.
    pub fn clear(&mut self) -> Command {
        self.screenplays.clear();
        self.selected_id = None;
        self.buffer = EditBuffer::default();
        self.armed_for = None;
        Command::CancelTimer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: i64, title: &str, content: &str, updated_at: &str) -> Screenplay {
        Screenplay {
            id,
            user_id: Some(1),
            title: title.to_string(),
            content: content.to_string(),
            created_at: String::new(),
            updated_at: updated_at.to_string(),
        }
    }

    fn session_with(a: &Screenplay, rest: &[Screenplay]) -> EditorSession {
        let mut s = EditorSession::default();
        let mut list = vec![a.clone()];
        list.extend(rest.iter().cloned());
        s.apply_fetch(list);
        s
    }

    #[test]
    fn test_edits_within_window_yield_one_flush_with_last_values() {
        let a = doc(1, "A", "old", "t1");
        let mut s = session_with(&a, &[]);

        assert_eq!(s.edit_content("x"), Some(Command::ArmTimer));
        assert_eq!(s.edit_content("xy"), Some(Command::ArmTimer));
        assert_eq!(s.edit_title("A2"), Some(Command::ArmTimer));

        let snap = s.timer_fired().expect("armed window should flush");
        assert_eq!(snap.id, 1);
        assert_eq!(snap.title, "A2");
        assert_eq!(snap.content, "xy");

        // The window is consumed; nothing further to flush.
        assert!(s.timer_fired().is_none());
        assert!(!s.has_pending_autosave());
    }

    #[test]
    fn test_edit_without_selection_does_not_arm() {
        let mut s = EditorSession::default();
        assert!(s.edit_content("orphan").is_none());
        assert!(!s.has_pending_autosave());
        // The buffer itself still tracks the keystroke.
        assert_eq!(s.buffer().content, "orphan");
    }

    #[test]
    fn test_switch_flushes_previous_document_to_previous_id() {
        let a = doc(1, "A", "alpha", "t1");
        let b = doc(2, "B", "beta", "t2");
        let mut s = session_with(&a, &[b.clone()]);

        s.edit_content("alpha edited");
        let cmds = s.select(&b);

        assert_eq!(
            cmds,
            vec![
                Command::CancelTimer,
                Command::Flush(SaveSnapshot {
                    id: 1,
                    title: "A".to_string(),
                    content: "alpha edited".to_string(),
                }),
            ]
        );

        // B is now selected with B's original fields, and the old window is gone.
        assert_eq!(s.selected_id(), Some(2));
        assert_eq!(s.buffer().title, "B");
        assert_eq!(s.buffer().content, "beta");
        assert!(s.timer_fired().is_none());
    }

    #[test]
    fn test_select_current_document_is_a_noop() {
        let a = doc(1, "A", "alpha", "t1");
        let mut s = session_with(&a, &[]);
        s.edit_content("typed");

        let cmds = s.select(&a);
        assert!(cmds.is_empty());
        // Buffer and pending window untouched.
        assert_eq!(s.buffer().content, "typed");
        assert!(s.has_pending_autosave());
    }

    #[test]
    fn test_prepare_create_flushes_current_selection() {
        let a = doc(1, "A", "alpha", "t1");
        let mut s = session_with(&a, &[]);
        s.edit_content("unsent");

        let cmds = s.prepare_create();
        assert_eq!(cmds[0], Command::CancelTimer);
        assert_eq!(
            cmds[1],
            Command::Flush(SaveSnapshot {
                id: 1,
                title: "A".to_string(),
                content: "unsent".to_string(),
            })
        );
        assert!(!s.has_pending_autosave());
    }

    #[test]
    fn test_create_from_empty_registry() {
        let mut s = EditorSession::default();
        s.apply_fetch(vec![]);

        // Nothing selected, so nothing to flush.
        assert_eq!(s.prepare_create(), vec![Command::CancelTimer]);

        s.apply_created(doc(5, "New Screenplay", "", "t1"));
        assert_eq!(s.screenplays().len(), 1);
        assert_eq!(s.selected_id(), Some(5));
        assert_eq!(s.buffer().title, "New Screenplay");
        assert_eq!(s.buffer().content, "");
    }

    #[test]
    fn test_apply_created_prepends_exactly_once() {
        let a = doc(1, "A", "alpha", "t1");
        let mut s = session_with(&a, &[]);

        let fresh = doc(9, "New Screenplay", "", "t2");
        s.apply_created(fresh.clone());
        s.apply_created(fresh);

        assert_eq!(s.screenplays().len(), 2);
        assert_eq!(s.screenplays()[0].id, 9);
        assert_eq!(s.screenplays().iter().filter(|sp| sp.id == 9).count(), 1);
        assert_eq!(s.selected_id(), Some(9));
    }

    #[test]
    fn test_fetch_keeps_selection_and_mirrors_server_fields() {
        let a = doc(1, "A", "alpha", "t1");
        let b = doc(2, "B", "beta", "t2");
        let mut s = session_with(&a, &[b.clone()]);
        s.edit_content("typed");

        // Post-save refresh: server reordered by recency and echoed the save.
        let a_saved = doc(1, "A", "typed", "t3");
        let cmd = s.apply_fetch(vec![a_saved.clone(), b]);

        assert!(cmd.is_none());
        assert_eq!(s.selected_id(), Some(1));
        assert_eq!(s.buffer().content, "typed");
        assert_eq!(s.screenplays()[0].id, 1);
        // Identity unchanged: any pending window stays armed.
        assert!(s.has_pending_autosave());
    }

    #[test]
    fn test_fetch_falls_back_to_first_when_selection_vanished() {
        let a = doc(1, "A", "alpha", "t1");
        let b = doc(2, "B", "beta", "t2");
        let mut s = session_with(&a, &[b.clone()]);
        s.edit_content("doomed edit");

        let cmd = s.apply_fetch(vec![b]);

        assert_eq!(cmd, Some(Command::CancelTimer));
        assert_eq!(s.selected_id(), Some(2));
        assert_eq!(s.buffer().title, "B");
        assert_eq!(s.buffer().content, "beta");
        assert!(!s.has_pending_autosave());
    }

    #[test]
    fn test_fetch_empty_clears_selection_and_buffer() {
        let a = doc(1, "A", "alpha", "t1");
        let mut s = session_with(&a, &[]);
        s.edit_content("typed");

        let cmd = s.apply_fetch(vec![]);

        assert_eq!(cmd, Some(Command::CancelTimer));
        assert!(s.selected_id().is_none());
        assert_eq!(s.buffer(), &EditBuffer::default());
    }

    #[test]
    fn test_first_fetch_selects_most_recent() {
        let mut s = EditorSession::default();
        let cmd = s.apply_fetch(vec![doc(2, "B", "beta", "t2"), doc(1, "A", "alpha", "t1")]);

        assert!(cmd.is_none());
        assert_eq!(s.selected_id(), Some(2));
        assert_eq!(s.buffer().title, "B");
    }

    #[test]
    fn test_manual_snapshot_leaves_debounce_window_alone() {
        let a = doc(1, "A", "alpha", "t1");
        let mut s = session_with(&a, &[]);
        s.edit_content("typed");

        let snap = s.manual_snapshot().expect("selection exists");
        assert_eq!(snap.id, 1);
        assert_eq!(snap.content, "typed");
        assert!(s.has_pending_autosave());
    }

    #[test]
    fn test_manual_snapshot_without_selection() {
        let s = EditorSession::default();
        assert!(s.manual_snapshot().is_none());
    }

    #[test]
    fn test_prepare_remove_voids_pending_window() {
        let a = doc(1, "A", "alpha", "t1");
        let mut s = session_with(&a, &[]);
        s.edit_content("typed");

        assert_eq!(s.prepare_remove(), Command::CancelTimer);
        assert!(s.timer_fired().is_none());
    }

    #[test]
    fn test_clear_resets_everything() {
        let a = doc(1, "A", "alpha", "t1");
        let mut s = session_with(&a, &[]);
        s.edit_content("typed");

        assert_eq!(s.clear(), Command::CancelTimer);
        assert!(s.screenplays().is_empty());
        assert!(s.selected_id().is_none());
        assert_eq!(s.buffer(), &EditBuffer::default());
        assert!(!s.has_pending_autosave());
    }
}

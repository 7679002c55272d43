//! Picks the notes service or the local cache as source of truth, per
//! operation.
//!
//! Any store failure moves the session to `Offline` and the operation is
//! completed against the cache instead. The in-memory list and the cache
//! are always written together. The next successful store call moves the
//! session back to `Online`; connectivity signals alone never do.

use crate::backend::NoteBackend;
use crate::cache::LocalCache;
use crate::error::SyncError;
use crate::state::{ClientState, Connectivity, LoadTicket, Notice};
use chrono::{SecondsFormat, Utc};
use notes_types::{CreateNoteRequest, Note, NoteId};

pub struct SyncController<B: NoteBackend> {
    backend: B,
    cache: LocalCache,
}

impl<B: NoteBackend> SyncController<B> {
    pub fn new(backend: B, cache: LocalCache) -> Self {
        Self { backend, cache }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Fresh session state with the persisted theme applied
    pub fn restore_session(&self) -> ClientState {
        ClientState::new(self.cache.load_theme())
    }

    /// Refresh the note list from the store, or from the cache if the
    /// store is unavailable.
    pub async fn load_notes(&self, state: &mut ClientState) {
        let ticket = state.begin_load();
        let result = self.fetch_notes().await;
        self.apply_load(state, ticket, result);
    }

    /// The network half of a load, for callers that issue loads
    /// concurrently and apply them later with [`apply_load`](Self::apply_load).
    pub async fn fetch_notes(&self) -> Result<Vec<Note>, SyncError> {
        self.backend.list_notes().await
    }

    /// Apply a load result. Returns `false` when a newer load has been
    /// started since `ticket` was issued; the result is then discarded.
    pub fn apply_load(
        &self,
        state: &mut ClientState,
        ticket: LoadTicket,
        result: Result<Vec<Note>, SyncError>,
    ) -> bool {
        if !state.is_current(ticket) {
            log::debug!("[SYNC] Discarding stale load response");
            return false;
        }

        match result {
            Ok(notes) => {
                state.connectivity = Connectivity::Online;
                state.notes = notes;
                self.cache.save_notes(&state.notes);
            }
            Err(e) => {
                log::warn!("[SYNC] Load failed, using local cache: {}", e);
                state.connectivity = Connectivity::Offline;
                state.notes = self.cache.load_notes();
                state.notice = Some(Notice::ShowingCached);
            }
        }

        // Selection must point into the list just applied
        if let Some(id) = state.editor.selected {
            if !state.notes.iter().any(|n| n.id == id) {
                state.editor.selected = None;
            }
        }
        true
    }

    /// Save the edit buffer as a new note. Empty content is rejected
    /// before any network call.
    pub async fn save_note(&self, state: &mut ClientState) {
        if state.editor.markdown.trim().is_empty() {
            state.notice = Some(Notice::EmptyNote);
            return;
        }

        let req = CreateNoteRequest::new(state.editor.markdown.clone(), state.editor.tag.clone());

        match self.backend.create_note(&req).await {
            Ok(created) => {
                state.connectivity = Connectivity::Online;
                self.load_notes(state).await;
                // Reload fell back to the cache: keep the confirmed note visible
                if !state.notes.iter().any(|n| n.id == created.id) {
                    state.notes.push(created);
                    self.cache.save_notes(&state.notes);
                }
                state.notice = Some(Notice::Saved);
            }
            Err(e) => {
                log::warn!("[SYNC] Save failed, storing note offline: {}", e);
                state.connectivity = Connectivity::Offline;

                let now = Utc::now();
                let note = Note {
                    id: state.next_local_id(now.timestamp_millis().max(0) as u64),
                    markdown: req.markdown,
                    tag: req.tag,
                    timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
                };
                state.notes.push(note.clone());
                state.pending.push(note);
                self.cache.save_notes(&state.notes);
                state.notice = Some(Notice::SavedOffline);
            }
        }
    }

    /// Delete a note. When the store cannot be reached the note is removed
    /// locally instead, so the action never fails from the user's view.
    pub async fn delete_note(&self, state: &mut ClientState, id: NoteId) {
        match self.backend.delete_note(id).await {
            Ok(()) => {
                state.connectivity = Connectivity::Online;
                state.forget_note(id);
                self.load_notes(state).await;
                if state.is_offline() {
                    // Cached copy still lists it
                    state.forget_note(id);
                    self.cache.save_notes(&state.notes);
                }
                state.notice = Some(Notice::Deleted);
            }
            Err(e) => {
                log::warn!("[SYNC] Delete of {} failed, removing locally: {}", id, e);
                state.connectivity = Connectivity::Offline;
                state.forget_note(id);
                self.cache.save_notes(&state.notes);
                state.notice = Some(Notice::DeletedOffline);
            }
        }
    }

    /// Push notes created offline this session to the store, keeping their
    /// local ids and timestamps. Stops at the first failure; whatever was
    /// not pushed stays pending. Returns how many notes were pushed.
    pub async fn sync_pending(&self, state: &mut ClientState) -> usize {
        let mut pushed = 0;

        while let Some(note) = state.pending.first().cloned() {
            match self.backend.create_note(&CreateNoteRequest::from(&note)).await {
                Ok(_) => {
                    state.connectivity = Connectivity::Online;
                    state.pending.remove(0);
                    pushed += 1;
                }
                Err(e) => {
                    log::warn!("[SYNC] Pushing offline note {} failed: {}", note.id, e);
                    state.connectivity = Connectivity::Offline;
                    break;
                }
            }
        }

        if pushed > 0 {
            log::info!("[SYNC] Pushed {} offline note(s)", pushed);
            if !state.is_offline() {
                self.load_notes(state).await;
            }
            state.notice = Some(Notice::Synced(pushed));
        }

        pushed
    }

    /// Flip the theme and remember it. A failed write keeps the new theme
    /// for this session.
    pub fn toggle_theme(&self, state: &mut ClientState) {
        state.theme = state.theme.toggled();
        self.cache.save_theme(state.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DEFAULT_TEMPLATE, Editor};
    use crate::theme::Theme;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use tempfile::tempdir;

    /// In-process stand-in for the notes service that can be switched off
    #[derive(Default)]
    struct FakeBackend {
        notes: Mutex<Vec<Note>>,
        down: AtomicBool,
        next_id: AtomicU64,
        calls: AtomicU64,
    }

    impl FakeBackend {
        fn set_down(&self, down: bool) {
            self.down.store(down, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), SyncError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.down.load(Ordering::SeqCst) {
                Err(SyncError::Unreachable("connection refused".to_string()))
            } else {
                Ok(())
            }
        }

        fn stored(&self) -> Vec<Note> {
            self.notes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NoteBackend for FakeBackend {
        async fn list_notes(&self) -> Result<Vec<Note>, SyncError> {
            self.check()?;
            Ok(self.stored())
        }

        async fn create_note(&self, req: &CreateNoteRequest) -> Result<Note, SyncError> {
            self.check()?;
            let id = req
                .id
                .unwrap_or_else(|| NoteId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1));
            let note = Note {
                id,
                markdown: req.markdown.clone(),
                tag: req.tag.clone(),
                timestamp: req
                    .timestamp
                    .clone()
                    .unwrap_or_else(|| "2024-01-01T00:00:00.000Z".to_string()),
            };
            self.notes.lock().unwrap().push(note.clone());
            Ok(note)
        }

        async fn delete_note(&self, id: NoteId) -> Result<(), SyncError> {
            self.check()?;
            let mut notes = self.notes.lock().unwrap();
            if let Some(idx) = notes.iter().position(|n| n.id == id) {
                notes.remove(idx);
            }
            Ok(())
        }
    }

    fn controller(dir: &std::path::Path) -> SyncController<FakeBackend> {
        SyncController::new(FakeBackend::default(), LocalCache::new(dir))
    }

    fn edit(state: &mut ClientState, markdown: &str, tag: &str) {
        state.editor.markdown = markdown.to_string();
        state.editor.tag = tag.to_string();
    }

    #[tokio::test]
    async fn test_empty_first_load() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        let mut state = ctl.restore_session();

        ctl.load_notes(&mut state).await;

        assert!(state.notes.is_empty());
        assert_eq!(state.connectivity, Connectivity::Online);
        assert_eq!(state.editor.markdown, DEFAULT_TEMPLATE);
        assert_eq!(state.notice, None);
    }

    #[tokio::test]
    async fn test_online_save_reloads_and_caches() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        let mut state = ctl.restore_session();

        edit(&mut state, "# Plan", "work");
        ctl.save_note(&mut state).await;

        assert_eq!(state.notice, Some(Notice::Saved));
        assert_eq!(state.notes, ctl.backend().stored());
        assert_eq!(state.notes.len(), 1);
        assert_eq!(ctl.cache().load_notes(), state.notes);
        assert!(state.pending.is_empty());
    }

    #[tokio::test]
    async fn test_empty_save_is_rejected_without_network() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        let mut state = ctl.restore_session();

        edit(&mut state, "   \n", "tag");
        ctl.save_note(&mut state).await;

        assert_eq!(state.notice, Some(Notice::EmptyNote));
        assert_eq!(ctl.backend().calls.load(Ordering::SeqCst), 0);
        assert!(state.notes.is_empty());
    }

    #[tokio::test]
    async fn test_offline_save_lands_in_list_and_cache() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        ctl.backend().set_down(true);
        let mut state = ctl.restore_session();

        edit(&mut state, "# Draft", "wip");
        ctl.save_note(&mut state).await;

        assert!(state.is_offline());
        assert_eq!(state.notice, Some(Notice::SavedOffline));
        assert_eq!(state.notes.len(), 1);
        let note = &state.notes[0];
        assert_eq!(note.markdown, "# Draft");
        assert_eq!(note.tag.as_deref(), Some("wip"));
        assert!(note.id.0 > 0);
        assert_eq!(ctl.cache().load_notes(), state.notes);
        assert_eq!(state.pending, state.notes);
    }

    #[tokio::test]
    async fn test_two_offline_saves_get_distinct_ids() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        ctl.backend().set_down(true);
        let mut state = ctl.restore_session();

        edit(&mut state, "one", "");
        ctl.save_note(&mut state).await;
        edit(&mut state, "two", "");
        ctl.save_note(&mut state).await;

        assert_eq!(state.notes.len(), 2);
        assert_ne!(state.notes[0].id, state.notes[1].id);
    }

    #[tokio::test]
    async fn test_failed_load_falls_back_to_cache() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        let mut state = ctl.restore_session();

        edit(&mut state, "cached", "c");
        ctl.save_note(&mut state).await;
        let known = state.notes.clone();

        ctl.backend().set_down(true);
        let mut next_session = ctl.restore_session();
        ctl.load_notes(&mut next_session).await;

        assert!(next_session.is_offline());
        assert_eq!(next_session.notice, Some(Notice::ShowingCached));
        assert_eq!(next_session.notes, known);
    }

    #[tokio::test]
    async fn test_successful_load_overwrites_cache() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        ctl.backend().set_down(true);
        let mut state = ctl.restore_session();
        edit(&mut state, "offline only", "");
        ctl.save_note(&mut state).await;

        ctl.backend().set_down(false);
        ctl.load_notes(&mut state).await;

        assert_eq!(state.connectivity, Connectivity::Online);
        assert!(state.notes.is_empty());
        assert!(ctl.cache().load_notes().is_empty());
        // Still queued for an explicit push
        assert_eq!(state.pending.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_online() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        let mut state = ctl.restore_session();
        edit(&mut state, "doomed", "");
        ctl.save_note(&mut state).await;
        let id = state.notes[0].id;
        state.select_note(id);

        ctl.delete_note(&mut state, id).await;
        // Second delete of the same id is harmless
        ctl.delete_note(&mut state, id).await;

        assert_eq!(state.notice, Some(Notice::Deleted));
        assert!(state.notes.is_empty());
        assert!(ctl.backend().stored().is_empty());
        assert_eq!(state.editor, Editor::default());
    }

    #[tokio::test]
    async fn test_delete_offline_removes_locally() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        let mut state = ctl.restore_session();
        edit(&mut state, "keep", "");
        ctl.save_note(&mut state).await;
        edit(&mut state, "drop", "");
        ctl.save_note(&mut state).await;
        let drop_id = state.notes[1].id;
        state.select_note(drop_id);

        ctl.backend().set_down(true);
        ctl.delete_note(&mut state, drop_id).await;

        assert!(state.is_offline());
        assert_eq!(state.notice, Some(Notice::DeletedOffline));
        assert_eq!(state.notes.len(), 1);
        assert_eq!(state.notes[0].markdown, "keep");
        assert_eq!(ctl.cache().load_notes(), state.notes);
        assert_eq!(state.editor.selected, None);
        assert_eq!(state.editor.markdown, DEFAULT_TEMPLATE);
        // Server copy untouched
        assert_eq!(ctl.backend().stored().len(), 2);
    }

    #[tokio::test]
    async fn test_sync_pending_pushes_offline_notes() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        ctl.backend().set_down(true);
        let mut state = ctl.restore_session();
        edit(&mut state, "# Draft", "wip");
        ctl.save_note(&mut state).await;
        let draft = state.notes[0].clone();

        // Still down: nothing pushed, nothing lost
        assert_eq!(ctl.sync_pending(&mut state).await, 0);
        assert_eq!(state.pending.len(), 1);

        ctl.backend().set_down(false);
        state.set_network_hint(true);
        assert_eq!(ctl.sync_pending(&mut state).await, 1);

        assert!(state.pending.is_empty());
        assert_eq!(state.connectivity, Connectivity::Online);
        assert_eq!(state.notice, Some(Notice::Synced(1)));
        assert_eq!(ctl.backend().stored(), vec![draft.clone()]);
        assert_eq!(state.notes, vec![draft]);
    }

    #[tokio::test]
    async fn test_network_hint_does_not_sync() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        ctl.backend().set_down(true);
        let mut state = ctl.restore_session();
        edit(&mut state, "x", "");
        ctl.save_note(&mut state).await;

        ctl.backend().set_down(false);
        state.set_network_hint(true);

        assert_eq!(state.indicator(), Connectivity::Online);
        assert!(state.is_offline());
        assert!(ctl.backend().stored().is_empty());
    }

    #[tokio::test]
    async fn test_stale_load_is_discarded() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        let mut state = ctl.restore_session();

        let stale = state.begin_load();
        let fresh = state.begin_load();

        let fresh_notes = vec![Note {
            id: NoteId(2),
            markdown: "fresh".to_string(),
            tag: None,
            timestamp: String::new(),
        }];
        assert!(ctl.apply_load(&mut state, fresh, Ok(fresh_notes.clone())));

        let stale_result = Err(SyncError::Unreachable("late".to_string()));
        assert!(!ctl.apply_load(&mut state, stale, stale_result));

        assert_eq!(state.notes, fresh_notes);
        assert_eq!(state.connectivity, Connectivity::Online);
    }

    #[tokio::test]
    async fn test_cache_fallback_clears_missing_selection() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        let mut state = ctl.restore_session();
        edit(&mut state, "# Picked", "");
        ctl.save_note(&mut state).await;
        let id = state.notes[0].id;
        assert!(state.select_note(id));

        ctl.cache().clear_notes();
        ctl.backend().set_down(true);
        ctl.load_notes(&mut state).await;

        assert!(state.is_offline());
        assert!(state.notes.is_empty());
        assert_eq!(state.editor.selected, None);
        // Buffer contents are kept
        assert_eq!(state.editor.markdown, "# Picked");
    }

    #[tokio::test]
    async fn test_cache_fallback_keeps_present_selection() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        let mut state = ctl.restore_session();
        edit(&mut state, "# Kept", "");
        ctl.save_note(&mut state).await;
        let id = state.notes[0].id;
        state.select_note(id);

        ctl.backend().set_down(true);
        ctl.load_notes(&mut state).await;

        assert!(state.is_offline());
        assert_eq!(state.editor.selected, Some(id));
    }

    #[tokio::test]
    async fn test_toggle_theme_persists() {
        let dir = tempdir().unwrap();
        let ctl = controller(dir.path());
        let mut state = ctl.restore_session();
        assert_eq!(state.theme, Theme::Light);

        ctl.toggle_theme(&mut state);
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(ctl.restore_session().theme, Theme::Dark);

        ctl.toggle_theme(&mut state);
        assert_eq!(state.theme, Theme::Light);
        assert_eq!(ctl.restore_session().theme, Theme::Light);
    }

    #[tokio::test]
    async fn test_unwritable_cache_does_not_break_offline_save() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "").unwrap();
        let ctl = SyncController::new(FakeBackend::default(), LocalCache::new(&blocker));
        ctl.backend().set_down(true);
        let mut state = ctl.restore_session();

        edit(&mut state, "still here", "");
        ctl.save_note(&mut state).await;

        assert_eq!(state.notes.len(), 1);
        assert_eq!(state.notice, Some(Notice::SavedOffline));
    }
}

//! NoteStore — process-lifetime, in-memory note list.
//!
//! Notes live in insertion order behind a single mutex, so concurrent
//! handlers never lose each other's writes. Nothing survives a restart.

use chrono::{SecondsFormat, Utc};
use notes_types::{CreateNoteRequest, Note, NoteId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Authoritative note list for the running service
#[derive(Default)]
pub struct NoteStore {
    notes: Mutex<Vec<Note>>,
    created: AtomicU64,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn notes(&self) -> MutexGuard<'_, Vec<Note>> {
        // A panicked writer leaves the Vec itself intact
        self.notes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All notes, oldest first
    pub fn list(&self) -> Vec<Note> {
        self.notes().clone()
    }

    /// First note carrying `id`, if any
    pub fn get(&self, id: NoteId) -> Option<Note> {
        self.notes().iter().find(|n| n.id == id).cloned()
    }

    /// Append a note. Content is stored as given; `id` and `timestamp`
    /// are assigned only when the request leaves them out. Client-supplied
    /// ids are trusted and may duplicate existing ones.
    pub fn create(&self, req: CreateNoteRequest) -> Note {
        let now = Utc::now();
        let mut notes = self.notes();

        let note = Note {
            id: req
                .id
                .unwrap_or_else(|| next_id(&notes, now.timestamp_millis().max(0) as u64)),
            markdown: req.markdown,
            tag: req.tag,
            timestamp: req
                .timestamp
                .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        };

        notes.push(note.clone());
        self.created.fetch_add(1, Ordering::Relaxed);
        log::info!("[NOTES] Created note {} ({} total)", note.id, notes.len());

        note
    }

    /// Remove the first note with `id`. Returns whether anything was removed;
    /// a missing id is not an error.
    pub fn delete(&self, id: NoteId) -> bool {
        let mut notes = self.notes();
        match notes.iter().position(|n| n.id == id) {
            Some(idx) => {
                notes.remove(idx);
                log::info!("[NOTES] Deleted note {} ({} remaining)", id, notes.len());
                true
            }
            None => {
                log::debug!("[NOTES] Delete of unknown note {} ignored", id);
                false
            }
        }
    }

    pub fn count(&self) -> usize {
        self.notes().len()
    }

    /// Notes created since startup, including ones deleted since
    pub fn total_created(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }
}

/// Current time in milliseconds, bumped past the highest stored id so
/// back-to-back creates within one millisecond still differ. A stored
/// `u64::MAX` leaves nothing to bump to, so the clock value is used as is.
fn next_id(notes: &[Note], now_ms: u64) -> NoteId {
    match notes.iter().map(|n| n.id.0).max() {
        Some(h) if h >= now_ms => NoteId(h.checked_add(1).unwrap_or(now_ms)),
        _ => NoteId(now_ms),
    }
}

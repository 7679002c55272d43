//! Client-side application state.
//!
//! Everything the UI would otherwise keep in component fields lives here,
//! so the online/offline transitions can be driven and inspected without
//! a UI. Methods on this type never touch the network or the cache.

use crate::search::filter_notes;
use crate::theme::Theme;
use notes_types::{Note, NoteId};
use std::fmt;

pub const DEFAULT_TEMPLATE: &str = "# Welcome to Notes App\nType your Markdown here...";

/// Result of the most recent store call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connectivity {
    #[default]
    Online,
    Offline,
}

/// Non-blocking, user-visible message produced by the last operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved,
    SavedOffline,
    Deleted,
    DeletedOffline,
    /// A load fell back to the local cache
    ShowingCached,
    EmptyNote,
    Synced(usize),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Saved => write!(f, "Note saved!"),
            Notice::SavedOffline => write!(f, "Note saved offline. It is stored on this device only."),
            Notice::Deleted => write!(f, "Note deleted."),
            Notice::DeletedOffline => write!(f, "Note deleted offline."),
            Notice::ShowingCached => write!(f, "Server unavailable, showing cached notes."),
            Notice::EmptyNote => write!(f, "Please write something before saving."),
            Notice::Synced(n) => write!(f, "Synced {} offline note(s) to the server.", n),
        }
    }
}

/// Edit buffer plus the note it was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    pub markdown: String,
    pub tag: String,
    pub selected: Option<NoteId>,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            markdown: DEFAULT_TEMPLATE.to_string(),
            tag: String::new(),
            selected: None,
        }
    }
}

/// Issued by [`ClientState::begin_load`]; only the newest ticket may apply
/// its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(pub(crate) u64);

#[derive(Debug, Clone, Default)]
pub struct ClientState {
    pub notes: Vec<Note>,
    pub editor: Editor,
    pub connectivity: Connectivity,
    /// Last platform connectivity signal. Drives the indicator only.
    pub network_hint: Option<bool>,
    pub theme: Theme,
    pub search_query: String,
    pub notice: Option<Notice>,
    /// Notes created while offline this session, oldest first
    pub pending: Vec<Note>,
    load_seq: u64,
}

impl ClientState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    pub fn is_offline(&self) -> bool {
        self.connectivity == Connectivity::Offline
    }

    /// What a status indicator should show. A platform signal wins when
    /// one has been seen; otherwise the last store call decides.
    pub fn indicator(&self) -> Connectivity {
        match self.network_hint {
            Some(true) => Connectivity::Online,
            Some(false) => Connectivity::Offline,
            None => self.connectivity,
        }
    }

    /// Record a platform online/offline event. Does not retry or sync.
    pub fn set_network_hint(&mut self, online: bool) {
        self.network_hint = Some(online);
    }

    /// Load a note into the edit buffer. Unknown ids leave the editor alone.
    pub fn select_note(&mut self, id: NoteId) -> bool {
        match self.notes.iter().find(|n| n.id == id) {
            Some(note) => {
                self.editor = Editor {
                    markdown: note.markdown.clone(),
                    tag: note.tag_str().to_string(),
                    selected: Some(id),
                };
                true
            }
            None => false,
        }
    }

    /// Reset the edit buffer to the template and clear the selection
    pub fn new_note(&mut self) {
        self.editor = Editor::default();
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Notes matching the current search query, in list order
    pub fn visible_notes(&self) -> Vec<&Note> {
        filter_notes(&self.notes, &self.search_query)
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_seq += 1;
        LoadTicket(self.load_seq)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.load_seq
    }

    /// Drop a note from the in-memory list (first match) and the pending
    /// queue, resetting the editor when it was the selected one.
    pub(crate) fn forget_note(&mut self, id: NoteId) {
        if let Some(idx) = self.notes.iter().position(|n| n.id == id) {
            self.notes.remove(idx);
        }
        self.pending.retain(|n| n.id != id);
        if self.editor.selected == Some(id) {
            self.new_note();
        }
    }

    /// Id for a note created without the store: the current time in
    /// milliseconds, bumped past any id already in the local list unless
    /// that id is `u64::MAX`.
    pub(crate) fn next_local_id(&self, now_ms: u64) -> NoteId {
        let highest = self.notes.iter().map(|n| n.id.0).max();
        match highest {
            Some(h) if h >= now_ms => NoteId(h.checked_add(1).unwrap_or(now_ms)),
            _ => NoteId(now_ms),
        }
    }
}

//! Notes client. Keeps a single notes view alive whether or not the
//! notes service answers.
//!
//! Store calls go through a [`NoteBackend`]; every failure degrades to the
//! on-disk [`LocalCache`] instead of surfacing an error. All UI-facing state
//! lives in an explicit [`ClientState`] handed to each controller call.

pub mod backend;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod search;
pub mod state;
pub mod theme;

pub use backend::{HttpNoteBackend, NoteBackend};
pub use cache::LocalCache;
pub use config::ClientConfig;
pub use controller::SyncController;
pub use error::SyncError;
pub use export::{export_notes, ExportFormat};
pub use search::filter_notes;
pub use state::{ClientState, Connectivity, Editor, LoadTicket, Notice, DEFAULT_TEMPLATE};
pub use theme::Theme;

//! Shared types for the notes service and its clients.

use serde::{Deserialize, Serialize};
use std::fmt;

// =====================================================
// Domain Types
// =====================================================

/// Note identifier. Timestamp-derived (Unix milliseconds) when assigned,
/// so uniqueness only holds for a single writer at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub u64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NoteId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// A single markdown note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub markdown: String,
    /// Short label. Absent and empty are both allowed.
    #[serde(default)]
    pub tag: Option<String>,
    /// Creation time, ISO-8601
    pub timestamp: String,
}

impl Note {
    /// Tag as displayed: absent reads as empty.
    pub fn tag_str(&self) -> &str {
        self.tag.as_deref().unwrap_or("")
    }
}

// =====================================================
// RPC Request Types
// =====================================================

/// Body of `POST /notes`. The server fills in `id` and `timestamp`
/// when they are absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NoteId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl CreateNoteRequest {
    pub fn new(markdown: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            tag: Some(tag.into()),
            id: None,
            timestamp: None,
        }
    }
}

impl From<&Note> for CreateNoteRequest {
    /// Re-submits a note that already carries its own id and timestamp.
    fn from(note: &Note) -> Self {
        Self {
            markdown: note.markdown.clone(),
            tag: note.tag.clone(),
            id: Some(note.id),
            timestamp: Some(note.timestamp.clone()),
        }
    }
}

// =====================================================
// RPC Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> RpcResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Service health status
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub total_notes: usize,
    pub total_created: u64,
}

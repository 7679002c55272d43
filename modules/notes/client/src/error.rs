//! Failures talking to the notes service.
//!
//! None of these reach the UI as errors; the controller turns each one
//! into the offline path plus a [`Notice`](crate::state::Notice).

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Connection refused, DNS failure, timeout
    #[error("notes service unreachable: {0}")]
    Unreachable(String),

    #[error("notes service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode notes service response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SyncError::Decode(e.to_string())
        } else {
            SyncError::Unreachable(e.to_string())
        }
    }
}

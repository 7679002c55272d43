//! Typed access to the notes service HTTP API.

use crate::error::SyncError;
use async_trait::async_trait;
use notes_types::{CreateNoteRequest, Note, NoteId};
use std::time::Duration;

/// The store operations the controller relies on. Anything that is not
/// a 2xx answer in time is an `Err`.
#[async_trait]
pub trait NoteBackend: Send + Sync {
    async fn list_notes(&self) -> Result<Vec<Note>, SyncError>;

    async fn create_note(&self, req: &CreateNoteRequest) -> Result<Note, SyncError>;

    async fn delete_note(&self, id: NoteId) -> Result<(), SyncError>;
}

pub struct HttpNoteBackend {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpNoteBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SyncError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl NoteBackend for HttpNoteBackend {
    /// GET /notes
    async fn list_notes(&self) -> Result<Vec<Note>, SyncError> {
        let resp = self
            .client
            .get(format!("{}/notes", self.base_url))
            .timeout(self.timeout)
            .send()
            .await?;

        Ok(ensure_success(resp).await?.json::<Vec<Note>>().await?)
    }

    /// POST /notes
    async fn create_note(&self, req: &CreateNoteRequest) -> Result<Note, SyncError> {
        let resp = self
            .client
            .post(format!("{}/notes", self.base_url))
            .json(req)
            .timeout(self.timeout)
            .send()
            .await?;

        Ok(ensure_success(resp).await?.json::<Note>().await?)
    }

    /// DELETE /notes/:id
    async fn delete_note(&self, id: NoteId) -> Result<(), SyncError> {
        let resp = self
            .client
            .delete(format!("{}/notes/{}", self.base_url, id))
            .timeout(self.timeout)
            .send()
            .await?;

        ensure_success(resp).await?;
        Ok(())
    }
}

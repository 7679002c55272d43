//! Axum route handlers for the notes HTTP API.

use crate::store::NoteStore;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use notes_types::*;
use std::sync::Arc;
use std::time::Instant;

pub struct AppState {
    pub store: NoteStore,
    pub start_time: Instant,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: NoteStore::new(),
            start_time: Instant::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// GET /notes
pub async fn list_notes(State(state): State<Arc<AppState>>) -> Json<Vec<Note>> {
    Json(state.store.list())
}

// POST /notes
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateNoteRequest>,
) -> (StatusCode, Json<Note>) {
    (StatusCode::OK, Json(state.store.create(req)))
}

// GET /notes/:id
pub async fn get_note(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> Response {
    match state.store.get(NoteId(id)) {
        Some(note) => (StatusCode::OK, Json(note)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(RpcResponse::<()>::err(format!("Note not found: {}", id))),
        )
            .into_response(),
    }
}

// DELETE /notes/:id
pub async fn delete_note(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> StatusCode {
    state.store.delete(NoteId(id));
    StatusCode::NO_CONTENT
}

// GET /status
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<ServiceStatus>>) {
    let status = ServiceStatus {
        running: true,
        uptime_secs: state.start_time.elapsed().as_secs(),
        total_notes: state.store.count(),
        total_created: state.store.total_created(),
    };

    (StatusCode::OK, Json(RpcResponse::ok(status)))
}

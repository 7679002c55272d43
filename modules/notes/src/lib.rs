//! Notes Service — in-memory note store behind a small JSON HTTP API.
//!
//! Routes:
//!   GET    /notes       full list, insertion order
//!   POST   /notes       create (id/timestamp assigned when absent)
//!   GET    /notes/:id   single note or 404
//!   DELETE /notes/:id   idempotent delete
//!   GET    /status      service health
//!
//! Ids are numeric. A non-numeric `:id` is rejected by the path extractor
//! with 400 Bad Request on both `GET` and `DELETE`.

pub mod routes;
pub mod store;

pub use routes::AppState;
pub use store::NoteStore;

use std::sync::Arc;

/// Build the application router around an already-constructed state.
/// Cross-origin requests are allowed from anywhere.
pub fn router(state: Arc<AppState>) -> axum::Router {
    let cors = tower_http::cors::CorsLayer::permissive();

    axum::Router::new()
        .route(
            "/notes",
            axum::routing::get(routes::list_notes).post(routes::create_note),
        )
        .route(
            "/notes/:id",
            axum::routing::get(routes::get_note).delete(routes::delete_note),
        )
        .route("/status", axum::routing::get(routes::status))
        .with_state(state)
        .layer(cors)
}

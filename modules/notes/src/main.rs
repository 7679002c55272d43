//! Notes Service binary.
//!
//! Default: http://127.0.0.1:5000/

use notes_service::{router, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let port: u16 = std::env::var("NOTES_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5000);

    let host = std::env::var("NOTES_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    let state = Arc::new(AppState::new());
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    log::info!("Notes Service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server error");
}

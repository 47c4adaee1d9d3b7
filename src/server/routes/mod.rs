//! API routes and handlers.

mod files;
mod forms;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};

use super::state::AppState;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/functions", get(forms::list_functions))
        .route(
            "/api/v1/functions/{name}",
            get(forms::get_form).post(forms::submit),
        )
        .route(
            "/api/v1/files/{handle}",
            get(files::download).delete(files::delete),
        )
        // Uploads are streamed to disk in chunks, so the body itself is
        // not size-limited here.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

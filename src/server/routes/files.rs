//! Download and cleanup handlers for persisted returned files.

use axum::{
    extract::{Path as UrlPath, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use super::super::{error::ApiError, state::AppState};

/// Serve a persisted file as an attachment download.
pub async fn download(
    State(state): State<AppState>,
    UrlPath(handle): UrlPath<String>,
) -> Result<Response, ApiError> {
    let resolved = state.files().resolve(&handle)?;
    let data = tokio::fs::read(&resolved.path)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let disposition = format!("attachment; filename=\"{}\"", resolved.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

/// Delete a persisted file. Idempotent: deleting an already-removed
/// handle still succeeds.
pub async fn delete(
    State(state): State<AppState>,
    UrlPath(handle): UrlPath<String>,
) -> Result<StatusCode, ApiError> {
    state.files().cleanup(&handle)?;
    Ok(StatusCode::NO_CONTENT)
}

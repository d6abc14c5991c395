//! OpenBB widget configuration endpoint.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::de::IgnoredAny;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Serve the widgets document, read from disk on every request.
///
/// The file is checked to be valid JSON and then returned byte for byte, so
/// key order and formatting are those of the file.
pub async fn widgets(State(state): State<AppState>) -> ApiResult<Response> {
    let path = &state.config.widgets_path;
    let content = tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::Widgets(format!("{}: {}", path.display(), e)))?;
    serde_json::from_slice::<IgnoredAny>(&content)
        .map_err(|e| ApiError::Widgets(format!("{}: {}", path.display(), e)))?;

    Ok(([(header::CONTENT_TYPE, "application/json")], content).into_response())
}

//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use terrapin_core::ScheduleError;
use terrapin_traits::TraitError;

/// API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The bond data source failed.
    #[error("Upstream error: {0}")]
    Upstream(#[from] TraitError),

    /// Upstream data could not be turned into a schedule.
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// The widgets document could not be loaded.
    #[error("Widgets error: {0}")]
    Widgets(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::Schedule(_) => "SCHEDULE_ERROR",
            ApiError::Widgets(_) => "WIDGETS_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error body details.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let message = self.to_string();

        tracing::error!(kind, "{}", message);

        let body = Json(ErrorResponse {
            error: ErrorBody {
                kind: kind.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

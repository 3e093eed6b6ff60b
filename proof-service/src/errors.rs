use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The toolchain binary could not be launched at all.
    #[error("failed to launch toolchain: {0}")]
    Spawn(String),

    /// The toolchain ran and exited non-zero; stderr is relayed as-is.
    #[error("toolchain failed (exit={code:?}): {stderr}")]
    Tool { code: Option<i32>, stderr: String },

    #[error("internal error")]
    Internal,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Spawn(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Tool { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

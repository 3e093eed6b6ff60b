use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The subgraph endpoint could not be reached or rejected a query.
    #[error("subgraph request failed: {0}")]
    Subgraph(String),

    /// The inference API could not be reached or returned an unusable body.
    #[error("inference request failed: {0}")]
    Inference(String),

    #[error("missing configuration: {0}")]
    Config(String),

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
            ApiError::Subgraph(_) => StatusCode::BAD_GATEWAY,
            ApiError::Inference(_) => StatusCode::BAD_GATEWAY,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

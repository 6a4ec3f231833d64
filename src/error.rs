use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failure bodies on the wire are always `{"error": ...}` objects. Apart from
/// the handful of endpoints that distinguish a missing row, every failure
/// collapses to a generic 500 and the underlying cause is only logged.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// Lets handlers use `AppError` as the error type of a diesel transaction.
impl From<crate::aliases::DieselError> for AppError {
    fn from(err: crate::aliases::DieselError) -> Self {
        AppError::Other(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            AppError::Other(err) => {
                tracing::error!("Error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "An error occurred" })),
                )
                    .into_response()
            }
        }
    }
}

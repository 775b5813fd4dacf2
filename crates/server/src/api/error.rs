//! HTTP error mapping.
//!
//! Routes answer failures in one of two JSON shapes: `{error}` for the car
//! and stock routes, `{message, error?}` for the scan routes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use paddy_store::StoreError;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// 400 with `{error}`.
    #[error("{0}")]
    BadRequest(String),

    /// 400 with `{message}`.
    #[error("{0}")]
    Rejected(String),

    /// Request body could not be read or parsed; `{error}` with the
    /// extractor's status (400, 413, ...).
    #[error("{message}")]
    Body { status: StatusCode, message: String },

    /// 500 with a fixed `{error}`; the cause is only logged.
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    /// 500 with the cause as `{error}`.
    #[error("{0}")]
    StorageDetail(#[source] StoreError),

    /// 500 with `{message: "Server error", error: cause}`.
    #[error("Server error: {0}")]
    ServerError(#[source] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
            }
            ApiError::Rejected(message) => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse { message, error: None }),
            )
                .into_response(),
            ApiError::Body { status, message } => {
                (status, Json(ErrorResponse { error: message })).into_response()
            }
            ApiError::Storage { context, source } => {
                error!("{}: {}", context, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: context.to_string(),
                    }),
                )
                    .into_response()
            }
            ApiError::StorageDetail(source) => {
                error!("Storage error: {}", source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: source.to_string(),
                    }),
                )
                    .into_response()
            }
            ApiError::ServerError(source) => {
                error!("Server error: {}", source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MessageResponse {
                        message: "Server error".to_string(),
                        error: Some(source.to_string()),
                    }),
                )
                    .into_response()
            }
        }
    }
}

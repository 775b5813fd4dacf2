//! QR scan intake and listing.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use paddy_core::{scan_fields, Scan};

use crate::state::AppState;

use super::{ApiError, MessageResponse, Payload};

#[derive(Serialize, utoipa::ToSchema)]
pub struct ScanCreated {
    pub message: String,
    #[schema(value_type = Object)]
    pub data: Scan,
}

#[utoipa::path(
    post,
    path = "/api/scans",
    tag = "Scans",
    request_body(content = Object, description = "Any non-empty JSON object"),
    responses(
        (status = 201, description = "Scan stored", body = ScanCreated),
        (status = 400, description = "Empty or missing body", body = MessageResponse),
        (status = 500, description = "Store error", body = MessageResponse)
    )
)]
pub async fn scans_create(
    State(state): State<Arc<AppState>>,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<ScanCreated>), ApiError> {
    let fields = scan_fields(body).map_err(|e| ApiError::Rejected(e.to_string()))?;
    let scan = state
        .stores
        .scans
        .insert(fields)
        .await
        .map_err(ApiError::ServerError)?;

    Ok((
        StatusCode::CREATED,
        Json(ScanCreated {
            message: "Data saved".to_string(),
            data: scan,
        }),
    ))
}

/// Every scan, most recent first.
#[utoipa::path(
    get,
    path = "/api/scans",
    tag = "Scans",
    responses(
        (status = 200, description = "All scans, newest first", body = [Object]),
        (status = 500, description = "Store error", body = MessageResponse)
    )
)]
pub async fn scans_list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Scan>>, ApiError> {
    let scans = state
        .stores
        .scans
        .list_newest_first()
        .await
        .map_err(ApiError::ServerError)?;
    Ok(Json(scans))
}

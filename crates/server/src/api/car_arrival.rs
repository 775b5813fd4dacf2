//! The car-arrival board: read the current record, replace it wholesale.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use paddy_core::{CarArrivalSnapshot, CarArrivalUpdate};

use crate::state::AppState;

use super::{ApiError, ErrorResponse, Payload};

#[derive(Serialize, utoipa::ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Current board, or empty `history`/`logs` if nothing was saved yet.
#[utoipa::path(
    get,
    path = "/carArrival",
    tag = "Car Arrival",
    responses(
        (status = 200, description = "Current car-arrival record", body = Object),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn car_arrival_get(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CarArrivalSnapshot>, ApiError> {
    let latest = state
        .stores
        .car
        .latest()
        .await
        .map_err(|source| ApiError::Storage {
            context: "Failed to fetch data",
            source,
        })?;

    Ok(Json(latest.into()))
}

/// Replace the board's `history` and `logs`.
#[utoipa::path(
    post,
    path = "/carArrival",
    tag = "Car Arrival",
    request_body(content = Object, description = "`{history: [...], logs: [...]}`"),
    responses(
        (status = 200, description = "Board replaced", body = SuccessResponse),
        (status = 400, description = "history or logs is not an array", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn car_arrival_post(
    State(state): State<Arc<AppState>>,
    Payload(body): Payload,
) -> Result<Json<SuccessResponse>, ApiError> {
    let update =
        CarArrivalUpdate::from_payload(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let record = state
        .stores
        .car
        .replace(update)
        .await
        .map_err(|source| ApiError::Storage {
            context: "Failed to save data",
            source,
        })?;

    debug!(
        "Car arrival board replaced ({} history, {} logs)",
        record.history.len(),
        record.logs.len()
    );
    Ok(Json(SuccessResponse { success: true }))
}

//! Stock entries and the weekday volume series.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

use paddy_core::{daily_volume, DailyVolume, Stock, StockFields};

use crate::state::AppState;

use super::{ApiError, ErrorResponse, Payload};

/// All stock entries, `Date` descending (text order).
#[utoipa::path(
    get,
    path = "/api/stocks/all",
    tag = "Stocks",
    responses(
        (status = 200, description = "Stock entries sorted by Date text, descending", body = [Object]),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn stocks_all(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Stock>>, ApiError> {
    let stocks = state
        .stores
        .stocks
        .list_by_date_desc()
        .await
        .map_err(ApiError::StorageDetail)?;
    Ok(Json(stocks))
}

/// Total weight per weekday, Mon through Sun.
#[utoipa::path(
    get,
    path = "/api/stocks/daily",
    tag = "Stocks",
    responses(
        (status = 200, description = "Seven {day, volume} points", body = [Object]),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn stocks_daily(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DailyVolume>>, ApiError> {
    let stocks = state
        .stores
        .stocks
        .list()
        .await
        .map_err(|source| ApiError::Storage {
            context: "Server error",
            source,
        })?;

    let series = daily_volume(&stocks);
    debug!("Daily volume computed over {} stock entries", stocks.len());
    Ok(Json(series))
}

#[utoipa::path(
    post,
    path = "/api/stocks",
    tag = "Stocks",
    request_body(content = Object, description = "Stock entry; unknown fields are dropped"),
    responses(
        (status = 201, description = "Created stock entry", body = Object),
        (status = 400, description = "Cast failure or store error", body = ErrorResponse)
    )
)]
pub async fn stocks_create(
    State(state): State<Arc<AppState>>,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<Stock>), ApiError> {
    let fields = StockFields::from_payload(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let stock = state
        .stores
        .stocks
        .insert(fields)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(stock)))
}

//! HTTP router construction.
//!
//! Assembles all Axum routes, middleware, and OpenAPI docs into a single `Router`.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use paddy_core::config::ServerConfig;

use crate::api;
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> anyhow::Result<Router> {
    let app = Router::new()
        .route("/", get(api::root))
        .route(
            "/carArrival",
            get(api::car_arrival_get).post(api::car_arrival_post),
        )
        .route("/api/scans", get(api::scans_list).post(api::scans_create))
        .route("/api/stocks/all", get(api::stocks_all))
        .route("/api/stocks/daily", get(api::stocks_daily))
        .route("/api/stocks", post(api::stocks_create));

    Ok(app
        .layer(DefaultBodyLimit::max(config.body_limit_bytes()))
        .layer(cors_layer(&config.cors_origin)?)
        .with_state(state)
        .merge(Scalar::with_url("/docs", api::doc::ApiDoc::openapi())))
}

/// One allowed origin, credentials allowed, request headers mirrored back.
fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("CORS_ORIGIN is not a valid header value: {origin:?}"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request()))
}

//! OpenAPI documentation aggregator, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "paddy-server API",
        version = "0.1.0",
        description = "Car arrivals, QR scans and paddy stock for the paddy-purchase dashboard.",
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Car Arrival", description = "The single current car-arrival board"),
        (name = "Scans", description = "Free-form QR scan records"),
        (name = "Stocks", description = "Stock entries and the weekday volume series"),
    ),
    paths(
        crate::api::health::root,
        crate::api::car_arrival::car_arrival_get,
        crate::api::car_arrival::car_arrival_post,
        crate::api::scans::scans_create,
        crate::api::scans::scans_list,
        crate::api::stocks::stocks_all,
        crate::api::stocks::stocks_daily,
        crate::api::stocks::stocks_create,
    ),
    components(schemas(
        crate::api::ErrorResponse,
        crate::api::MessageResponse,
        crate::api::car_arrival::SuccessResponse,
        crate::api::scans::ScanCreated,
    ))
)]
pub struct ApiDoc;

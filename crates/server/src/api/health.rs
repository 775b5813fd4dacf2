/// Plain-text liveness string served at `/`.
const LIVENESS: &str = "Unified server running (Car, QR, Stock)";

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Server is up", content_type = "text/plain", body = String)
    )
)]
pub async fn root() -> &'static str {
    LIVENESS
}

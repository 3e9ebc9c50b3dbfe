use axum::{http::StatusCode, Json};
use utoipa::OpenApi;

use crate::app::openapi::ApiDoc;

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The OpenAPI document describing every route.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

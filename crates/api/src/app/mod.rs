//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: gateway selection and the shared services handle
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs, presence validation and result-set shaping
//! - `errors.rs`: consistent error responses
//! - `openapi.rs`: the OpenAPI document served next to the routes

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use twitacad_infra::config::AppConfig;
use twitacad_infra::gateway::{GatewayError, ProcedureGateway};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod openapi;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> Result<Router, GatewayError> {
    let services = services::build_services(&config.store).await?;
    Ok(router(Arc::new(services), config.jwt_secret.clone()))
}

/// Build the router over an existing gateway (tests, embedding).
pub fn build_app_with(gateway: Arc<dyn ProcedureGateway>, jwt_secret: String) -> Router {
    router(Arc::new(services::AppServices::new(gateway)), jwt_secret)
}

fn router(services: Arc<services::AppServices>, jwt_secret: String) -> Router {
    let jwt = Arc::new(twitacad_auth::Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let auth_state = middleware::AuthState { jwt };

    // Likes is the only resource behind the bearer check.
    let protected = routes::likes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route(openapi::OPENAPI_PATH, get(routes::system::openapi_json))
        .merge(routes::public_router())
        .merge(protected)
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

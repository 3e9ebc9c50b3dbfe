use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use twitacad_infra::gateway::{Lookup, Procedure};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/Login", post(login))
}

#[utoipa::path(
    post,
    path = "/Login",
    tag = "Login",
    request_body = dto::LoginRequest,
    responses(
        (status = 200, description = "Logeado; el usuario sin su contraseña"),
        (status = 404, description = "Usuario o contraseña incorrectos"),
        (status = 400, description = "Faltan campos requeridos", body = errors::ErrorResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
/// Checks credentials. No token is issued here.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let (nombre_usuario, contrasena) = match body.validate() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.lookup(Procedure::R_Login, vec![nombre_usuario.into(), contrasena.into()]).await {
        Ok(Lookup::Found(row)) => (StatusCode::OK, Json(dto::without_credential(row))).into_response(),
        Ok(Lookup::NotFound(rows)) => {
            tracing::debug!("login rejected");
            (StatusCode::NOT_FOUND, Json(dto::first_row(rows))).into_response()
        }
        Err(e) => errors::gateway_error_to_response(e),
    }
}

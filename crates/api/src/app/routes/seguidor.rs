use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use twitacad_core::{Seguidor, UsuarioId};
use twitacad_infra::gateway::Procedure;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/Seguidor", get(list_seguidores).post(follow))
        .route("/Seguidor/:idUsuario/:idSeguidor", get(is_following).delete(unfollow))
        .route("/Seguidores/:idUsuario", get(followers_of))
        .route("/Siguiendo/:idUsuario", get(followed_by))
}

#[utoipa::path(
    get,
    path = "/Seguidor",
    tag = "Seguidor",
    responses(
        (status = 200, description = "Lista de Seguidor", body = [Seguidor]),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn list_seguidores(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.call(Procedure::R_Seguidor, vec![]).await {
        Ok(rows) => (StatusCode::OK, Json(dto::row_set(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/Seguidores/{idUsuario}",
    tag = "Seguidor",
    params(("idUsuario" = i64, Path, description = "id del Usuario")),
    responses(
        (status = 200, description = "Usuarios que siguen al usuario"),
        (status = 400, description = "id invalido", body = errors::ErrorResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
/// Users following `:idUsuario`.
pub async fn followers_of(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    list_for(&services, Procedure::R_Seguidores, &id).await
}

#[utoipa::path(
    get,
    path = "/Siguiendo/{idUsuario}",
    tag = "Seguidor",
    params(("idUsuario" = i64, Path, description = "id del Usuario")),
    responses(
        (status = 200, description = "Usuarios a los que sigue el usuario"),
        (status = 400, description = "id invalido", body = errors::ErrorResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
/// Users `:idUsuario` follows.
pub async fn followed_by(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    list_for(&services, Procedure::R_Siguiendo, &id).await
}

async fn list_for(services: &AppServices, procedure: Procedure, raw_id: &str) -> axum::response::Response {
    let id: UsuarioId = match errors::parse_id(raw_id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.call(procedure, vec![id.into()]).await {
        Ok(rows) => (StatusCode::OK, Json(dto::row_set(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/Seguidor/{idUsuario}/{idSeguidor}",
    tag = "Seguidor",
    params(("idUsuario" = i64, Path, description = "id del Usuario"), ("idSeguidor" = i64, Path, description = "id del usuario que toma el rol de seguidor")),
    responses(
        (status = 200, description = "IsFollowing: 1 si existe la relacion, 0 si no"),
        (status = 400, description = "id invalido", body = errors::ErrorResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn is_following(
    Extension(services): Extension<Arc<AppServices>>,
    Path((usuario, seguidor)): Path<(String, String)>,
) -> axum::response::Response {
    let (usuario, seguidor) = match parse_edge(&usuario, &seguidor) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.call(Procedure::R_IsFollowing, vec![usuario.into(), seguidor.into()]).await {
        Ok(rows) => (StatusCode::OK, Json(dto::first_row(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/Seguidor",
    tag = "Seguidor",
    request_body = dto::SeguidorRequest,
    responses(
        (status = 200, description = "Seguidor guardado", body = [Seguidor]),
        (status = 400, description = "Faltan campos requeridos", body = errors::ErrorResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn follow(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SeguidorRequest>,
) -> axum::response::Response {
    let (usuario, seguidor) = match body.validate() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.call(Procedure::C_Seguidor, vec![usuario.into(), seguidor.into()]).await {
        Ok(rows) => (StatusCode::OK, Json(dto::row_set(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/Seguidor/{idUsuario}/{idSeguidor}",
    tag = "Seguidor",
    params(("idUsuario" = i64, Path, description = "id del Usuario"), ("idSeguidor" = i64, Path, description = "id del usuario que toma el rol de seguidor")),
    responses(
        (status = 200, description = "Seguidor eliminado"),
        (status = 400, description = "id invalido", body = errors::ErrorResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn unfollow(
    Extension(services): Extension<Arc<AppServices>>,
    Path((usuario, seguidor)): Path<(String, String)>,
) -> axum::response::Response {
    let (usuario, seguidor) = match parse_edge(&usuario, &seguidor) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.call(Procedure::D_Unfollow, vec![usuario.into(), seguidor.into()]).await {
        Ok(rows) => (StatusCode::OK, Json(dto::row_set(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

fn parse_edge(usuario: &str, seguidor: &str) -> Result<(UsuarioId, UsuarioId), axum::response::Response> {
    Ok((errors::parse_id(usuario)?, errors::parse_id(seguidor)?))
}

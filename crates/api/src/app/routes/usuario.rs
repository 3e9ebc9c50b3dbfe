use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use twitacad_core::{Usuario, UsuarioId};
use twitacad_infra::gateway::{Lookup, ProcParam, Procedure};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/Usuario", get(list_usuarios).post(create_usuario))
        .route(
            "/Usuario/:idUsuario",
            get(get_usuario).put(update_usuario).delete(delete_usuario),
        )
}

#[utoipa::path(
    get,
    path = "/Usuario",
    tag = "Usuario",
    responses(
        (status = 200, description = "Lista de Usuario", body = [Usuario]),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn list_usuarios(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.call(Procedure::R_Usuario, vec![]).await {
        Ok(rows) => (StatusCode::OK, Json(dto::row_set(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/Usuario/{idUsuario}",
    tag = "Usuario",
    params(("idUsuario" = i64, Path, description = "id del Usuario")),
    responses(
        (status = 200, description = "Usuario encontrado", body = Usuario),
        (status = 404, description = "Usuario no encontrado"),
        (status = 400, description = "id invalido", body = errors::ErrorResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn get_usuario(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: UsuarioId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.lookup(Procedure::R_UsuarioByID, vec![id.into()]).await {
        Ok(Lookup::Found(row)) => (StatusCode::OK, Json(row)).into_response(),
        Ok(Lookup::NotFound(rows)) => (StatusCode::NOT_FOUND, Json(dto::row_set(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/Usuario",
    tag = "Usuario",
    request_body = dto::UsuarioRequest,
    responses(
        (status = 201, description = "Usuario guardado", body = dto::StatusResponse),
        (status = 400, description = "Faltan campos requeridos", body = errors::ErrorResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn create_usuario(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::UsuarioRequest>,
) -> axum::response::Response {
    save(&services, UsuarioId::NEW, body, StatusCode::CREATED, "Usuario guardado").await
}

#[utoipa::path(
    put,
    path = "/Usuario/{idUsuario}",
    tag = "Usuario",
    params(("idUsuario" = i64, Path, description = "id del Usuario")),
    request_body = dto::UsuarioRequest,
    responses(
        (status = 200, description = "Usuario actualizado", body = dto::StatusResponse),
        (status = 400, description = "Faltan campos requeridos", body = errors::ErrorResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn update_usuario(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UsuarioRequest>,
) -> axum::response::Response {
    let id: UsuarioId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    save(&services, id, body, StatusCode::OK, "Usuario actualizado").await
}

async fn save(
    services: &AppServices,
    id: UsuarioId,
    body: dto::UsuarioRequest,
    status: StatusCode,
    message: &'static str,
) -> axum::response::Response {
    let fields = match body.validate() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let params: Vec<ProcParam> = vec![
        id.into(),
        fields.nombre.into(),
        fields.nombre_usuario.into(),
        fields.contrasena.into(),
    ];
    match services.call(Procedure::CU_Usuario, params).await {
        Ok(_) => (status, Json(dto::StatusResponse::new(message))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/Usuario/{idUsuario}",
    tag = "Usuario",
    params(("idUsuario" = i64, Path, description = "id del Usuario")),
    responses(
        (status = 200, description = "Usuario eliminado", body = dto::StatusResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn delete_usuario(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: UsuarioId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.call(Procedure::D_Usuario, vec![id.into()]).await {
        Ok(_) => (StatusCode::OK, Json(dto::StatusResponse::new("Usuario eliminado"))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

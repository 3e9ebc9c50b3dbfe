//! Like edges. Every route here sits behind the bearer-token middleware.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use twitacad_core::{TweetId, UsuarioId};
use twitacad_infra::gateway::Procedure;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/Likes", post(like))
        .route("/Likes/:idTweet", get(count_likes))
        .route("/Likes/:idTweet/:idUsuario", get(is_liked).delete(unlike))
}

#[utoipa::path(
    get,
    path = "/Likes/{idTweet}/{idUsuario}",
    tag = "Likes",
    params(("idTweet" = i64, Path, description = "id del Tweet"), ("idUsuario" = i64, Path, description = "id del Usuario")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "IsLiked: 1 si el usuario dio like, 0 si no"),
        (status = 400, description = "id invalido", body = errors::ErrorResponse),
        (status = 401, description = "Token ausente o invalido"),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn is_liked(
    Extension(services): Extension<Arc<AppServices>>,
    Path((tweet, usuario)): Path<(String, String)>,
) -> axum::response::Response {
    let (tweet, usuario) = match parse_edge(&tweet, &usuario) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.call(Procedure::R_IsLiked, vec![tweet.into(), usuario.into()]).await {
        Ok(rows) => (StatusCode::OK, Json(dto::first_row(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/Likes/{idTweet}",
    tag = "Likes",
    params(("idTweet" = i64, Path, description = "id del Tweet")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Cantidad de likes del tweet"),
        (status = 400, description = "id invalido", body = errors::ErrorResponse),
        (status = 401, description = "Token ausente o invalido"),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn count_likes(
    Extension(services): Extension<Arc<AppServices>>,
    Path(tweet): Path<String>,
) -> axum::response::Response {
    let tweet: TweetId = match errors::parse_id(&tweet) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.call(Procedure::R_CantidadLikes, vec![tweet.into()]).await {
        Ok(rows) => (StatusCode::OK, Json(dto::first_row(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/Likes",
    tag = "Likes",
    request_body = dto::LikeRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Like guardado"),
        (status = 400, description = "Faltan campos requeridos", body = errors::ErrorResponse),
        (status = 401, description = "Token ausente o invalido"),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn like(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::LikeRequest>,
) -> axum::response::Response {
    let (tweet, usuario) = match body.validate() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    tracing::info!(principal = %principal.usuario_id(), %tweet, %usuario, "like");

    match services.call(Procedure::C_Likes, vec![tweet.into(), usuario.into()]).await {
        Ok(rows) => (StatusCode::CREATED, Json(dto::first_row(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/Likes/{idTweet}/{idUsuario}",
    tag = "Likes",
    params(("idTweet" = i64, Path, description = "id del Tweet"), ("idUsuario" = i64, Path, description = "id del Usuario")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Like eliminado"),
        (status = 400, description = "id invalido", body = errors::ErrorResponse),
        (status = 401, description = "Token ausente o invalido"),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn unlike(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((tweet, usuario)): Path<(String, String)>,
) -> axum::response::Response {
    let (tweet, usuario) = match parse_edge(&tweet, &usuario) {
        Ok(v) => v,
        Err(res) => return res,
    };
    tracing::info!(principal = %principal.usuario_id(), %tweet, %usuario, "unlike");

    match services.call(Procedure::D_Likes, vec![tweet.into(), usuario.into()]).await {
        Ok(rows) => (StatusCode::OK, Json(dto::first_row(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

fn parse_edge(tweet: &str, usuario: &str) -> Result<(TweetId, UsuarioId), axum::response::Response> {
    Ok((errors::parse_id(tweet)?, errors::parse_id(usuario)?))
}

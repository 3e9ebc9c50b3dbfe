use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use twitacad_core::{Tweet, TweetId, UsuarioId};
use twitacad_infra::gateway::{ProcParam, Procedure};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    // `/Tweet/:id` is the author's timeline on GET and the tweet itself on PUT/DELETE.
    Router::new()
        .route("/Tweet", get(list_tweets).post(create_tweet))
        .route("/Tweet/:id", get(timeline).put(update_tweet).delete(delete_tweet))
        .route("/Tweet/Content/:Keyword", get(search_tweets))
        .route("/TweetPerfil/:idUsuario", get(profile_tweets))
}

#[utoipa::path(
    get,
    path = "/Tweet",
    tag = "Tweet",
    responses(
        (status = 200, description = "Lista de Tweet", body = [Tweet]),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn list_tweets(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.call(Procedure::R_Tweet, vec![]).await {
        Ok(rows) => (StatusCode::OK, Json(dto::row_set(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/TweetPerfil/{idUsuario}",
    tag = "Tweet",
    params(("idUsuario" = i64, Path, description = "id del Usuario")),
    responses(
        (status = 200, description = "Tweets publicados por el usuario", body = [Tweet]),
        (status = 400, description = "id invalido", body = errors::ErrorResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn profile_tweets(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: UsuarioId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.call(Procedure::R_TweetsPerfil, vec![id.into()]).await {
        Ok(rows) => (StatusCode::OK, Json(dto::row_set(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/Tweet/{idUsuario}",
    tag = "Tweet",
    params(("idUsuario" = i64, Path, description = "id del Usuario")),
    responses(
        (status = 200, description = "Tweets del usuario y de quienes sigue", body = [Tweet]),
        (status = 400, description = "id invalido", body = errors::ErrorResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
/// Tweets by the user and by everyone the user follows.
pub async fn timeline(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: UsuarioId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.call(Procedure::R_TweetFollowing, vec![id.into()]).await {
        Ok(rows) => (StatusCode::OK, Json(dto::row_set(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/Tweet/Content/{Keyword}",
    tag = "Tweet",
    params(("Keyword" = String, Path, description = "palabra a buscar")),
    responses(
        (status = 200, description = "Tweets que contienen la palabra", body = [Tweet]),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn search_tweets(
    Extension(services): Extension<Arc<AppServices>>,
    Path(keyword): Path<String>,
) -> axum::response::Response {
    match services.call(Procedure::S_InTweet, vec![keyword.into()]).await {
        Ok(rows) => (StatusCode::OK, Json(dto::row_set(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/Tweet",
    tag = "Tweet",
    request_body = dto::TweetRequest,
    responses(
        (status = 201, description = "Tweet guardado", body = Tweet),
        (status = 400, description = "Faltan campos requeridos", body = errors::ErrorResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn create_tweet(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::TweetRequest>,
) -> axum::response::Response {
    save(&services, TweetId::NEW, body, StatusCode::CREATED).await
}

#[utoipa::path(
    put,
    path = "/Tweet/{idTweet}",
    tag = "Tweet",
    params(("idTweet" = i64, Path, description = "id del Tweet")),
    request_body = dto::TweetRequest,
    responses(
        (status = 200, description = "Tweet actualizado", body = Tweet),
        (status = 400, description = "Faltan campos requeridos", body = errors::ErrorResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn update_tweet(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::TweetRequest>,
) -> axum::response::Response {
    let id: TweetId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    save(&services, id, body, StatusCode::OK).await
}

async fn save(
    services: &AppServices,
    id: TweetId,
    body: dto::TweetRequest,
    status: StatusCode,
) -> axum::response::Response {
    let fields = match body.validate() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let params: Vec<ProcParam> = vec![
        id.into(),
        fields.cuerpo.into(),
        fields.fecha_hora_publicacion.into(),
        fields.autor.into(),
    ];
    match services.call(Procedure::CU_Tweet, params).await {
        Ok(rows) => (status, Json(dto::first_row(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/Tweet/{idTweet}",
    tag = "Tweet",
    params(("idTweet" = i64, Path, description = "id del Tweet")),
    responses(
        (status = 200, description = "Tweet eliminado"),
        (status = 400, description = "id invalido", body = errors::ErrorResponse),
        (status = 500, description = "Error con el servidor", body = errors::ErrorResponse)
    )
)]
pub async fn delete_tweet(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TweetId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.call(Procedure::D_Tweet, vec![id.into()]).await {
        Ok(rows) => (StatusCode::OK, Json(dto::first_row(rows))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

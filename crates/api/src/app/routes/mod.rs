use axum::Router;

pub mod likes;
pub mod login;
pub mod seguidor;
pub mod system;
pub mod tweet;
pub mod usuario;

/// Router for every endpoint that needs no bearer token.
pub fn public_router() -> Router {
    Router::new()
        .merge(usuario::router())
        .merge(tweet::router())
        .merge(seguidor::router())
        .merge(login::router())
}

//! OpenAPI document for the HTTP API, served at [`OPENAPI_PATH`].

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use twitacad_core::{Like, Seguidor, Tweet, TweetId, Usuario, UsuarioId};

use crate::app::routes::{likes, login, seguidor, system, tweet, usuario};
use crate::app::{dto, errors};

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "Twitter academico", description = "Usuarios, tweets, seguidores, likes y login"),
    paths(
        system::health,
        usuario::list_usuarios,
        usuario::get_usuario,
        usuario::create_usuario,
        usuario::update_usuario,
        usuario::delete_usuario,
        tweet::list_tweets,
        tweet::profile_tweets,
        tweet::timeline,
        tweet::search_tweets,
        tweet::create_tweet,
        tweet::update_tweet,
        tweet::delete_tweet,
        seguidor::list_seguidores,
        seguidor::followers_of,
        seguidor::followed_by,
        seguidor::is_following,
        seguidor::follow,
        seguidor::unfollow,
        likes::is_liked,
        likes::count_likes,
        likes::like,
        likes::unlike,
        login::login,
    ),
    components(schemas(
        UsuarioId,
        TweetId,
        Usuario,
        Tweet,
        Seguidor,
        Like,
        dto::UsuarioRequest,
        dto::TweetRequest,
        dto::SeguidorRequest,
        dto::LikeRequest,
        dto::LoginRequest,
        dto::StatusResponse,
        errors::ErrorResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Usuario", description = "endpoints para Usuario"),
        (name = "Tweet", description = "endpoints para Tweet"),
        (name = "Seguidor", description = "endpoints para Seguidor"),
        (name = "Likes", description = "endpoints para Likes"),
        (name = "Login", description = "endpoints para Login"),
        (name = "System", description = "liveness"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by the Likes routes.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/health",
            "/Usuario",
            "/Usuario/{idUsuario}",
            "/Tweet",
            "/TweetPerfil/{idUsuario}",
            "/Tweet/Content/{Keyword}",
            "/Seguidor",
            "/Seguidor/{idUsuario}/{idSeguidor}",
            "/Seguidores/{idUsuario}",
            "/Siguiendo/{idUsuario}",
            "/Likes",
            "/Likes/{idTweet}",
            "/Likes/{idTweet}/{idUsuario}",
            "/Login",
        ] {
            assert!(paths.contains(&expected), "{expected} missing from {paths:?}");
        }
    }

    #[test]
    fn schemas_use_column_names_and_bearer_is_registered() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let usuario = &doc["components"]["schemas"]["Usuario"];
        let required = usuario["required"].as_array().unwrap();
        assert!(required.iter().any(|f| f == "NombreUsuario"));
        assert!(required.iter().any(|f| f == "Contraseña"));
        assert_eq!(doc["components"]["securitySchemes"]["bearer"]["scheme"], "bearer");
    }
}

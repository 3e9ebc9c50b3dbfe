use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{TweetId, UsuarioId};

/// A published tweet.
///
/// `FechaHoraPublicacion` is kept as the client sent it; the database decides
/// how to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Tweet {
    #[serde(rename = "idTweet")]
    pub id: TweetId,
    #[serde(rename = "Cuerpo")]
    pub cuerpo: String,
    #[serde(rename = "FechaHoraPublicacion")]
    pub fecha_hora_publicacion: String,
    /// Like counter; starts at 0.
    #[serde(rename = "Likes")]
    pub likes: i64,
    #[serde(rename = "idUsuario")]
    pub autor: UsuarioId,
}

impl Tweet {
    pub fn new(
        id: TweetId,
        cuerpo: impl Into<String>,
        fecha_hora_publicacion: impl Into<String>,
        autor: UsuarioId,
    ) -> Self {
        Self {
            id,
            cuerpo: cuerpo.into(),
            fecha_hora_publicacion: fecha_hora_publicacion.into(),
            likes: 0,
            autor,
        }
    }
}

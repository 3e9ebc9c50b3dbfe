//! Edge records: follows and likes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{TweetId, UsuarioId};

/// Directed follow edge: `seguidor` follows `usuario`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Seguidor {
    /// The followed user.
    #[serde(rename = "idUsuario")]
    pub usuario: UsuarioId,
    /// The follower.
    #[serde(rename = "idSeguidor")]
    pub seguidor: UsuarioId,
}

impl Seguidor {
    pub fn new(usuario: UsuarioId, seguidor: UsuarioId) -> Self {
        Self { usuario, seguidor }
    }
}

/// Directed like edge: `usuario` liked `tweet`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Like {
    #[serde(rename = "idTweet")]
    pub tweet: TweetId,
    #[serde(rename = "idUsuario")]
    pub usuario: UsuarioId,
}

impl Like {
    pub fn new(tweet: TweetId, usuario: UsuarioId) -> Self {
        Self { tweet, usuario }
    }
}

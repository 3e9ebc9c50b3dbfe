use twitacad_core::UsuarioId;

/// Principal context for a request (the user the bearer token was issued to).
///
/// Only present on routes behind the auth middleware.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    usuario_id: UsuarioId,
}

impl PrincipalContext {
    pub fn new(usuario_id: UsuarioId) -> Self {
        Self { usuario_id }
    }

    pub fn usuario_id(&self) -> UsuarioId {
        self.usuario_id
    }
}

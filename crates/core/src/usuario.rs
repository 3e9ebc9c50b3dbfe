//! User record, as the procedures return it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::UsuarioId;

/// A registered user.
///
/// Field names are the database column names; they are also the JSON keys the
/// API exposes. Only `Nombre`, `NombreUsuario` and `Contraseña` are written by
/// `CU_Usuario`; the remaining profile columns are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Usuario {
    #[serde(rename = "idUsuario")]
    pub id: UsuarioId,
    #[serde(rename = "Nombre")]
    pub nombre: String,
    #[serde(rename = "ApellidoPaterno", default)]
    pub apellido_paterno: Option<String>,
    #[serde(rename = "ApellidoMaterno", default)]
    pub apellido_materno: Option<String>,
    #[serde(rename = "FechaNacimiento", default)]
    pub fecha_nacimiento: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "NombreUsuario")]
    pub nombre_usuario: String,
    #[serde(rename = "Contraseña")]
    pub contrasena: String,
    #[serde(rename = "idTipoUsuario", default)]
    pub id_tipo_usuario: Option<i64>,
}

impl Usuario {
    /// Column holding the account secret.
    pub const CREDENTIAL_FIELD: &'static str = "Contraseña";

    pub fn new(
        id: UsuarioId,
        nombre: impl Into<String>,
        nombre_usuario: impl Into<String>,
        contrasena: impl Into<String>,
    ) -> Self {
        Self {
            id,
            nombre: nombre.into(),
            apellido_paterno: None,
            apellido_materno: None,
            fecha_nacimiento: None,
            email: None,
            nombre_usuario: nombre_usuario.into(),
            contrasena: contrasena.into(),
            id_tipo_usuario: None,
        }
    }
}

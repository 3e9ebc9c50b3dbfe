//! Request DTOs and result-set shaping helpers.
//!
//! Request fields are optional so absence can be reported with the same
//! messages the clients already know, instead of a serde rejection.

use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use twitacad_core::{DomainError, TweetId, Usuario, UsuarioId};
use twitacad_infra::gateway::{ResultSet, Row};
use utoipa::ToSchema;

/// Body of `POST /Usuario` and `PUT /Usuario/:id`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UsuarioRequest {
    #[serde(rename = "Nombre")]
    pub nombre: Option<String>,
    #[serde(rename = "NombreUsuario")]
    pub nombre_usuario: Option<String>,
    /// Older clients send the secret as `Password` on update.
    #[serde(rename = "Contraseña", alias = "Password")]
    pub contrasena: Option<String>,
}

/// `{"Status": ...}` acknowledgement returned by the Usuario writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusResponse {
    #[serde(rename = "Status")]
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self { status: status.into() }
    }
}

/// Validated [`UsuarioRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsuarioFields {
    pub nombre: String,
    pub nombre_usuario: String,
    pub contrasena: String,
}

impl UsuarioRequest {
    pub fn validate(self) -> Result<UsuarioFields, DomainError> {
        let mut missing = Missing::default();
        let nombre = missing.check(self.nombre, "Ingrese un nombre para el usuario");
        let nombre_usuario = missing.check(self.nombre_usuario, "Ingrese el nombre de usuario para el usuario");
        let contrasena = missing.check(self.contrasena, "Ingrese la contraseña par la cuenta de este usuario");
        missing.finish()?;

        match (nombre, nombre_usuario, contrasena) {
            (Some(nombre), Some(nombre_usuario), Some(contrasena)) => Ok(UsuarioFields {
                nombre,
                nombre_usuario,
                contrasena,
            }),
            _ => Err(DomainError::validation("incomplete usuario")),
        }
    }
}

/// Body of `POST /Tweet` and `PUT /Tweet/:id`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TweetRequest {
    #[serde(rename = "Cuerpo")]
    pub cuerpo: Option<String>,
    #[serde(rename = "FechaHoraPublicacion")]
    pub fecha_hora_publicacion: Option<String>,
    #[serde(rename = "idUsuario", default, deserialize_with = "flexible_id")]
    pub autor: Option<UsuarioId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetFields {
    pub cuerpo: String,
    pub fecha_hora_publicacion: String,
    pub autor: UsuarioId,
}

impl TweetRequest {
    pub fn validate(self) -> Result<TweetFields, DomainError> {
        let mut missing = Missing::default();
        let cuerpo = missing.check(self.cuerpo, "Ingrese el cuerpo del tweet");
        let fecha = missing.check(self.fecha_hora_publicacion, "Ingrese la fecha y hora de publicación del tweet");
        let autor = missing.check(self.autor, "Ingrese el usuario que publica el tweet");
        missing.finish()?;

        match (cuerpo, fecha, autor) {
            (Some(cuerpo), Some(fecha_hora_publicacion), Some(autor)) => Ok(TweetFields {
                cuerpo,
                fecha_hora_publicacion,
                autor,
            }),
            _ => Err(DomainError::validation("incomplete tweet")),
        }
    }
}

/// Body of `POST /Seguidor`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SeguidorRequest {
    #[serde(rename = "idUsuario", default, deserialize_with = "flexible_id")]
    pub usuario: Option<UsuarioId>,
    #[serde(rename = "idSeguidor", default, deserialize_with = "flexible_id")]
    pub seguidor: Option<UsuarioId>,
}

impl SeguidorRequest {
    /// Returns `(followed, follower)`.
    pub fn validate(self) -> Result<(UsuarioId, UsuarioId), DomainError> {
        let mut missing = Missing::default();
        let usuario = missing.check(self.usuario, "Ingrese el usuario a seguir");
        let seguidor = missing.check(self.seguidor, "Ingrese el usuario seguidor");
        missing.finish()?;

        usuario
            .zip(seguidor)
            .ok_or_else(|| DomainError::validation("incomplete seguidor"))
    }
}

/// Body of `POST /Likes`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LikeRequest {
    #[serde(rename = "idTweet", default, deserialize_with = "flexible_id")]
    pub tweet: Option<TweetId>,
    #[serde(rename = "idUsuario", default, deserialize_with = "flexible_id")]
    pub usuario: Option<UsuarioId>,
}

impl LikeRequest {
    pub fn validate(self) -> Result<(TweetId, UsuarioId), DomainError> {
        let mut missing = Missing::default();
        let tweet = missing.check(self.tweet, "Ingrese el tweet");
        let usuario = missing.check(self.usuario, "Ingrese el usuario");
        missing.finish()?;

        tweet
            .zip(usuario)
            .ok_or_else(|| DomainError::validation("incomplete like"))
    }
}

/// Body of `POST /Login`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(rename = "NombreUsuario")]
    pub nombre_usuario: Option<String>,
    #[serde(rename = "Contraseña")]
    pub contrasena: Option<String>,
}

impl LoginRequest {
    pub fn validate(self) -> Result<(String, String), DomainError> {
        let mut missing = Missing::default();
        let nombre_usuario = missing.check(self.nombre_usuario, "Ingrese el nombre de usuario");
        let contrasena = missing.check(self.contrasena, "Ingrese la contraseña");
        missing.finish()?;

        nombre_usuario
            .zip(contrasena)
            .ok_or_else(|| DomainError::validation("incomplete login"))
    }
}

/// Collects one message per absent field.
#[derive(Default)]
struct Missing(Vec<&'static str>);

impl Missing {
    fn check<T>(&mut self, value: Option<T>, message: &'static str) -> Option<T> {
        if value.is_none() {
            self.0.push(message);
        }
        value
    }

    fn finish(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(self.0.join("; ")))
        }
    }
}

/// Accepts an id as a JSON number or a numeric string.
fn flexible_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = DomainError>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    let text = match raw {
        None => return Ok(None),
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Text(s)) => s,
    };
    text.parse::<T>().map(Some).map_err(serde::de::Error::custom)
}

/// The whole first result set as a JSON array.
pub fn row_set(rows: ResultSet) -> Value {
    Value::Array(rows.into_iter().map(Value::Object).collect())
}

/// The first row of the first result set, or `null` when it is empty.
pub fn first_row(rows: ResultSet) -> Value {
    rows.into_iter().next().map(Value::Object).unwrap_or(Value::Null)
}

/// Drops the credential column from a user row.
pub fn without_credential(mut row: Row) -> Row {
    row.remove(Usuario::CREDENTIAL_FIELD);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn usuario_reports_every_missing_field() {
        let req: UsuarioRequest = serde_json::from_value(json!({"Nombre": "Ana"})).unwrap();
        let err = req.validate().unwrap_err();
        assert_eq!(
            err,
            DomainError::validation(
                "Ingrese el nombre de usuario para el usuario; Ingrese la contraseña par la cuenta de este usuario"
            )
        );
    }

    #[test]
    fn usuario_accepts_legacy_password_field() {
        let req: UsuarioRequest =
            serde_json::from_value(json!({"Nombre": "Ana", "NombreUsuario": "ana", "Password": "pw"})).unwrap();
        assert_eq!(req.validate().unwrap().contrasena, "pw");
    }

    #[test]
    fn empty_string_counts_as_present() {
        let req: LoginRequest = serde_json::from_value(json!({"NombreUsuario": "", "Contraseña": ""})).unwrap();
        assert_eq!(req.validate().unwrap(), (String::new(), String::new()));
    }

    #[test]
    fn ids_may_be_numbers_or_numeric_strings() {
        let req: LikeRequest = serde_json::from_value(json!({"idTweet": "7", "idUsuario": 3})).unwrap();
        assert_eq!(req.validate().unwrap(), (TweetId::new(7), UsuarioId::new(3)));

        assert!(serde_json::from_value::<LikeRequest>(json!({"idTweet": "siete"})).is_err());
    }

    #[test]
    fn null_id_is_missing() {
        let req: SeguidorRequest = serde_json::from_value(json!({"idUsuario": null, "idSeguidor": 2})).unwrap();
        assert_eq!(req.validate().unwrap_err(), DomainError::validation("Ingrese el usuario a seguir"));
    }

    #[test]
    fn tweet_requires_author() {
        let req: TweetRequest =
            serde_json::from_value(json!({"Cuerpo": "hola", "FechaHoraPublicacion": "2024-01-01 10:00:00"})).unwrap();
        assert_eq!(
            req.validate().unwrap_err(),
            DomainError::validation("Ingrese el usuario que publica el tweet")
        );
    }

    #[test]
    fn shaping_helpers() {
        let rows: ResultSet = vec![
            json!({"idUsuario": 1, "Contraseña": "pw"}).as_object().cloned().unwrap(),
            json!({"idUsuario": 2}).as_object().cloned().unwrap(),
        ];
        assert_eq!(row_set(rows.clone()).as_array().map(Vec::len), Some(2));
        assert_eq!(first_row(rows.clone())["idUsuario"], 1);
        assert_eq!(first_row(vec![]), Value::Null);

        let stripped = without_credential(rows[0].clone());
        assert!(!stripped.contains_key("Contraseña"));
    }
}

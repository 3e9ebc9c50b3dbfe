use core::str::FromStr;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use utoipa::ToSchema;

use twitacad_core::DomainError;
use twitacad_infra::gateway::GatewayError;

/// Gateway failures never leak driver detail to the client.
pub fn gateway_error_to_response(err: GatewayError) -> axum::response::Response {
    tracing::error!(error = %err, "procedure call failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "database_error", "database error")
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

/// Body of every error response produced by a handler.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(ErrorResponse {
            error: code.to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}

pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse::<T>().map_err(domain_error_to_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use twitacad_core::UsuarioId;

    #[test]
    fn gateway_errors_are_opaque_500s() {
        let res = gateway_error_to_response(GatewayError::Connection {
            operation: "connect",
            message: "refused".into(),
        });
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn parse_id_maps_to_bad_request() {
        assert_eq!(parse_id::<UsuarioId>("12").unwrap(), UsuarioId::new(12));
        let res = parse_id::<UsuarioId>("abc").unwrap_err();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

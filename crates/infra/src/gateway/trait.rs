use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use twitacad_core::{NOT_FOUND_MARKER, TweetId, UsuarioId};

use super::procedure::Procedure;

/// One result row: column name → value, in column order.
pub type Row = serde_json::Map<String, Value>;

/// Rows of a procedure's result set, in the order the procedure produced them.
pub type ResultSet = Vec<Row>;

/// A positional procedure argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcParam {
    Int(i64),
    Text(String),
    Null,
}

impl From<i64> for ProcParam {
    fn from(value: i64) -> Self {
        ProcParam::Int(value)
    }
}

impl From<UsuarioId> for ProcParam {
    fn from(value: UsuarioId) -> Self {
        ProcParam::Int(value.get())
    }
}

impl From<TweetId> for ProcParam {
    fn from(value: TweetId) -> Self {
        ProcParam::Int(value.get())
    }
}

impl From<String> for ProcParam {
    fn from(value: String) -> Self {
        ProcParam::Text(value)
    }
}

impl From<&str> for ProcParam {
    fn from(value: &str) -> Self {
        ProcParam::Text(value.to_string())
    }
}

impl<T: Into<ProcParam>> From<Option<T>> for ProcParam {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ProcParam::Null)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("procedure {procedure} expects {expected} parameters, got {actual}")]
    Arity {
        procedure: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid parameter {index} for {procedure}: {message}")]
    Param {
        procedure: &'static str,
        index: usize,
        message: String,
    },

    #[error("database error in {procedure}: {message}")]
    Database {
        procedure: &'static str,
        message: String,
    },

    #[error("connection error in {operation}: {message}")]
    Connection {
        operation: &'static str,
        message: String,
    },

    #[error("failed to decode row from {procedure}: {message}")]
    Decode {
        procedure: &'static str,
        message: String,
    },
}

impl GatewayError {
    pub fn database(procedure: Procedure, message: impl Into<String>) -> Self {
        Self::Database {
            procedure: procedure.name(),
            message: message.into(),
        }
    }
}

/// Outcome of a procedure that reports absence through the not-found marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// First row of the set, which does not carry the marker.
    Found(Row),
    /// The raw result set as returned (usually a single marker row).
    NotFound(ResultSet),
}

impl Lookup {
    /// Translate a raw result set into a lookup.
    ///
    /// An empty set counts as not found.
    pub fn from_result_set(mut rows: ResultSet) -> Self {
        match rows.first() {
            Some(first) if !first.contains_key(NOT_FOUND_MARKER) => Lookup::Found(rows.swap_remove(0)),
            _ => Lookup::NotFound(rows),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Executes named stored procedures.
///
/// This is the only path from the HTTP layer to persistence. Implementations
/// must reject calls whose parameter count does not match the procedure.
#[async_trait::async_trait]
pub trait ProcedureGateway: Send + Sync {
    async fn call(&self, procedure: Procedure, params: Vec<ProcParam>) -> Result<ResultSet, GatewayError>;

    /// Call a procedure and translate the not-found marker into [`Lookup`].
    async fn lookup(&self, procedure: Procedure, params: Vec<ProcParam>) -> Result<Lookup, GatewayError> {
        self.call(procedure, params).await.map(Lookup::from_result_set)
    }
}

#[async_trait::async_trait]
impl<G> ProcedureGateway for Arc<G>
where
    G: ProcedureGateway + ?Sized,
{
    async fn call(&self, procedure: Procedure, params: Vec<ProcParam>) -> Result<ResultSet, GatewayError> {
        (**self).call(procedure, params).await
    }

    async fn lookup(&self, procedure: Procedure, params: Vec<ProcParam>) -> Result<Lookup, GatewayError> {
        (**self).lookup(procedure, params).await
    }
}

pub(crate) fn check_arity(procedure: Procedure, params: &[ProcParam]) -> Result<(), GatewayError> {
    if params.len() != procedure.arity() {
        return Err(GatewayError::Arity {
            procedure: procedure.name(),
            expected: procedure.arity(),
            actual: params.len(),
        });
    }
    Ok(())
}

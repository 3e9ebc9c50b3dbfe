//! MySQL-backed procedure gateway.
//!
//! Every call is a single prepared `CALL name(?, ...)` on a pooled
//! connection. Only the first result set is kept. Rows are decoded column by
//! column into JSON using the column's declared type; the procedures own the
//! shape of their result sets.
//!
//! ## Error Mapping
//!
//! | SQLx Error | GatewayError |
//! |------------|--------------|
//! | Database (any server error, e.g. 1062 duplicate entry, 1452 foreign key) | `Database` |
//! | PoolClosed / PoolTimedOut / Io / Tls | `Connection` |
//! | ColumnDecode / Decode | `Decode` |
//! | Other | `Database` |

use serde_json::Value;
use sqlx::Either;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use tokio_stream::StreamExt;
use tracing::instrument;

use super::procedure::Procedure;
use super::r#trait::{GatewayError, ProcParam, ProcedureGateway, ResultSet, Row, check_arity};

/// Procedure gateway over a `sqlx` MySQL pool.
///
/// The pool is `Send + Sync` and handles its own connection concurrency; this
/// type adds no locking of its own.
#[derive(Clone)]
pub struct MySqlGateway {
    pool: MySqlPool,
}

impl MySqlGateway {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, GatewayError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }
}

#[async_trait::async_trait]
impl ProcedureGateway for MySqlGateway {
    #[instrument(skip(self, params), fields(procedure = procedure.name()))]
    async fn call(&self, procedure: Procedure, params: Vec<ProcParam>) -> Result<ResultSet, GatewayError> {
        check_arity(procedure, &params)?;

        let sql = procedure.call_sql();
        let mut query = sqlx::query(&sql);
        for param in params {
            query = match param {
                ProcParam::Int(v) => query.bind(v),
                ProcParam::Text(v) => query.bind(v),
                ProcParam::Null => query.bind(None::<String>),
            };
        }

        // A CALL answers with one or more result sets followed by a status;
        // only the first set is the procedure's answer. The stream is drained
        // so the connection goes back to the pool clean.
        #[allow(deprecated)]
        let mut stream = query.fetch_many(&self.pool);
        let mut first = FirstResultSet::default();
        while let Some(item) = stream.next().await {
            first.push(item.map_err(|e| map_sqlx_error(procedure.name(), e))?);
        }

        let rows = first.into_rows();
        tracing::debug!(rows = rows.len(), "procedure returned");
        rows.iter().map(|row| row_to_json(procedure, row)).collect()
    }
}

/// Keeps the rows of the first result set in a multi-result response.
///
/// `Either::Left` items are the end-of-set markers; every row after the first
/// one is ignored.
struct FirstResultSet<R> {
    rows: Vec<R>,
    closed: bool,
}

impl<R> Default for FirstResultSet<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            closed: false,
        }
    }
}

impl<R> FirstResultSet<R> {
    fn push<D>(&mut self, item: Either<D, R>) {
        match item {
            Either::Left(_) => self.closed = true,
            Either::Right(row) if !self.closed => self.rows.push(row),
            Either::Right(_) => {}
        }
    }

    fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

fn row_to_json(procedure: Procedure, row: &MySqlRow) -> Result<Row, GatewayError> {
    let mut out = Row::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name()).map_err(|e| {
            GatewayError::Decode {
                procedure: procedure.name(),
                message: format!("column {}: {e}", column.name()),
            }
        })?;
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How a column is read, chosen from its declared MySQL type name.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ColumnKind {
    Bool,
    Int,
    Unsigned,
    Float,
    Double,
    Date,
    Time,
    DateTime,
    Timestamp,
    Json,
    /// DECIMAL travels as text in the binary protocol; text and anything
    /// unrecognised is read the same way.
    Text,
}

impl ColumnKind {
    fn of(type_name: &str) -> Self {
        match type_name {
            "BOOLEAN" => Self::Bool,
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => Self::Int,
            "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED" | "BIGINT UNSIGNED" => {
                Self::Unsigned
            }
            "FLOAT" => Self::Float,
            "DOUBLE" => Self::Double,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "DATETIME" => Self::DateTime,
            "TIMESTAMP" => Self::Timestamp,
            "JSON" => Self::Json,
            _ => Self::Text,
        }
    }
}

fn datetime_to_json(value: chrono::NaiveDateTime) -> Value {
    Value::from(value.format(DATETIME_FORMAT).to_string())
}

fn decode_column(row: &MySqlRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match ColumnKind::of(type_name) {
        ColumnKind::Bool => Value::Bool(row.try_get::<bool, _>(idx)?),
        ColumnKind::Int => Value::from(row.try_get::<i64, _>(idx)?),
        ColumnKind::Unsigned => Value::from(row.try_get::<u64, _>(idx)?),
        ColumnKind::Float => Value::from(f64::from(row.try_get::<f32, _>(idx)?)),
        ColumnKind::Double => Value::from(row.try_get::<f64, _>(idx)?),
        ColumnKind::Date => Value::from(row.try_get::<chrono::NaiveDate, _>(idx)?.to_string()),
        ColumnKind::Time => Value::from(row.try_get::<chrono::NaiveTime, _>(idx)?.to_string()),
        ColumnKind::DateTime => datetime_to_json(row.try_get::<chrono::NaiveDateTime, _>(idx)?),
        ColumnKind::Timestamp => Value::from(row.try_get::<chrono::DateTime<chrono::Utc>, _>(idx)?.to_rfc3339()),
        ColumnKind::Json => row.try_get::<Value, _>(idx)?,
        ColumnKind::Text => match row.try_get_unchecked::<String, _>(idx) {
            Ok(s) => Value::from(s),
            Err(_) => Value::from(String::from_utf8_lossy(&row.try_get_unchecked::<Vec<u8>, _>(idx)?).into_owned()),
        },
    };

    Ok(value)
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> GatewayError {
    match err {
        sqlx::Error::Database(db_err) => {
            let message = match db_err.code() {
                Some(code) => format!("[{}] {}", code, db_err.message()),
                None => db_err.message().to_string(),
            };
            GatewayError::Database {
                procedure: operation,
                message,
            }
        }
        sqlx::Error::PoolClosed => GatewayError::Connection {
            operation,
            message: "connection pool closed".to_string(),
        },
        sqlx::Error::PoolTimedOut => GatewayError::Connection {
            operation,
            message: "timed out acquiring a connection".to_string(),
        },
        sqlx::Error::Io(e) => GatewayError::Connection {
            operation,
            message: e.to_string(),
        },
        sqlx::Error::Tls(e) => GatewayError::Connection {
            operation,
            message: e.to_string(),
        },
        e @ (sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_)) => GatewayError::Decode {
            procedure: operation,
            message: e.to_string(),
        },
        other => GatewayError::Database {
            procedure: operation,
            message: other.to_string(),
        },
    }
}

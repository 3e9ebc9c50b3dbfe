//! Stored-procedure gateway: the single boundary between the API and the database.
//!
//! Handlers never build SQL. They name a [`Procedure`], pass positional
//! [`ProcParam`]s, and receive rows back as JSON objects.

pub mod in_memory;
pub mod mysql;
pub mod procedure;
pub mod r#trait;

pub use in_memory::InMemoryGateway;
pub use mysql::MySqlGateway;
pub use procedure::Procedure;
pub use r#trait::{GatewayError, Lookup, ProcParam, ProcedureGateway, ResultSet, Row};

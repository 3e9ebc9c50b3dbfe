//! `twitacad-core`: domain records shared by the gateway and the HTTP layer.
//!
//! Nothing in here performs IO. The database owns every invariant; these types
//! only give names and shapes to what crosses the procedure boundary.

pub mod error;
pub mod id;
pub mod relations;
pub mod tweet;
pub mod usuario;

pub use error::DomainError;
pub use id::{TweetId, UsuarioId};
pub use relations::{Like, Seguidor};
pub use tweet::Tweet;
pub use usuario::Usuario;

/// Column carried by a result row when a procedure reports "not found" as data.
pub const NOT_FOUND_MARKER: &str = "Respuesta";

//! `twitacad-auth`: bearer-token verification boundary.
//!
//! Tokens are minted by an external identity service. This crate only decodes
//! them and checks their claims; it knows nothing about HTTP or storage.

pub mod claims;
pub mod jwt;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};

//! Strongly-typed identifiers used across the domain.
//!
//! Ids are assigned by the database (auto increment). The value `0` is the
//! sentinel the combined create/update procedures interpret as "create".

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

/// Identifier of a user (`idUsuario`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UsuarioId(i64);

/// Identifier of a tweet (`idTweet`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TweetId(i64);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Sentinel passed to combined create/update procedures to request a create.
            pub const NEW: Self = Self(0);

            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn get(&self) -> i64 {
                self.0
            }

            pub fn is_new(&self) -> bool {
                self.0 == 0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = i64::from_str(s.trim())
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                if value < 0 {
                    return Err(DomainError::invalid_id(format!("{}: must not be negative", $name)));
                }
                Ok(Self(value))
            }
        }
    };
}

impl_int_newtype!(UsuarioId, "UsuarioId");
impl_int_newtype!(TweetId, "TweetId");

//! Infrastructure layer: database gateway and configuration.

pub mod config;
pub mod gateway;

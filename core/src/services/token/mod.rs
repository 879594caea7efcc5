//! Token service module for JWT management
//!
//! This module handles all token-related operations:
//! - Signing key and algorithm resolution from configuration
//! - Issuing tokens with `iat`/`exp` and optional `iss`/`aud`
//! - Validating tokens and classifying failures as expired, invalid claims
//!   or invalid token

mod clock;
mod config;
mod key_material;
mod options;
mod service;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, OffsetClock, SystemClock};
pub use config::TokenServiceConfig;
pub use key_material::{parse_algorithms, signing_key, SigningMaterial};
pub use options::{DecodeOptions, IssueOptions, DEFAULT_LEEWAY_SECONDS};
pub use service::TokenService;

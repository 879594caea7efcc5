//! Shared utilities and common types for the Token Gate server
//!
//! This crate provides common functionality used across all server modules:
//! - Settings loading and configuration types
//! - Error response structures
//! - Tracing setup
//! - Common type definitions

pub mod config;
pub mod errors;
pub mod logging;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    get_settings, AppConfig, ConfigError, Environment, JwtConfig, LogFormat, LoggingConfig,
    OneOrMany, SecretValue, ServerConfig, Settings,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use logging::{init_tracing, LoggingError};
pub use types::{HealthResponse, HealthStatus};

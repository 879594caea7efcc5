//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{AuthError, TokenError};

use tg_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Signing key or algorithm configuration is unusable; not recoverable per request
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl DomainError {
    /// Shorthand for a configuration failure
    pub fn configuration(message: impl Into<String>) -> Self {
        DomainError::Configuration { message: message.into() }
    }

    /// Stable code for API clients
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Configuration { .. } => error_codes::CONFIGURATION_ERROR,
            DomainError::Token(e) => e.error_code(),
            DomainError::Auth(e) => e.error_code(),
        }
    }

    /// Whether this is one of the per-request authentication failures
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            DomainError::Token(
                TokenError::TokenExpired | TokenError::TokenInvalid | TokenError::ClaimsInvalid { .. }
            )
        )
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            // Configuration detail stays in the logs
            DomainError::Configuration { .. } => {
                ErrorResponse::new(self.error_code(), "Internal server error")
            }
            _ => ErrorResponse::new(self.error_code(), self.to_string()),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

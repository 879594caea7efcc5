//! Token and authorization error types
//!
//! Messages are the ones surfaced to clients, so they must not carry
//! cryptographic detail. Only [`TokenError::ClaimsInvalid`] echoes the
//! validation detail.

use tg_shared::errors::{error_codes, ErrorResponse};
use thiserror::Error;

/// Token issuance and validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature is valid but `exp` has passed beyond the leeway
    #[error("Token expired")]
    TokenExpired,

    /// A claim failed validation (issuer, audience, timestamps)
    #[error("Invalid token claims: {detail}")]
    ClaimsInvalid { detail: String },

    /// Any other decode failure: tampered, wrong key, malformed, unaccepted algorithm
    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token signing failed")]
    SigningFailed,
}

impl TokenError {
    /// Stable code for API clients
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
            TokenError::ClaimsInvalid { .. } => error_codes::CLAIMS_INVALID,
            TokenError::TokenInvalid => error_codes::TOKEN_INVALID,
            TokenError::SigningFailed => error_codes::TOKEN_SIGNING_FAILED,
        }
    }

    /// Shorthand for a claims validation failure
    pub fn claims_invalid(detail: impl Into<String>) -> Self {
        TokenError::ClaimsInvalid { detail: detail.into() }
    }
}

/// Authorization errors raised after a token has been accepted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Token carries no usable `sub`
    #[error("Invalid token payload")]
    MissingSubject,

    #[error("Access forbidden: insufficient role")]
    InsufficientRole,

    #[error("Forbidden")]
    PermissionDenied { permission: String },
}

impl AuthError {
    /// Stable code for API clients
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingSubject => error_codes::INVALID_TOKEN_PAYLOAD,
            AuthError::InsufficientRole | AuthError::PermissionDenied { .. } => {
                error_codes::FORBIDDEN
            }
        }
    }
}

impl From<TokenError> for ErrorResponse {
    fn from(error: TokenError) -> Self {
        ErrorResponse::new(error.error_code(), error.to_string())
    }
}

impl From<AuthError> for ErrorResponse {
    fn from(error: AuthError) -> Self {
        ErrorResponse::new(error.error_code(), error.to_string())
    }
}

//! Unit tests for domain error types

use crate::errors::{AuthError, DomainError, TokenError};
use tg_shared::errors::{ErrorResponse, IntoErrorResponse};

#[test]
fn test_token_error_messages() {
    assert_eq!(TokenError::TokenExpired.to_string(), "Token expired");
    assert_eq!(TokenError::TokenInvalid.to_string(), "Invalid token");
    assert_eq!(
        TokenError::claims_invalid("Invalid issuer").to_string(),
        "Invalid token claims: Invalid issuer"
    );
}

#[test]
fn test_token_error_conversion() {
    let response: ErrorResponse = TokenError::TokenExpired.into();
    assert_eq!(response.error, "TOKEN_EXPIRED");
    assert_eq!(response.message, "Token expired");
}

#[test]
fn test_domain_error_bridges_token_error() {
    let error: DomainError = TokenError::TokenInvalid.into();
    assert_eq!(error.to_string(), "Invalid token");
    assert_eq!(error.error_code(), "TOKEN_INVALID");
    assert!(error.is_authentication_failure());
}

#[test]
fn test_claims_invalid_is_authentication_failure() {
    let error: DomainError = TokenError::claims_invalid("aud").into();
    assert!(error.is_authentication_failure());
    assert_eq!(error.error_code(), "CLAIMS_INVALID");
}

#[test]
fn test_configuration_error_hides_detail_in_response() {
    let error = DomainError::configuration("SECRET_KEY is missing or invalid");
    assert!(!error.is_authentication_failure());
    assert!(error.to_string().contains("SECRET_KEY"));

    let response = error.to_error_response();
    assert_eq!(response.error, "CONFIGURATION_ERROR");
    assert!(!response.message.contains("SECRET_KEY"));
}

#[test]
fn test_auth_error_codes() {
    let missing: DomainError = AuthError::MissingSubject.into();
    assert_eq!(missing.error_code(), "INVALID_TOKEN_PAYLOAD");
    assert_eq!(missing.to_string(), "Invalid token payload");

    let forbidden: DomainError = AuthError::InsufficientRole.into();
    assert_eq!(forbidden.error_code(), "FORBIDDEN");
    assert!(!forbidden.is_authentication_failure());
}

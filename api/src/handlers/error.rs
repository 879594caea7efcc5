//! Mapping of domain errors onto HTTP responses
//!
//! Authentication failures answer `401` with a `WWW-Authenticate: Bearer`
//! challenge. Role failures answer `403`, a token without a subject `400`,
//! and unusable signing configuration `500`. Bodies are the shared
//! [`ErrorResponse`] JSON.

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use thiserror::Error;

use tg_core::errors::{AuthError, DomainError, TokenError};
use tg_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// Challenge sent with every authentication failure
pub const BEARER_CHALLENGE: &str = "Bearer";

/// Errors returned by handlers and middleware
#[derive(Error, Debug)]
pub enum ApiError {
    /// No usable `Authorization: Bearer` header
    #[error("Not authenticated")]
    MissingCredentials,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        ApiError::Domain(error.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        ApiError::Domain(error.into())
    }
}

impl ApiError {
    /// Whether the response carries a bearer challenge
    pub fn is_challenge(&self) -> bool {
        match self {
            ApiError::MissingCredentials => true,
            ApiError::Domain(error) => error.is_authentication_failure(),
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::MissingCredentials => {
                ErrorResponse::new(error_codes::UNAUTHORIZED, self.to_string())
            }
            ApiError::Domain(error) => error.to_error_response(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Domain(DomainError::Configuration { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Domain(DomainError::Token(TokenError::SigningFailed)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Domain(DomainError::Token(_)) => StatusCode::UNAUTHORIZED,
            ApiError::Domain(DomainError::Auth(AuthError::MissingSubject)) => StatusCode::BAD_REQUEST,
            ApiError::Domain(DomainError::Auth(_)) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let mut response = HttpResponse::build(status);
        if self.is_challenge() {
            response.insert_header((header::WWW_AUTHENTICATE, BEARER_CHALLENGE));
        }
        response.json(self.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(error: &ApiError) -> Option<String> {
        error
            .error_response()
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok())
            .map(String::from)
    }

    #[test]
    fn test_authentication_failures_are_challenged() {
        let failures = [
            ApiError::MissingCredentials,
            ApiError::from(TokenError::TokenExpired),
            ApiError::from(TokenError::TokenInvalid),
            ApiError::from(TokenError::claims_invalid("Invalid audience")),
        ];

        for error in &failures {
            assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED, "{}", error);
            assert_eq!(challenge(error).as_deref(), Some("Bearer"), "{}", error);
        }
    }

    #[test]
    fn test_role_failures_are_forbidden_without_challenge() {
        let error = ApiError::from(AuthError::InsufficientRole);

        assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(challenge(&error), None);
    }

    #[test]
    fn test_missing_subject_is_bad_request() {
        let error = ApiError::from(AuthError::MissingSubject);

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "Invalid token payload");
    }

    #[test]
    fn test_configuration_error_hides_detail() {
        let error = ApiError::from(DomainError::configuration("SECRET_KEY is missing or invalid"));

        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.body().message, "Internal server error");
        assert_eq!(error.body().error, error_codes::CONFIGURATION_ERROR);
        assert_eq!(challenge(&error), None);
    }

    #[test]
    fn test_body_carries_error_code() {
        let body = ApiError::from(TokenError::TokenExpired).body();

        assert_eq!(body.error, error_codes::TOKEN_EXPIRED);
        assert_eq!(body.message, "Token expired");
    }
}

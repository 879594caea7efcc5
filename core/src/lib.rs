//! # Token Gate Core
//!
//! Domain layer for the token gate: the claims model, the error taxonomy,
//! the token service that issues and validates signed tokens, and the role
//! checks applied to accepted claims.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    Claims, CLAIM_AUDIENCE, CLAIM_EXPIRES_AT, CLAIM_ISSUED_AT, CLAIM_ISSUER, CLAIM_NOT_BEFORE,
    CLAIM_ROLES, CLAIM_SUBJECT,
};
pub use errors::{AuthError, DomainError, DomainResult, TokenError};
pub use services::authorization::{require_any_role, subject, Rbac};
pub use services::token::{
    Clock, DecodeOptions, FixedClock, IssueOptions, OffsetClock, SystemClock, TokenService,
    TokenServiceConfig,
};

//! Domain entities.

pub mod token;

// Re-export commonly used types
pub use token::{
    Claims, CLAIM_AUDIENCE, CLAIM_EXPIRES_AT, CLAIM_ISSUED_AT, CLAIM_ISSUER, CLAIM_NOT_BEFORE, CLAIM_ROLES,
    CLAIM_SUBJECT,
};

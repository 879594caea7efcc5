//! Business services containing domain logic and use cases.

pub mod authorization;
pub mod token;

// Re-export commonly used types
pub use authorization::{require_any_role, subject, Rbac};
pub use token::{
    Clock, DecodeOptions, IssueOptions, SystemClock, TokenService, TokenServiceConfig,
};

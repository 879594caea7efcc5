pub mod auth;
pub mod jwt_context;

pub use auth::*;
pub use jwt_context::*;

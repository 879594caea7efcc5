pub mod error;

pub use error::{ApiError, BEARER_CHALLENGE};

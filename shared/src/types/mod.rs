//! Type definitions shared by the service crates

pub mod response;

pub use response::{HealthResponse, HealthStatus};

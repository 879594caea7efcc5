//! Authentication route handlers

pub mod me;

pub use me::{me, MeResponse};

//! HTTP adapter for the token service: bearer authentication middleware,
//! error mapping and a couple of routes.

pub mod app;
pub mod handlers;
pub mod middleware;
pub mod routes;

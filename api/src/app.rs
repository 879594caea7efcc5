//! Application state and route configuration

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use tg_core::services::token::TokenService;
use tg_shared::errors::{error_codes, ErrorResponse};

use crate::middleware::auth::JwtAuth;
use crate::routes::{auth, health};

/// State shared by all workers
pub struct AppState {
    pub service_name: String,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(service_name: impl Into<String>, tokens: Arc<TokenService>) -> Self {
        Self {
            service_name: service_name.into(),
            tokens,
        }
    }
}

/// Registers the state and every route
///
/// `/api/v1/auth/*` sits behind [`JwtAuth`]; `/health` is public.
pub fn routes(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let tokens = Arc::clone(&state.tokens);
        cfg.app_data(state)
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/api/v1").service(
                    web::scope("/auth")
                        .wrap(JwtAuth::new(tokens))
                        .route("/me", web::get().to(auth::me)),
                ),
            );
    }
}

/// Default 404 handler
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}

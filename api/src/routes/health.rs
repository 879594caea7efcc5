use actix_web::{web, HttpResponse};
use tg_shared::types::HealthResponse;

use crate::app::AppState;

/// Handler for GET /health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy(
        state.service_name.as_str(),
        env!("CARGO_PKG_VERSION"),
    ))
}

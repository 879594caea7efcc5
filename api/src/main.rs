use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use tg_api::app::{self, AppState};
use tg_api::middleware::JwtContext;
use tg_core::services::token::{TokenService, TokenServiceConfig};
use tg_shared::config::get_settings;
use tg_shared::logging::init_tracing;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = get_settings().context("failed to load settings")?;

    if let Err(e) = init_tracing(&settings.logging) {
        eprintln!("tracing already initialized: {}", e);
    }

    tracing::info!(
        service = %settings.service_name,
        environment = %settings.environment,
        "starting server"
    );

    let config = TokenServiceConfig::from(&settings.auth);
    let tokens = match TokenService::eager(config.clone()) {
        Ok(service) => Arc::new(service),
        Err(error) => {
            // Keep serving; token operations will answer 500 until fixed
            tracing::error!(error = %error, "token service is not usable");
            Arc::new(TokenService::new(config))
        }
    };

    let state = web::Data::new(AppState::new(settings.service_name.clone(), tokens.clone()));
    let bind_address = settings.server.bind_address();
    tracing::info!(address = %bind_address, "binding");

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(JwtContext::new(tokens.clone()))
            .wrap(TracingLogger::default())
            .configure(app::routes(state.clone()))
            .default_service(web::route().to(app::not_found))
    });
    if settings.server.workers > 0 {
        server = server.workers(settings.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}

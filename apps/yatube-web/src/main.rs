//! # Yatube Web Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use yatube_infra::{Argon2PasswordService, DatabaseHandle, JwtTokenService};

mod config;
mod handlers;
mod middleware;
mod page_cache;
mod render;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting Yatube on {}:{}", config.host, config.port);

    let db = DatabaseHandle::init(&config.database)
        .await
        .map_err(std::io::Error::other)?;
    if config.run_migrations {
        db.run_migrations().await.map_err(std::io::Error::other)?;
    }

    let passwords =
        Argon2PasswordService::new(config.password.clone()).map_err(std::io::Error::other)?;

    let state = AppState::new(
        db.repositories(),
        Arc::new(JwtTokenService::new(config.jwt.clone())),
        Arc::new(passwords),
        config.site.clone(),
    );

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

//! # Yatube Web Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::HttpServer;

/// The full application: middleware, shared state, routes and the 404 fallback.
macro_rules! yatube_app {
    ($state:expr) => {
        actix_web::App::new()
            .wrap(actix_web::middleware::NormalizePath::new(
                actix_web::middleware::TrailingSlash::Always,
            ))
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(crate::observability::RequestIdMiddleware)
            .app_data(actix_web::web::Data::new($state))
            .configure(crate::handlers::configure_routes)
            .default_service(actix_web::web::to(crate::handlers::not_found))
    };
}

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_telemetry(&config.telemetry);
    config.warn_insecure_defaults();

    tracing::info!("Starting Yatube on {}:{}", config.host, config.port);

    let state = AppState::new(&config).await?;

    HttpServer::new(move || yatube_app!(state.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    Ok(())
}

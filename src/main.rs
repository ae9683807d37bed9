use actix_web::{App, HttpServer, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod model;
mod service;

use app::AppState;
use model::Config;

/// Largest accepted JSON body; inputs are capped well below this
const JSON_BODY_LIMIT: usize = 64 * 1024;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    let state = AppState::new(config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize application");
        std::io::Error::other(e)
    })?;

    let verification_service = web::Data::from(state.verification_service);

    tracing::info!("Starting Epistemic Verdict server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(verification_service.clone())
            .app_data(web::JsonConfig::default().limit(JSON_BODY_LIMIT))
            .configure(api::verify::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}

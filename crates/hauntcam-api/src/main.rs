//! Hauntcam API server entry point.

use std::error::Error;
use std::sync::Arc;

use hauntcam_api::config::ServerConfig;
use hauntcam_api::error::AppError;
use hauntcam_api::state::AppState;
use hauntcam_api::{build_router, telemetry};
use hauntcam_core::clock::SystemClock;
use hauntcam_gemini::GeminiClient;
use hauntcam_scenario::ScenarioStore;
use hauntcam_store::schema::MIGRATOR;
use hauntcam_store::{FsBlobStore, PgGameRepository, PgPhotoRepository};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting Hauntcam API server");

    let scenario = ScenarioStore::load(&config.scenario_dir)
        .map_err(|e| AppError::Config(format!("scenario content: {e}")))?;
    tracing::info!(
        chapters = scenario.chapters().count(),
        version = scenario.version_hash(),
        "scenario content loaded"
    );

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(AppError::from)?;
    MIGRATOR.run(&pool).await.map_err(AppError::from)?;

    let generative = GeminiClient::new(
        config.gemini_base_url.clone(),
        config.gemini_api_key.clone(),
        config.gemini_timeout,
    )
    .map_err(|e| AppError::Config(e.to_string()))?;

    // Build application state.
    let app_state = AppState {
        clock: Arc::new(SystemClock),
        games: Arc::new(PgGameRepository::new(pool.clone())),
        photos: Arc::new(PgPhotoRepository::new(pool)),
        blobs: Arc::new(FsBlobStore::new(
            config.blob_root.clone(),
            config.blob_public_base_url.clone(),
            config.blob_signing_secret.clone(),
        )),
        generative: Arc::new(generative),
        scenario: Arc::new(scenario),
        models: Arc::new(config.models.clone()),
        default_mode: config.default_mode,
    };

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(AppError::from)?;

    axum::serve(listener, app).await.map_err(AppError::from)?;

    telemetry.shutdown();
    Ok(())
}

//! Hauntcam API: axum routes, configuration, telemetry, and wiring.

pub mod config;
pub mod error;
pub(crate) mod relay;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;

use crate::state::AppState;

/// Builds the full application router over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::storage::blob_router())
        .nest(
            "/api/v1/games",
            routes::games::router().merge(routes::play::router()),
        )
        .nest("/api/v1/scenario", routes::scenario::router())
        .nest("/api/v1/generation", routes::generation::router())
        .nest("/api/v1/storage", routes::storage::router())
        .with_state(state)
}

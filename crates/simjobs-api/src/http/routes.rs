//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use simjobs_config::CorsConfig;
use tower_http::trace::TraceLayer;

use crate::error::InterfaceError;
use crate::http::cors::cors_layer;
use crate::http::monitoring;
use crate::job::routes as job_routes;
use crate::state::AppState;

/// Create the router.
///
/// ## Route Structure
///
/// ```text
/// GET    /                    - Welcome
/// POST   /start-simulation    - Submit simulation
/// GET    /simulations         - List simulations
/// GET    /simulations/{id}    - Get simulation
/// DELETE /simulations/{id}    - Delete simulation
///
/// GET    /livez               - Liveness probe
/// GET    /health              - Health with job and queue counters
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(monitoring::welcome))
        .route("/start-simulation", post(job_routes::start_simulation))
        .route("/simulations", get(job_routes::list_simulations))
        .route(
            "/simulations/{id}",
            get(job_routes::get_simulation).delete(job_routes::delete_simulation),
        )
        .route("/livez", get(monitoring::liveness_probe))
        .route("/health", get(monitoring::health_check))
        .with_state(state)
}

/// Create the router with request tracing and the CORS policy applied.
pub fn create_app(state: Arc<AppState>, cors: &CorsConfig) -> Result<Router, InterfaceError> {
    Ok(create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors)?))
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

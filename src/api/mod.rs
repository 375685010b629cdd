pub mod auth;
pub mod tasks;
pub mod timesheets;

use std::time::Duration;

use axum::middleware;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;

use crate::config::Config;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(timesheets::router())
        .merge(tasks::router())
}

/// The full application without transport concerns (tracing, CORS).
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", router())
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthzResponse {
    pub status: &'static str,
}

pub async fn healthz() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}

/// Stands in for the round trip to a real data store.
async fn simulate_latency(config: &Config) {
    if config.simulated_latency_ms > 0 {
        tokio::time::sleep(Duration::from_millis(config.simulated_latency_ms)).await;
    }
}

//! Liveness check, mounted at the root rather than under `/api/v1`.

use std::time::Instant;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok`, or `degraded` when the database does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub db_latency_ms: Option<u128>,
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let started = Instant::now();
    let db_check = edurank_db::health_check(&state.pool).await;
    if let Err(e) = &db_check {
        tracing::warn!(error = %e, "Database health check failed");
    }
    let db_healthy = db_check.is_ok();

    Json(HealthReport {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        db_latency_ms: db_healthy.then(|| started.elapsed().as_millis()),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

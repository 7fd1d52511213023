//! Liveness probe. The only route that skips authentication.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Liveness payload.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: bool,
    pub timestamp: DateTime<Utc>,
}

/// Reports process liveness and database reachability.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let database = state.db.health_check().await;

    Json(HealthStatus {
        status: if database { "ok" } else { "degraded" },
        database,
        timestamp: Utc::now(),
    })
}

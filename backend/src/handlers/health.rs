//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Health check endpoint handler
///
/// A broken database connection reports a degraded status instead of failing
/// the request, so load balancers can tell the two apart.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, db_status) = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => ("healthy", "connected"),
        Err(_) => ("degraded", "disconnected"),
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status.to_string(),
    })
}

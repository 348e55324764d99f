use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::common::helpers::now_timestamp;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: now_timestamp(),
    })
}

pub fn health_routes() -> Router {
    Router::new().route("/api/health", get(health))
}

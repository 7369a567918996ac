//! Health Endpoints
//!
//! Always reachable: their paths are in the admission exempt set.

use axum::{Json, Router, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;

const SERVICE_NAME: &str = "rag-chat-storage";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: &'static str,
}

/// GET /api/v1/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP",
        timestamp: Utc::now(),
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/v1/health/ping
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse { message: "pong" })
}

/// Mount under `/api/v1/health`.
pub fn health_router() -> Router {
    Router::new()
        .route("/", get(health))
        .route("/ping", get(ping))
}

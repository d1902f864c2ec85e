//! System endpoints: health check and vote vocabulary.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::VOTE_POINTS;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// Vote vocabulary response.
#[derive(Debug, Serialize, ToSchema)]
pub struct PointsResponse {
    points: Vec<String>,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /config/points`: Card values offered to voters.
#[utoipa::path(
    get,
    path = "/config/points",
    tag = "System",
    summary = "List vote values",
    description = "Returns the fixed card deck clients render. The server accepts any string as a vote.",
    responses(
        (status = 200, description = "Vote vocabulary", body = PointsResponse),
    )
)]
pub async fn points_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(PointsResponse {
            points: VOTE_POINTS.iter().map(ToString::to_string).collect(),
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/points", get(points_handler))
}

//! Liveness and readiness endpoints

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use database::mongodb::{HealthStatus, check_health};
use serde::Serialize;
use tracing::{debug, warn};
use utoipa::{OpenApi, ToSchema};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(liveness, readiness),
    components(schemas(HealthResponse, ReadyResponse)),
    tags((name = "Health", description = "Liveness and readiness probes"))
)]
pub struct HealthApiDoc;

/// Liveness body: the process is up and serving
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: &'static str,
    #[schema(example = "todo_api")]
    pub name: &'static str,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
}

/// Readiness body: result of pinging MongoDB
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// `ready` or `not ready`
    #[schema(example = "ready")]
    pub status: &'static str,
    /// `connected` or `disconnected`
    #[schema(example = "connected")]
    pub mongodb: &'static str,
    /// Ping round trip
    pub response_time_ms: u64,
    /// Driver error when the ping failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReadyResponse {
    fn from_ping(status: HealthStatus) -> (StatusCode, Self) {
        if status.healthy {
            return (
                StatusCode::OK,
                Self {
                    status: "ready",
                    mongodb: "connected",
                    response_time_ms: status.response_time_ms,
                    error: None,
                },
            );
        }

        (
            StatusCode::SERVICE_UNAVAILABLE,
            Self {
                status: "not ready",
                mongodb: "disconnected",
                response_time_ms: status.response_time_ms,
                error: Some(status.message.unwrap_or_else(|| "ping failed".to_string())),
            },
        )
    }
}

/// Create the `/health` and `/ready` router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(liveness))
        .route("/ready", get(readiness))
        .with_state(state)
}

/// Liveness check, always 200 while the process serves requests
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
async fn liveness(State(state): State<AppState>) -> Json<HealthResponse> {
    let app = &state.config.app;
    Json(HealthResponse {
        status: "healthy",
        name: app.name,
        version: app.version,
    })
}

/// Readiness check, 503 until MongoDB answers a ping
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Health",
    responses(
        (status = 200, description = "MongoDB reachable", body = ReadyResponse),
        (status = 503, description = "MongoDB unreachable", body = ReadyResponse)
    )
)]
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let ping = check_health(&state.mongo_client).await;
    debug!(
        healthy = ping.healthy,
        response_time_ms = ping.response_time_ms,
        "MongoDB ping"
    );

    let (status, body) = ReadyResponse::from_ping(ping);
    if let Some(error) = &body.error {
        warn!(error = %error, "Readiness check failed");
    }
    (status, Json(body))
}

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use scaffold_health::{HealthCheckResult, HealthChecks};

type HealthResponse = (StatusCode, Json<HealthCheckResult>);

fn respond(result: HealthCheckResult) -> HealthResponse {
    let status = if result.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(result))
}

/// Full health check
///
/// Heap, resident memory and disk usage against their thresholds.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Every indicator is up"),
        (status = 503, description = "At least one indicator is down")
    )
)]
pub async fn check(State(health): State<Arc<HealthChecks>>) -> HealthResponse {
    respond(health.full.run().await)
}

/// Readiness probe
///
/// Whether the service can reach the network and accept traffic.
#[utoipa::path(
    get,
    path = "/api/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Ready to accept traffic"),
        (status = 503, description = "Not ready")
    )
)]
pub async fn readiness(State(health): State<Arc<HealthChecks>>) -> HealthResponse {
    respond(health.readiness.run().await)
}

/// Liveness probe
///
/// Only checks heap usage to make sure the process has not run away.
#[utoipa::path(
    get,
    path = "/api/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive"),
        (status = 503, description = "Process should be restarted")
    )
)]
pub async fn liveness(State(health): State<Arc<HealthChecks>>) -> HealthResponse {
    respond(health.liveness.run().await)
}

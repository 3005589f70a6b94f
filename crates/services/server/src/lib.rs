use std::sync::Arc;

use axum::{extract::FromRef, Router};
use scaffold_health::HealthChecks;
use tower_http::{normalize_path::NormalizePath, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

pub mod routes;

/// Prefix every API route is mounted under
pub static API_PREFIX: &str = "/api";

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<HealthChecks>,
}

impl FromRef<AppState> for Arc<HealthChecks> {
    fn from_ref(state: &AppState) -> Self {
        state.health.clone()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::root::root,
        routes::health::check,
        routes::health::readiness,
        routes::health::liveness,
    ),
    tags(
        (name = "Misc", description = "Example routes."),
        (name = "Health", description = "Readiness and liveness probes.")
    ),
    components(
        schemas(
            scaffold_result::Error,
            scaffold_result::ErrorType,
            scaffold_models::v0::Example,
        )
    ),
)]
pub struct ApiDoc;

/// Build the application: the API under `/api`, pages everywhere else
///
/// Trailing slashes are trimmed before routing, so `/api/` is the API root
/// and `/api/health/` is the full health check.
pub fn app(state: AppState, client: &scaffold_config::Client) -> NormalizePath<Router> {
    let api = Router::new()
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(routes::router())
        .with_state(state);

    let router = Router::new()
        .nest(API_PREFIX, api)
        .fallback_service(scaffold_client::router(client))
        .layer(TraceLayer::new_for_http());

    NormalizePath::trim_trailing_slash(router)
}

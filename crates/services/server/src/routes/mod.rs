use crate::AppState;
use axum::routing::{get, Router};
use scaffold_result::{create_error, Error};

pub mod health;
pub mod root;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::check))
        .route("/health/ready", get(health::readiness))
        .route("/health/live", get(health::liveness))
        .fallback(not_found)
}

/// Unknown API routes answer with an API error rather than a page
async fn not_found() -> Error {
    create_error!(NotFound)
}

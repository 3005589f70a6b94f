use std::sync::Arc;

use axum::{extract::Request, ServiceExt};
use scaffold_health::{HealthChecks, SystemProbe, TrackingAllocator};
use scaffold_server::AppState;
use tokio::net::TcpListener;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Configure logging and environment
    scaffold_config::configure!(server);

    let config = scaffold_config::config().await;
    let health = HealthChecks::from_settings(&config.health, Arc::new(SystemProbe))
        .map_err(std::io::Error::other)?;

    // Configure Axum and router
    let app = scaffold_server::app(
        AppState {
            health: Arc::new(health),
        },
        &config.client,
    );

    // Configure TCP listener and bind
    let port = config.server.port;
    let listener = TcpListener::bind((config.server.host.as_str(), port)).await?;

    tracing::info!("Ready on http://localhost:{port}");
    tracing::info!("Play around with the API: http://localhost:{port}/api/scalar");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .await
        .inspect_err(|err| scaffold_config::capture_error(err))
}

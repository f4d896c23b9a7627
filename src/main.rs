//! CodeArena - Application Entry Point
//!
//! This is the main entry point for the CodeArena server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codearena::{
    catalog::HttpProblemCatalog,
    config::CONFIG,
    execution::HttpExecutionClient,
    handlers,
    services::CleanupService,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CodeArena server...");

    // Wire up the external collaborators
    let catalog = Arc::new(HttpProblemCatalog::new(CONFIG.catalog.url.clone()));
    let executor = Arc::new(HttpExecutionClient::new(
        CONFIG.execution.url.clone(),
        CONFIG.execution.timeout_ms,
    ));

    // Create application state
    let state = AppState::new(catalog, executor, CONFIG.clone());

    // Start the background room sweeper
    CleanupService::spawn(state.clone());

    // Build the router
    let app = Router::new()
        .nest("/api/v1", handlers::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

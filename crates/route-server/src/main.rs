//! Route Server - backend for the delivery route map

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use route_server::config::Config;
use route_server::loops;
use route_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("route_server=debug".parse()?))
        .init();

    tracing::info!("Starting Route Server...");

    let config = Config::from_env();
    let port = config.server_port;
    tracing::info!(
        "Proximity threshold {}m, up to {} waypoints",
        config.proximity_threshold_m,
        config.max_waypoints
    );

    let (state, samples) = AppState::new(config)?;
    let state = Arc::new(state);
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    // Start background loops
    let position_loop = tokio::spawn(loops::position_loop::run_position_loop(
        state.clone(),
        samples,
        shutdown_tx.subscribe(),
    ));

    // Build the app
    let app = route_server::api::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    tracing::info!("Shutting down");
    let _ = shutdown_tx.send(());
    position_loop.await?;

    Ok(())
}

//! fox-gateway - HTTP gateway for a FoxESS solar inverter
//!
//! This is the main entry point for the fox-gateway server.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use fox_gateway::{
    api::route_table,
    config::Config,
    gateway::Gateway,
    services::SimulatedInverter,
    state::AppState,
    create_router,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("fox_gateway={},tower_http=info", config.log_level()))
        .init();

    info!("Starting fox-gateway server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, simulated latency={}ms",
        config.host, config.port, config.latency_ms
    );

    let inverter = SimulatedInverter::new(config.simulator()?);
    let gateway = Gateway::new(Arc::new(inverter));
    let state = Arc::new(AppState::new(gateway, config.port, config.host.clone()));

    // Create HTTP router with all endpoints
    let app = create_router(state)?;

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    for route in route_table() {
        info!("  {:<4} {:<52} - {}", route.method, route.path, route.summary);
    }

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Signal handler failed: {}", e),
            }
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

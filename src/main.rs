//! Countdown Shelf - categorized countdown timers with a completion history
//!
//! This is the main entry point for the countdown-shelf server.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use countdown_shelf::{
    api::create_router,
    config::Config,
    state::AppState,
    storage::{hydrate, FileStore, KeyValueStore},
    tasks::{spawn_completion_log, PersistenceSync, TickDriver},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_shelf={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-shelf server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, data_dir={}, tick={}ms",
          config.host, config.port, config.data_dir.display(), config.tick_ms);

    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("Failed to create data directory {}", config.data_dir.display()))?;
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_dir));

    // Hydrate before anything can dispatch against the store
    let state = Arc::new(AppState::new());
    hydrate(&state, kv.as_ref()).await;

    let persistence = PersistenceSync::spawn(&state, Arc::clone(&kv));
    let completion_log = spawn_completion_log(&state);
    let ticker = TickDriver::spawn(Arc::clone(&state), config.tick_period());

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers                        - List timers by category");
    info!("  POST   /timers                        - Add a timer");
    info!("  POST   /timers/:id/toggle|reset       - Start/pause or reset a timer");
    info!("  DELETE /timers/:id                    - Delete a timer");
    info!("  POST   /categories/:name/start|pause|reset|collapse");
    info!("  GET    /history                       - Completed timers");
    info!("  GET    /notification, DELETE /notification");
    info!("  GET    /health                        - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    ticker.stop().await;
    persistence.shutdown(&state, kv.as_ref()).await;
    completion_log.abort();

    info!("Server shutdown complete");
    Ok(())
}

use std::sync::Arc;

use nsmirror_core::events::WatchBroadcaster;
use nsmirror_db_memory::MemoryStore;
use nsmirror_engine::Reconciler;
use nsmirror_server::config::Config;
use nsmirror_storage::{EventedStore, SecretStore};

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else).
    // This allows environment variables to be set from .env for local development.
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    nsmirror_server::observability::init_tracing();

    let (cfg, source) = match Config::load() {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        source_namespace = %cfg.source_namespace,
        source = %source,
        "Configuration loaded"
    );

    // All reads and writes go through the evented store so every change to
    // the source namespace lands on the watch feed the engine consumes.
    let broadcaster = Arc::new(WatchBroadcaster::new());
    let store: Arc<dyn SecretStore> =
        Arc::new(EventedStore::new(MemoryStore::new(), broadcaster.clone()));

    tracing::info!(backend = %store.backend_name(), "Store initialized");

    let receiver = broadcaster.subscribe();
    let reconciler = Reconciler::new(store, cfg.source_namespace);

    let engine = tokio::spawn(async move { reconciler.run(receiver).await });

    tokio::select! {
        _ = engine => {
            // The subscription terminated; supervision (restart) is the
            // operator's responsibility.
            tracing::info!("Watch subscription terminated, shutting down");
        }
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                eprintln!("Failed to listen for shutdown signal: {e}");
            }
            tracing::info!("Shutdown signal received");
        }
    }
}

use std::sync::Arc;

use anyhow::Result;
use signmeet_api::http::{router, AppState};
use signmeet_core::classifier::{Classifier, NullClassifier};
use signmeet_core::service::{
    CaptionPipeline, ChatService, ConnectionSessionTable, MessageHub, PresenceBroadcaster,
    RoomRegistry, SignalingRouter,
};
use signmeet_core::storage::{MemoryStorage, Storage};
use signmeet_core::{logging, Config};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}");
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize logging
    logging::init_logging(&config.logging)?;

    info!("SignMeet server starting...");

    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let classifier: Arc<dyn Classifier> = Arc::new(NullClassifier);
    if !classifier.is_loaded() {
        warn!("No classifier model configured; predictions will stay below the caption gate");
    }

    let registry = Arc::new(RoomRegistry::new(
        storage.clone(),
        config.rooms.default_max_participants,
    ));
    let connections = Arc::new(ConnectionSessionTable::new());
    let hub = Arc::new(MessageHub::new());
    let signaling = Arc::new(SignalingRouter::new(hub.clone()));
    let presence = Arc::new(PresenceBroadcaster::new(connections.clone(), hub.clone()));
    let chat = Arc::new(ChatService::new(connections.clone(), hub.clone()));
    let captions = Arc::new(CaptionPipeline::new(
        registry.clone(),
        connections.clone(),
        hub.clone(),
        storage,
        classifier,
    ));

    let state = AppState {
        registry,
        connections,
        hub,
        signaling,
        presence,
        chat,
        captions,
    };

    let addr = config.http_address();
    info!("HTTP address: {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for shutdown signal: {e}"),
    }
}

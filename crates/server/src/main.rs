//! SeaTrack Server
//!
//! HTTP service for logging the locations of tagged objects found at sea and
//! minting the QR codes that point finders at the submission page.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seatrack_record_store::{MemoryRecordStore, RecordStore, RedisRecordStore};
use seatrack_server::{create_router, AdminGate, AppState, Config, MemorySessionRepository};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatrack_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Starting SeaTrack server");
    if let Some(origin) = &config.public_origin {
        info!("Public origin: {}", origin);
    }

    let store: Arc<dyn RecordStore> = if config.mock_mode {
        info!("MOCK_MODE enabled, using the in-memory record store");
        Arc::new(MemoryRecordStore::new())
    } else {
        info!("Record store: {}", config.redis_url);
        Arc::new(
            RedisRecordStore::connect(&config.redis_url)
                .await
                .context("Failed to connect to the record store")?,
        )
    };

    let gate = AdminGate::new(
        config.admin_password.clone(),
        Arc::new(MemorySessionRepository::new()),
    );
    if gate.uses_default_secret() {
        warn!("SEATRACK_ADMIN_PASSWORD is the insecure default; set it before exposing the admin pages");
    }

    let state = AppState::new(store, gate, config.public_origin.clone());
    let app = create_router(state);

    // Bind and serve
    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("SeaTrack server running on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

//! Reference ingestion server binary
//!
//! Run with: cargo run -p lesson-refs --bin lesson-refs-server
//! Set LESSON_REFS_CONFIG to a TOML file to override defaults.

use lesson_refs::{config::RefsConfig, server::RefsServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lesson_refs=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var_os("LESSON_REFS_CONFIG").map(PathBuf::from);
    let config = RefsConfig::load(config_path.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Max files per request: {}", config.ingestion.max_files);
    tracing::info!("  - Max file size: {}MB", config.ingestion.max_file_size_mb);
    tracing::info!("  - Character budget: {}", config.ingestion.max_chars);
    tracing::info!("  - Cleaning mode: {:?}", config.cleaning.mode);

    let server = RefsServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/references - Upload reference PDFs");
    println!("  GET  /api/info       - Service limits");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}

//! artlens-id - Artwork Identification Microservice
//!
//! **Module Identity:**
//! - Name: artlens-id (Artwork Identification)
//! - Default port: 3001
//!
//! Accepts a photo from the mobile client, identifies the artwork via label
//! detection plus text or vision enrichment, and returns one uniform result
//! envelope per submission.

use anyhow::Result;
use artlens_common::config::{load_toml_config, ConfigFileResolver, TomlConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use artlens_id::config::ServiceConfig;
use artlens_id::{AppState, IdentificationPipeline};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "artlens-id", version, about = "Artwork identification service")]
struct Args {
    /// Path to TOML config file
    #[arg(long, env = "ARTLENS_CONFIG")]
    config: Option<PathBuf>,

    /// Bind host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config file is read before tracing starts so its log level applies
    let config_path = ConfigFileResolver::new("artlens-id").resolve(args.config.as_deref());
    let toml_config = match &config_path {
        Some(path) => load_toml_config(path)?,
        None => TomlConfig::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Build identification first, before anything that can stall
    info!(
        "Starting ArtLens Identification (artlens-id) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_path {
        Some(path) if path.exists() => info!("Config file: {}", path.display()),
        Some(path) => warn!("Config file not found at {}, using defaults", path.display()),
        None => warn!("No config directory available, using defaults"),
    }

    let mut config = ServiceConfig::resolve(&toml_config)?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    info!(
        text_model = %config.text_model,
        vision_model = %config.vision_model,
        denylist_terms = config.denylist.len(),
        "Pipeline configuration resolved"
    );

    let pipeline = IdentificationPipeline::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to build provider clients: {}", e))?;

    let state = AppState::new(pipeline).with_max_upload_bytes(config.max_upload_bytes);
    let app = artlens_id::build_router(state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}

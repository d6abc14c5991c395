//! Terrapin API Server binary.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use terrapin_api::{server::run_server, ApiConfig, AppState};
use terrapin_ext_file::InMemoryBondSource;
use terrapin_ext_http::{TerrapinClient, API_KEY_ENV};
use terrapin_traits::BondDataSource;

const DEFAULT_CONFIG: &str = "config/terrapin.toml";

/// Terrapin debt payment schedule API for OpenBB
#[derive(Parser, Debug)]
#[command(name = "terrapin-api-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Host address to bind to (overrides config)
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serve bond data from a fixture directory instead of the Terrapin API
    #[arg(short, long)]
    fixtures: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose {
        "debug,tower_http=debug"
    } else {
        "info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    tracing::info!("Terrapin API Server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match args.config {
        Some(ref path) => {
            tracing::info!("Loading configuration from {}", path.display());
            ApiConfig::from_file(path)?
        }
        None if Path::new(DEFAULT_CONFIG).exists() => {
            tracing::info!("Loading configuration from {}", DEFAULT_CONFIG);
            ApiConfig::from_file(DEFAULT_CONFIG)?
        }
        None => {
            tracing::info!("Using default configuration");
            ApiConfig::default()
        }
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    // Create data source
    let source: Arc<dyn BondDataSource> = match args.fixtures {
        Some(ref dir) => {
            tracing::info!("Starting in OFFLINE mode with fixtures from {}", dir.display());
            Arc::new(InMemoryBondSource::from_dir(dir)?)
        }
        None => {
            let client = TerrapinClient::from_env(&config.upstream)?;
            if !client.has_api_key() {
                tracing::warn!(
                    "{} is not set; upstream requests will be unauthenticated",
                    API_KEY_ENV
                );
            }
            tracing::info!("Using Terrapin API at {}", client.base_url());
            Arc::new(client)
        }
    };

    run_server(AppState::new(config, source)).await
}

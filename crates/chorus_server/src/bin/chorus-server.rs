//! Chorus server - multi-model text generation over HTTP.

use chorus_core::{init_observability, shutdown_observability};
use chorus_server::{ChorusConfig, ChorusServer, shutdown_signal};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the server.
#[derive(Parser, Debug)]
#[command(name = "chorus-server")]
#[command(about = "Chorus - generate text from several language models at once")]
#[command(version)]
struct Args {
    /// Path to configuration file (defaults to ./chorus.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind, overriding the configuration
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!(config_file = ?args.config, "Loading configuration");

    let mut config = ChorusConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_observability("chorus", config.server.metrics_export_interval_secs)
        .map_err(anyhow::Error::msg)?;

    info!(
        models = ?config.registry.models(),
        seed = config.registry.seed(),
        "Starting Chorus server"
    );
    let served = ChorusServer::new(config).run(shutdown_signal()).await;

    if let Err(e) = shutdown_observability() {
        warn!(error = %e, "Metrics were not flushed");
    }
    served?;
    Ok(())
}

//! Climate API - Main Entry Point

use clap::Parser;
use climate_api::config::Settings;
use climate_api::{init_logging, run_server};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "climate-api")]
#[command(about = "Read-only REST API over weather station observations")]
struct Cli {
    /// Configuration file (optional)
    #[arg(long, default_value = "climate-api.toml")]
    config: PathBuf,

    /// Listen address, overrides `server.bind_addr`
    #[arg(long)]
    bind: Option<String>,

    /// SQLite dataset, overrides `database.path`
    #[arg(long)]
    dataset: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(&cli.config)?;
    if let Some(bind) = cli.bind {
        settings.server.bind_addr = bind;
    }
    if let Some(dataset) = cli.dataset {
        settings.database.path = dataset;
    }

    init_logging(&settings.logging)?;

    info!("=== Climate API v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Serving dataset {}", settings.database.path.display());

    run_server(settings).await
}

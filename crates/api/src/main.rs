//! SafeDrive Fatigue Dashboard - Main Entry Point

use anyhow::Result;
use api::{init_logging, run_server, DashboardConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "safedrive-dashboard")]
#[command(about = "Driver fatigue dashboard: live monitoring and historical alert queries")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "SAFEDRIVE_CONFIG")]
    config: Option<PathBuf>,

    /// Override server.bind_addr
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }

    init_logging(&config.logging)?;

    info!("=== SafeDrive Dashboard v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Historical service: {}", config.history.endpoint);

    run_server(config).await?;

    Ok(())
}

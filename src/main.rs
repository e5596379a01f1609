//! Polling signal trader.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use tokio::sync::watch;
use trading_config::{load_config, PresetStore};
use trading_monitor::setup_logging;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = load_config(cli.config.as_deref());

    let logging = loaded.as_ref().map(|c| c.logging.clone()).unwrap_or_default();
    let level = cli.log_level.map(|l| l.as_str().to_string()).unwrap_or(logging.level.clone());
    let json = cli.json_logs || logging.is_json();
    let log_dir = cli.log_file.clone().or_else(|| logging.file.clone().map(Into::into));
    let _guard = setup_logging(&level, json, log_dir.as_deref()).context("Failed to set up logging")?;

    let store = PresetStore::new(&cli.presets_dir);

    match cli.command {
        Commands::Run(args) => {
            let config = loaded.context("Failed to load configuration")?;
            let (tx, rx) = watch::channel(false);
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        info!("interrupt received, stopping after the current cycle");
                        let _ = tx.send(true);
                    }
                    Err(e) => warn!(error = %e, "cannot listen for ctrl-c"),
                }
            });
            cli::commands::run::run(args, config, &store, rx).await
        }
        Commands::Strategies => cli::commands::strategies::run().await,
        Commands::Presets { action } => cli::commands::presets::run(action, &store).await,
        Commands::ValidateConfig => cli::commands::validate::run(loaded).await,
    }
}

//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use std::path::PathBuf;
use trading_core::types::Timeframe;

#[derive(Parser)]
#[command(name = "autotrader")]
#[command(author, version, about = "Polling signal trader for a single symbol")]
pub struct Cli {
    /// Configuration file path (config/default.toml is used when present)
    #[arg(short, long, env = "AUTOTRADER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level, overrides the configuration file
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    /// Also write logs to daily files in this directory
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Directory holding run presets
    #[arg(long, default_value = "presets")]
    pub presets_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the polling trader
    Run(RunArgs),
    /// List available strategies
    Strategies,
    /// Manage saved presets
    Presets {
        #[command(subcommand)]
        action: PresetCommand,
    },
    /// Validate configuration
    ValidateConfig,
}

#[derive(Subcommand)]
pub enum PresetCommand {
    /// List saved presets
    List,
    /// Print a preset
    Show { name: String },
    /// Delete a preset
    Delete { name: String },
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Start from a saved preset
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Symbol to trade
    #[arg(short = 'S', long)]
    pub symbol: Option<String>,

    /// Dollar budget for each opening order
    #[arg(short, long)]
    pub dollar_amount: Option<Decimal>,

    /// Seconds between cycles
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Strategy identifier
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Bar timeframe (1m, 5m, 15m, 30m, 1h, 4h, 1d, 1w, 1mo)
    #[arg(short, long)]
    pub timeframe: Option<Timeframe>,

    /// Strategy parameter as key=value; values are read as JSON when possible
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, Value)>,

    /// Log orders instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Stop after this many cycles
    #[arg(long)]
    pub max_cycles: Option<u64>,

    /// Save the resolved run settings under this name
    #[arg(long)]
    pub save_preset: Option<String>,
}

/// Parse `key=value`, keeping `value` as a string unless it is valid JSON.
pub fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty parameter name in {:?}", raw));
    }
    let value = serde_json::from_str(value.trim()).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

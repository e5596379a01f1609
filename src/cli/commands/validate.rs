//! Validate configuration command.

use anyhow::Result;
use trading_config::{AppConfig, SettingsError};
use trading_strategies::StrategyRegistry;

pub async fn run(loaded: Result<AppConfig, SettingsError>) -> Result<()> {
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    let registry = StrategyRegistry::new();
    if !registry.exists(&config.trader.strategy) {
        anyhow::bail!("Unknown strategy '{}'", config.trader.strategy);
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Alpaca endpoint: {}", config.alpaca.base_url);
    println!("Credentials from: {} / {}", config.alpaca.api_key_env, config.alpaca.api_secret_env);
    println!("Symbol: {}", config.trader.symbol);
    println!("Dollar amount: {}", config.trader.dollar_amount);
    println!("Check interval: {}s", config.trader.check_interval_secs);
    println!("Strategy: {} ({})", config.trader.strategy, config.trader.timeframe);
    println!();
    println!("{}", config.to_toml()?);

    Ok(())
}

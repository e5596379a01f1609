//! Run the polling trader.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use trading_broker::{AlpacaClient, AlpacaConfig, AlpacaNewsSource, DryRunGateway};
use trading_config::{AppConfig, PresetStore, TraderSettings};
use trading_core::traits::{MarketData, OrderGateway};
use trading_engine::Trader;
use trading_strategies::sentiment::StaticTextSource;
use trading_strategies::{StrategyContext, StrategyRegistry};
use tracing::info;

use crate::cli::RunArgs;

impl RunArgs {
    /// Overlay command-line flags onto the trader settings.
    ///
    /// Switching strategy drops parameters meant for the previous one.
    pub fn apply(&self, settings: &mut TraderSettings) {
        if let Some(symbol) = &self.symbol {
            settings.symbol = symbol.trim().to_uppercase();
        }
        if let Some(amount) = self.dollar_amount {
            settings.dollar_amount = amount;
        }
        if let Some(interval) = self.interval {
            settings.check_interval_secs = interval;
        }
        if let Some(timeframe) = self.timeframe {
            settings.timeframe = timeframe;
        }
        if let Some(strategy) = &self.strategy {
            if *strategy != settings.strategy {
                settings.params = Value::Object(Map::new());
            }
            settings.strategy = strategy.clone();
        }
        if !self.params.is_empty() {
            let mut params = match settings.params.take() {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            for (key, value) in &self.params {
                params.insert(key.clone(), value.clone());
            }
            settings.params = Value::Object(params);
        }
    }
}

pub async fn run(
    args: RunArgs,
    mut config: AppConfig,
    store: &PresetStore,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    if let Some(name) = &args.preset {
        let preset = store
            .load(name)
            .with_context(|| format!("Failed to load preset '{}'", name))?;
        config.apply_preset(preset)?;
        info!(preset = %name, "preset applied");
    }
    args.apply(&mut config.trader);
    config.validate().context("Invalid run settings")?;

    if let Some(name) = &args.save_preset {
        let preset = config.trader.to_preset(Some(config.alpaca.base_url.clone()));
        store
            .save(name, &preset)
            .with_context(|| format!("Failed to save preset '{}'", name))?;
    }

    let alpaca = AlpacaConfig::from_env(&config.alpaca.api_key_env, &config.alpaca.api_secret_env)
        .context("Missing Alpaca credentials")?
        .with_base_url(&config.alpaca.base_url)
        .with_data_url(&config.alpaca.data_url)
        .with_feed(&config.alpaca.feed)
        .with_request_timeout(Duration::from_secs(config.trader.call_timeout_secs));
    let client = Arc::new(AlpacaClient::new(alpaca).context("Failed to create Alpaca client")?);

    let mut context = StrategyContext::default();
    if config.alpaca.news.enabled {
        context = context
            .with_text_source(Arc::new(AlpacaNewsSource::new(
                Arc::clone(&client),
                config.alpaca.news.limit,
            )))
            .with_text_source(Arc::new(StaticTextSource::chat()));
    }

    let strategy = StrategyRegistry::new()
        .create(&config.trader.strategy, config.trader.params.clone(), &context)
        .with_context(|| format!("Failed to create strategy '{}'", config.trader.strategy))?;

    let gateway: Arc<dyn OrderGateway> = if args.dry_run {
        Arc::new(DryRunGateway::new())
    } else {
        Arc::clone(&client) as Arc<dyn OrderGateway>
    };
    let market: Arc<dyn MarketData> = client;

    let trader = Trader::new(
        config.trader.trader_config(args.max_cycles),
        market,
        gateway,
        strategy,
    );
    trader
        .preflight()
        .await
        .context("Brokerage session check failed")?;

    info!(
        symbol = %config.trader.symbol,
        strategy = trader.strategy_name(),
        dollar_amount = %config.trader.dollar_amount,
        interval_secs = config.trader.check_interval_secs,
        timeframe = %config.trader.timeframe,
        dry_run = args.dry_run,
        "starting trader"
    );

    let summary = trader.run(shutdown).await;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crate::cli::{Cli, Commands};

    fn run_args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["autotrader", "run"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Run(args) => args,
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_flags_override_settings() {
        let mut settings = TraderSettings::default();
        run_args(&["--symbol", " tsla ", "--interval", "60", "--strategy", "rsi", "--param", "window=10"])
            .apply(&mut settings);

        assert_eq!(settings.symbol, "TSLA");
        assert_eq!(settings.check_interval_secs, 60);
        assert_eq!(settings.strategy, "rsi");
        assert_eq!(settings.params, serde_json::json!({"window": 10}));
    }

    #[test]
    fn test_switching_strategy_drops_old_params() {
        let mut settings = TraderSettings::default();
        settings.strategy = "moving_average".into();
        settings.params = serde_json::json!({"short_window": 5});

        run_args(&["--strategy", "bollinger_bands"]).apply(&mut settings);
        assert_eq!(settings.params, serde_json::json!({}));

        let mut settings = TraderSettings::default();
        settings.strategy = "moving_average".into();
        settings.params = serde_json::json!({"short_window": 5});
        run_args(&["--param", "long_window=40"]).apply(&mut settings);
        assert_eq!(settings.params, serde_json::json!({"short_window": 5, "long_window": 40}));
    }
}

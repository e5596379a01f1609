//! Configuration structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use trading_core::types::{TimeInForce, Timeframe};
use trading_engine::{FlipSettlement, TraderConfig};

use crate::presets::Preset;
use crate::SettingsError;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub alpaca: AlpacaSettings,
    #[serde(default)]
    pub trader: TraderSettings,
}

impl AppConfig {
    /// Check the values that the trader cannot run without.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.logging.validate()?;
        self.alpaca.validate()?;
        self.trader.validate()
    }

    /// Overlay a saved preset onto the loaded configuration.
    pub fn apply_preset(&mut self, preset: Preset) -> Result<(), SettingsError> {
        if let Some(url) = &preset.base_url {
            self.alpaca.base_url = url.clone();
        }
        self.trader.apply_preset(preset)
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Invalid(e.to_string()))
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "autotrader".to_string(),
            environment: "paper".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Directory for daily-rolling log files
    pub file: Option<String>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    fn validate(&self) -> Result<(), SettingsError> {
        match self.format.to_lowercase().as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(SettingsError::Invalid(format!(
                "logging.format must be pretty or json, got {:?}",
                other
            ))),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Alpaca API configuration.
///
/// Credentials are read from the named environment variables at startup and
/// never stored in files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlpacaSettings {
    pub api_key_env: String,
    pub api_secret_env: String,
    pub base_url: String,
    pub data_url: String,
    /// Market data feed (`iex` or `sip`)
    pub feed: String,
    pub news: NewsSettings,
}

impl AlpacaSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        if self.api_key_env.trim().is_empty() || self.api_secret_env.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "alpaca credential variable names must not be empty".into(),
            ));
        }
        for (field, url) in [("base_url", &self.base_url), ("data_url", &self.data_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SettingsError::Invalid(format!(
                    "alpaca.{} must be an http(s) URL, got {:?}",
                    field, url
                )));
            }
        }
        Ok(())
    }
}

impl Default for AlpacaSettings {
    fn default() -> Self {
        Self {
            api_key_env: "ALPACA_API_KEY".to_string(),
            api_secret_env: "ALPACA_API_SECRET".to_string(),
            base_url: "https://paper-api.alpaca.markets".to_string(),
            data_url: "https://data.alpaca.markets".to_string(),
            feed: "iex".to_string(),
            news: NewsSettings::default(),
        }
    }
}

/// Alpaca news as an extra text source for the sentiment strategy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSettings {
    pub enabled: bool,
    /// Articles per fetch
    pub limit: usize,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            limit: 10,
        }
    }
}

/// Polling loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraderSettings {
    pub symbol: String,
    /// Dollar budget for each opening order
    pub dollar_amount: Decimal,
    pub check_interval_secs: u64,
    /// Strategy identifier or alias
    pub strategy: String,
    pub timeframe: Timeframe,
    /// Strategy parameters as a JSON object
    pub params: Value,
    pub time_in_force: TimeInForce,
    pub call_timeout_secs: u64,
    pub flip_settlement: FlipSettlement,
    pub max_shares: Option<u64>,
}

impl Default for TraderSettings {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            dollar_amount: Decimal::from(1000),
            check_interval_secs: 10,
            strategy: "sentiment".to_string(),
            timeframe: Timeframe::Daily,
            params: Value::Object(Map::new()),
            time_in_force: TimeInForce::GTC,
            call_timeout_secs: 30,
            flip_settlement: FlipSettlement::default(),
            max_shares: None,
        }
    }
}

impl TraderSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.symbol.trim().is_empty() {
            return Err(SettingsError::Invalid("trader.symbol must not be empty".into()));
        }
        if self.dollar_amount <= Decimal::ZERO {
            return Err(SettingsError::Invalid(format!(
                "trader.dollar_amount must be greater than 0, got {}",
                self.dollar_amount
            )));
        }
        if self.check_interval_secs == 0 {
            return Err(SettingsError::Invalid(
                "trader.check_interval_secs must be greater than 0".into(),
            ));
        }
        if self.call_timeout_secs == 0 {
            return Err(SettingsError::Invalid(
                "trader.call_timeout_secs must be greater than 0".into(),
            ));
        }
        if !self.params.is_object() && !self.params.is_null() {
            return Err(SettingsError::Invalid("trader.params must be a table".into()));
        }
        if let FlipSettlement::AwaitFill { poll_interval_ms: 0, .. } = self.flip_settlement {
            return Err(SettingsError::Invalid(
                "trader.flip_settlement.poll_interval_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Take symbol, budget, interval, strategy and parameters from a preset.
    ///
    /// A `timeframe` entry among the strategy parameters is lifted out into
    /// [`TraderSettings::timeframe`]; an explicit preset timeframe wins.
    pub fn apply_preset(&mut self, preset: Preset) -> Result<(), SettingsError> {
        let mut params = match preset.strategy_kwargs {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => {
                return Err(SettingsError::Invalid(
                    "preset strategy_kwargs must be an object".into(),
                ))
            }
        };

        if let Some(raw) = params.remove("timeframe") {
            let text = raw.as_str().ok_or_else(|| {
                SettingsError::Invalid(format!("timeframe must be a string, got {}", raw))
            })?;
            self.timeframe = text.parse().map_err(SettingsError::Invalid)?;
        }
        if let Some(timeframe) = preset.timeframe {
            self.timeframe = timeframe;
        }

        self.symbol = preset.symbol;
        self.dollar_amount = preset.dollar_amount;
        self.check_interval_secs = preset.check_interval;
        self.strategy = preset.strategy;
        self.params = Value::Object(params);
        Ok(())
    }

    /// Snapshot the settings as a preset.
    pub fn to_preset(&self, base_url: Option<String>) -> Preset {
        Preset {
            symbol: self.symbol.clone(),
            dollar_amount: self.dollar_amount,
            check_interval: self.check_interval_secs,
            strategy: self.strategy.clone(),
            timeframe: Some(self.timeframe),
            strategy_kwargs: self.params.clone(),
            base_url,
        }
    }

    /// Build the polling loop configuration.
    pub fn trader_config(&self, max_cycles: Option<u64>) -> TraderConfig {
        TraderConfig {
            symbol: self.symbol.clone(),
            dollar_amount: self.dollar_amount,
            check_interval: Duration::from_secs(self.check_interval_secs),
            timeframe: self.timeframe,
            time_in_force: self.time_in_force,
            call_timeout: Duration::from_secs(self.call_timeout_secs),
            flip_settlement: self.flip_settlement,
            max_shares: self.max_shares,
            max_cycles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trader.symbol, "AAPL");
        assert_eq!(config.trader.check_interval_secs, 10);
        assert_eq!(config.trader.strategy, "sentiment");
        assert!(config.alpaca.base_url.contains("paper-api"));
    }

    #[test]
    fn test_rejects_non_positive_budget() {
        let mut settings = TraderSettings::default();
        settings.dollar_amount = Decimal::ZERO;
        assert!(settings.validate().is_err());

        settings.dollar_amount = dec!(-5);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_interval_and_empty_symbol() {
        let mut settings = TraderSettings::default();
        settings.check_interval_secs = 0;
        assert!(settings.validate().is_err());

        let mut settings = TraderSettings::default();
        settings.symbol = "  ".into();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let mut config = AppConfig::default();
        config.logging.format = "xml".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_preset_lifts_timeframe_out_of_kwargs() {
        let preset: Preset = serde_json::from_value(serde_json::json!({
            "api_key": "ignored",
            "secret_key": "ignored",
            "symbol": "MSFT",
            "dollar_amount": 250.5,
            "check_interval": 60,
            "strategy": "moving_average",
            "strategy_kwargs": {"short_window": 5, "long_window": 20, "timeframe": "5Min"}
        }))
        .unwrap();

        let mut config = AppConfig::default();
        config.apply_preset(preset).unwrap();

        assert_eq!(config.trader.symbol, "MSFT");
        assert_eq!(config.trader.dollar_amount, dec!(250.5));
        assert_eq!(config.trader.check_interval_secs, 60);
        assert_eq!(config.trader.timeframe, Timeframe::Minute5);
        assert_eq!(
            config.trader.params,
            serde_json::json!({"short_window": 5, "long_window": 20})
        );
    }

    #[test]
    fn test_preset_with_bad_timeframe_fails() {
        let preset: Preset = serde_json::from_value(serde_json::json!({
            "symbol": "AAPL",
            "dollar_amount": 100,
            "check_interval": 10,
            "strategy": "rsi",
            "strategy_kwargs": {"timeframe": "fortnight"}
        }))
        .unwrap();

        let mut settings = TraderSettings::default();
        assert!(settings.apply_preset(preset).is_err());
    }

    #[test]
    fn test_trader_config_conversion() {
        let mut settings = TraderSettings::default();
        settings.max_shares = Some(50);
        let config = settings.trader_config(Some(3));

        assert_eq!(config.check_interval, Duration::from_secs(10));
        assert_eq!(config.call_timeout, Duration::from_secs(30));
        assert_eq!(config.max_shares, Some(50));
        assert_eq!(config.max_cycles, Some(3));
        assert_eq!(config.time_in_force, TimeInForce::GTC);
    }

    #[test]
    fn test_flip_settlement_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [trader]
            symbol = "TSLA"
            flip_settlement = { mode = "on_ack" }
            "#,
        )
        .unwrap();

        assert_eq!(config.trader.symbol, "TSLA");
        assert_eq!(config.trader.flip_settlement, FlipSettlement::OnAck);
        assert_eq!(config.trader.check_interval_secs, 10);
    }
}

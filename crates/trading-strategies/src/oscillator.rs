//! RSI threshold strategy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trading_core::{
    error::StrategyError,
    traits::{ensure_bars, Indicator, SignalGenerator, StrategyConfig},
    types::{PriceSeries, Signal},
};
use trading_indicators::Rsi;
use tracing::debug;

use crate::BAR_PADDING;

/// Configuration for the RSI strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OscillatorConfig {
    /// RSI period
    pub window: usize,
    /// Short above this level
    pub overbought: f64,
    /// Long below this level
    pub oversold: f64,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            window: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

impl StrategyConfig for OscillatorConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.window == 0 {
            return Err(StrategyError::InvalidConfig(
                "window must be positive".into(),
            ));
        }
        if !self.oversold.is_finite() || !self.overbought.is_finite() {
            return Err(StrategyError::InvalidConfig(
                "RSI thresholds must be finite".into(),
            ));
        }
        if self.oversold < 0.0 || self.overbought > 100.0 {
            return Err(StrategyError::InvalidConfig(
                "RSI thresholds must be between 0 and 100".into(),
            ));
        }
        if self.oversold >= self.overbought {
            return Err(StrategyError::InvalidConfig(
                "oversold must be below overbought".into(),
            ));
        }
        Ok(())
    }
}

/// RSI threshold signal generator.
pub struct OscillatorStrategy {
    config: OscillatorConfig,
    rsi: Rsi,
}

impl OscillatorStrategy {
    /// Create the strategy. The config must already be validated.
    pub fn new(config: OscillatorConfig) -> Self {
        Self {
            rsi: Rsi::new(config.window),
            config,
        }
    }
}

#[async_trait]
impl SignalGenerator for OscillatorStrategy {
    fn name(&self) -> &str {
        "rsi"
    }

    fn required_bars(&self) -> usize {
        self.config.window + BAR_PADDING
    }

    async fn generate(&self, symbol: &str, series: &PriceSeries) -> Result<Signal, StrategyError> {
        ensure_bars(series, self.config.window + 1)?;

        let rsi = self.rsi.latest(&series.closes())?;
        debug!(symbol, rsi, "rsi level");

        let signal = if rsi < self.config.oversold {
            Signal::Long
        } else if rsi > self.config.overbought {
            Signal::Short
        } else {
            Signal::Neutral
        };
        Ok(signal)
    }

    fn description(&self) -> &str {
        "Buys when RSI is oversold, sells when RSI is overbought"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::series_from_closes;

    fn strategy() -> OscillatorStrategy {
        OscillatorStrategy::new(OscillatorConfig {
            window: 5,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_falling_prices_oversold() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        let signal = strategy()
            .generate("AAPL", &series_from_closes(&closes))
            .await
            .unwrap();
        assert_eq!(signal, Signal::Long);
    }

    #[tokio::test]
    async fn test_rising_prices_overbought() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let signal = strategy()
            .generate("AAPL", &series_from_closes(&closes))
            .await
            .unwrap();
        assert_eq!(signal, Signal::Short);
    }

    #[tokio::test]
    async fn test_flat_prices_neutral() {
        let closes = vec![100.0; 10];
        let signal = strategy()
            .generate("AAPL", &series_from_closes(&closes))
            .await
            .unwrap();
        assert_eq!(signal, Signal::Neutral);
    }

    #[tokio::test]
    async fn test_insufficient_history() {
        let closes = vec![100.0; 5];
        let result = strategy()
            .generate("AAPL", &series_from_closes(&closes))
            .await;
        assert!(matches!(
            result,
            Err(StrategyError::InsufficientData {
                required: 6,
                available: 5
            })
        ));
    }

    #[test]
    fn test_config_validation() {
        assert!(OscillatorConfig::default().validate().is_ok());

        let inverted = OscillatorConfig {
            overbought: 30.0,
            oversold: 70.0,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let out_of_range = OscillatorConfig {
            overbought: 120.0,
            ..Default::default()
        };
        assert!(out_of_range.validate().is_err());

        let nan = OscillatorConfig {
            oversold: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }
}

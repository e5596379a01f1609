//! Moving average crossover.
//!
//! Signals only on the bar where the short average crosses the long one;
//! a persisting spread is not a new signal.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trading_core::{
    error::StrategyError,
    traits::{ensure_bars, SignalGenerator, StrategyConfig},
    types::{PriceSeries, Signal},
};
use trading_indicators::Sma;
use tracing::debug;

use crate::BAR_PADDING;

/// Configuration for the crossover strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrendCrossoverConfig {
    /// Short (fast) SMA window
    pub short_window: usize,
    /// Long (slow) SMA window
    pub long_window: usize,
}

impl Default for TrendCrossoverConfig {
    fn default() -> Self {
        Self {
            short_window: 10,
            long_window: 30,
        }
    }
}

impl StrategyConfig for TrendCrossoverConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.short_window == 0 {
            return Err(StrategyError::InvalidConfig(
                "short_window must be positive".into(),
            ));
        }
        if self.short_window >= self.long_window {
            return Err(StrategyError::InvalidConfig(
                "short_window must be less than long_window".into(),
            ));
        }
        Ok(())
    }
}

/// Crossover signal generator.
pub struct TrendCrossoverStrategy {
    config: TrendCrossoverConfig,
    short: Sma,
    long: Sma,
}

impl TrendCrossoverStrategy {
    /// Create the strategy. The config must already be validated.
    pub fn new(config: TrendCrossoverConfig) -> Self {
        Self {
            short: Sma::new(config.short_window),
            long: Sma::new(config.long_window),
            config,
        }
    }
}

#[async_trait]
impl SignalGenerator for TrendCrossoverStrategy {
    fn name(&self) -> &str {
        "moving_average"
    }

    fn required_bars(&self) -> usize {
        self.config.long_window + BAR_PADDING
    }

    async fn generate(&self, symbol: &str, series: &PriceSeries) -> Result<Signal, StrategyError> {
        ensure_bars(series, self.config.long_window + 1)?;

        let closes = series.closes();
        let (short_prev, short_now) = self.short.last_two(&closes)?;
        let (long_prev, long_now) = self.long.last_two(&closes)?;

        debug!(
            symbol,
            short_prev, short_now, long_prev, long_now, "crossover averages"
        );

        let signal = if short_prev <= long_prev && short_now > long_now {
            Signal::Long
        } else if short_prev >= long_prev && short_now < long_now {
            Signal::Short
        } else {
            Signal::Neutral
        };
        Ok(signal)
    }

    fn description(&self) -> &str {
        "Trades the bar on which the short SMA crosses the long SMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::series_from_closes;

    fn strategy() -> TrendCrossoverStrategy {
        TrendCrossoverStrategy::new(TrendCrossoverConfig {
            short_window: 2,
            long_window: 4,
        })
    }

    #[tokio::test]
    async fn test_upward_cross_is_long() {
        // short[-2] = 10 <= long[-2] = 10, short[-1] = 12.5 > long[-1] = 11.25
        let closes = vec![10.0, 10.0, 10.0, 10.0, 10.0, 15.0];
        let signal = strategy()
            .generate("AAPL", &series_from_closes(&closes))
            .await
            .unwrap();
        assert_eq!(signal, Signal::Long);
    }

    #[tokio::test]
    async fn test_downward_cross_is_short() {
        let closes = vec![10.0, 10.0, 10.0, 10.0, 10.0, 5.0];
        let signal = strategy()
            .generate("AAPL", &series_from_closes(&closes))
            .await
            .unwrap();
        assert_eq!(signal, Signal::Short);
    }

    #[tokio::test]
    async fn test_persisting_spread_is_neutral() {
        // Short average already above long on both bars
        let closes = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let signal = strategy()
            .generate("AAPL", &series_from_closes(&closes))
            .await
            .unwrap();
        assert_eq!(signal, Signal::Neutral);
    }

    #[tokio::test]
    async fn test_needs_long_window_plus_one() {
        let closes = vec![10.0; 4];
        let result = strategy()
            .generate("AAPL", &series_from_closes(&closes))
            .await;
        assert!(matches!(
            result,
            Err(StrategyError::InsufficientData {
                required: 5,
                available: 4
            })
        ));
    }

    #[test]
    fn test_config_validation() {
        assert!(TrendCrossoverConfig::default().validate().is_ok());

        let config = TrendCrossoverConfig {
            short_window: 30,
            long_window: 30,
        };
        assert!(config.validate().is_err());

        let config = TrendCrossoverConfig {
            short_window: 0,
            long_window: 30,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_params_from_json() {
        let config: TrendCrossoverConfig =
            serde_json::from_value(serde_json::json!({"short_window": 5})).unwrap();
        assert_eq!(config.short_window, 5);
        assert_eq!(config.long_window, 30);

        let bad = serde_json::from_value::<TrendCrossoverConfig>(serde_json::json!({"fast": 5}));
        assert!(bad.is_err());
    }
}

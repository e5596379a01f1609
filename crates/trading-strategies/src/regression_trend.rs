//! Linear regression trend strategy.
//!
//! Fits a straight line through the most recent closes and compares its
//! one-step projection with the last close. A projection that does not
//! rise above the last close counts as a downtrend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trading_core::{
    error::StrategyError,
    traits::{ensure_bars, Indicator, SignalGenerator, StrategyConfig},
    types::{PriceSeries, Signal},
};
use trading_indicators::LinearTrend;
use tracing::debug;

/// Configuration for the regression trend strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegressionTrendConfig {
    /// Bars fetched each cycle
    pub limit: usize,
    /// Closes used for the fit
    pub trend_window: usize,
}

impl Default for RegressionTrendConfig {
    fn default() -> Self {
        Self {
            limit: 100,
            trend_window: 20,
        }
    }
}

impl StrategyConfig for RegressionTrendConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.trend_window < 2 {
            return Err(StrategyError::InvalidConfig(
                "trend_window must be at least 2".into(),
            ));
        }
        if self.limit < self.trend_window {
            return Err(StrategyError::InvalidConfig(
                "limit must be at least trend_window".into(),
            ));
        }
        Ok(())
    }
}

/// Regression trend signal generator.
pub struct RegressionTrendStrategy {
    config: RegressionTrendConfig,
    trend: LinearTrend,
}

impl RegressionTrendStrategy {
    /// Create the strategy. The config must already be validated.
    pub fn new(config: RegressionTrendConfig) -> Self {
        Self {
            trend: LinearTrend::new(config.trend_window),
            config,
        }
    }
}

#[async_trait]
impl SignalGenerator for RegressionTrendStrategy {
    fn name(&self) -> &str {
        "linear_trend"
    }

    fn required_bars(&self) -> usize {
        self.config.limit
    }

    async fn generate(&self, symbol: &str, series: &PriceSeries) -> Result<Signal, StrategyError> {
        ensure_bars(series, self.config.trend_window)?;

        let closes = series.closes();
        let fit = self.trend.latest(&closes)?;
        let price = closes[closes.len() - 1];

        debug!(
            symbol,
            price,
            predicted = fit.next,
            slope = fit.slope,
            "regression projection"
        );

        let signal = if fit.next > price {
            Signal::Long
        } else {
            Signal::Short
        };
        Ok(signal)
    }

    fn description(&self) -> &str {
        "Projects a least-squares trend one bar ahead and trades its direction against the last close"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::series_from_closes;

    fn strategy() -> RegressionTrendStrategy {
        RegressionTrendStrategy::new(RegressionTrendConfig {
            limit: 10,
            trend_window: 5,
        })
    }

    #[tokio::test]
    async fn test_uptrend_is_long() {
        let closes: Vec<f64> = (0..10).map(|i| 50.0 + i as f64).collect();
        let signal = strategy()
            .generate("AAPL", &series_from_closes(&closes))
            .await
            .unwrap();
        assert_eq!(signal, Signal::Long);
    }

    #[tokio::test]
    async fn test_downtrend_is_short() {
        let closes: Vec<f64> = (0..10).map(|i| 50.0 - i as f64).collect();
        let signal = strategy()
            .generate("AAPL", &series_from_closes(&closes))
            .await
            .unwrap();
        assert_eq!(signal, Signal::Short);
    }

    #[tokio::test]
    async fn test_flat_projection_is_short() {
        let closes = vec![42.0; 10];
        let signal = strategy()
            .generate("AAPL", &series_from_closes(&closes))
            .await
            .unwrap();
        assert_eq!(signal, Signal::Short);
    }

    #[tokio::test]
    async fn test_spike_above_trend_is_short() {
        // Line through the window lands below the final spike
        let closes = vec![10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 20.0];
        let signal = strategy()
            .generate("AAPL", &series_from_closes(&closes))
            .await
            .unwrap();
        assert_eq!(signal, Signal::Short);
    }

    #[tokio::test]
    async fn test_insufficient_history() {
        let result = strategy()
            .generate("AAPL", &series_from_closes(&[1.0, 2.0, 3.0]))
            .await;
        assert!(matches!(
            result,
            Err(StrategyError::InsufficientData {
                required: 5,
                available: 3
            })
        ));
    }

    #[test]
    fn test_config_validation() {
        assert!(RegressionTrendConfig::default().validate().is_ok());

        let config = RegressionTrendConfig {
            limit: 10,
            trend_window: 20,
        };
        assert!(config.validate().is_err());

        let config = RegressionTrendConfig {
            limit: 10,
            trend_window: 1,
        };
        assert!(config.validate().is_err());
    }
}

//! Band reversion using Bollinger Bands.
//!
//! The bands come from the `window` closes before the latest one. Goes long
//! when the latest close sits at or below the lower band and short when it
//! sits at or above the upper band.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trading_core::{
    error::StrategyError,
    traits::{ensure_bars, Indicator, SignalGenerator, StrategyConfig},
    types::{PriceSeries, Signal},
};
use trading_indicators::BollingerBands;
use tracing::debug;

use crate::BAR_PADDING;

/// Configuration for the band reversion strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BandReversionConfig {
    /// Number of closes in the band window
    pub window: usize,
    /// Band width in standard deviations
    pub num_std: f64,
}

impl Default for BandReversionConfig {
    fn default() -> Self {
        Self {
            window: 20,
            num_std: 2.0,
        }
    }
}

impl StrategyConfig for BandReversionConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.window < 2 {
            return Err(StrategyError::InvalidConfig(
                "window must be at least 2".into(),
            ));
        }
        if !self.num_std.is_finite() || self.num_std <= 0.0 {
            return Err(StrategyError::InvalidConfig(
                "num_std must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Band reversion signal generator.
pub struct BandReversionStrategy {
    config: BandReversionConfig,
    bands: BollingerBands,
}

impl BandReversionStrategy {
    /// Create the strategy. The config must already be validated.
    pub fn new(config: BandReversionConfig) -> Self {
        let bands = BollingerBands::new(config.window, config.num_std);
        Self { config, bands }
    }
}

#[async_trait]
impl SignalGenerator for BandReversionStrategy {
    fn name(&self) -> &str {
        "bollinger_bands"
    }

    fn required_bars(&self) -> usize {
        self.config.window + BAR_PADDING
    }

    async fn generate(&self, symbol: &str, series: &PriceSeries) -> Result<Signal, StrategyError> {
        ensure_bars(series, self.config.window + 1)?;

        let closes = series.closes();
        let bands = self.bands.latest(&closes)?;
        let price = closes[closes.len() - 1];

        debug!(
            symbol,
            price,
            lower = bands.lower,
            upper = bands.upper,
            "band reversion levels"
        );

        let signal = if bands.touches_lower(price) {
            Signal::Long
        } else if bands.touches_upper(price) {
            Signal::Short
        } else {
            Signal::Neutral
        };
        Ok(signal)
    }

    fn description(&self) -> &str {
        "Buys closes at or below the lower Bollinger band, sells at or above the upper band"
    }
}

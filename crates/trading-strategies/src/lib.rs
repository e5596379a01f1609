//! Signal generators.
//!
//! Every strategy turns one cycle's price history (or text feed) into a
//! `Long`, `Short` or `Neutral` signal:
//! - Band reversion (Bollinger Bands)
//! - Moving average crossover
//! - RSI thresholds
//! - Linear regression trend
//! - News and chat sentiment

mod band_reversion;
mod oscillator;
mod registry;
mod regression_trend;
pub mod sentiment;
mod trend_crossover;

#[cfg(test)]
mod test_support;

pub use band_reversion::{BandReversionConfig, BandReversionStrategy};
pub use oscillator::{OscillatorConfig, OscillatorStrategy};
pub use registry::{StrategyContext, StrategyInfo, StrategyRegistry};
pub use regression_trend::{RegressionTrendConfig, RegressionTrendStrategy};
pub use sentiment::{SentimentConfig, SentimentStrategy};
pub use trend_crossover::{TrendCrossoverConfig, TrendCrossoverStrategy};

/// Extra bars fetched beyond a strategy's window.
pub const BAR_PADDING: usize = 10;

//! Technical indicators used by the signal generators.
//!
//! Each indicator implements [`trading_core::traits::Indicator`] and is
//! evaluated on the most recent closes only.

pub mod momentum;
pub mod moving_average;
pub mod regression;
pub mod volatility;

pub use momentum::Rsi;
pub use moving_average::Sma;
pub use regression::{LinearTrend, TrendFit};
pub use volatility::{BandLevels, BollingerBands};

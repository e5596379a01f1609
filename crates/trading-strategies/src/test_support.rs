//! Fixtures shared by the strategy tests.

use trading_core::types::{Bar, PriceSeries, Timeframe};

/// Daily series whose bars close at `closes`, one day apart.
pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(i as i64 * 86_400_000, c, c, c, c, 1_000.0))
        .collect();
    PriceSeries::new("AAPL", Timeframe::Daily, bars)
}

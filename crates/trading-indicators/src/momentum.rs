//! Momentum indicators.

use trading_core::error::IndicatorError;
use trading_core::traits::Indicator;

/// Relative Strength Index with Wilder smoothing.
///
/// The first `period` changes seed plain averages of gains and losses. Every
/// later change is folded in as `avg = (avg * (period - 1) + x) / period`, so
/// the value depends on all the history handed to [`Indicator::latest`].
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    fn from_averages(gain: f64, loss: f64) -> f64 {
        if gain == 0.0 && loss == 0.0 {
            50.0
        } else if loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + gain / loss)
        }
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn lookback(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "RSI"
    }

    fn evaluate(&self, closes: &[f64]) -> Result<f64, IndicatorError> {
        if closes.len() < self.lookback() {
            return Err(IndicatorError::InsufficientData {
                required: self.lookback(),
                available: closes.len(),
            });
        }

        let p = self.period as f64;
        let mut changes = closes.windows(2).map(|w| w[1] - w[0]);

        let (gain_sum, loss_sum) = changes
            .by_ref()
            .take(self.period)
            .fold((0.0, 0.0), |(g, l), c| (g + c.max(0.0), l + (-c).max(0.0)));
        let mut gain = gain_sum / p;
        let mut loss = loss_sum / p;

        for change in changes {
            gain = (gain * (p - 1.0) + change.max(0.0)) / p;
            loss = (loss * (p - 1.0) + (-change).max(0.0)) / p;
        }

        Ok(Self::from_averages(gain, loss))
    }

    /// Smooths over every close in `data`.
    fn latest(&self, data: &[f64]) -> Result<f64, IndicatorError> {
        self.evaluate(data)
    }
}

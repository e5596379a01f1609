//! Indicator trait definitions.

use crate::error::IndicatorError;

/// A statistic over the most recent closes.
///
/// Implementors only see a slice of exactly [`Indicator::lookback`] points;
/// [`Indicator::latest`] checks the history length and cuts the tail.
pub trait Indicator: Send + Sync {
    type Output;

    /// Points consumed by one evaluation.
    fn lookback(&self) -> usize;

    fn name(&self) -> &str;

    /// Evaluate on a window of exactly `lookback()` points, oldest first.
    fn evaluate(&self, window: &[f64]) -> Result<Self::Output, IndicatorError>;

    /// Evaluate on the tail of `data`.
    fn latest(&self, data: &[f64]) -> Result<Self::Output, IndicatorError> {
        let required = self.lookback();
        if data.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                available: data.len(),
            });
        }
        self.evaluate(&data[data.len() - required..])
    }
}

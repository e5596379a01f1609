//! Moving average indicators.

use trading_core::error::IndicatorError;
use trading_core::traits::Indicator;

/// Simple Moving Average (SMA).
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Averages of the two most recent windows, `(previous, latest)`.
    ///
    /// Needs `period + 1` points.
    pub fn last_two(&self, data: &[f64]) -> Result<(f64, f64), IndicatorError> {
        let required = self.period + 1;
        if data.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                available: data.len(),
            });
        }

        let previous = self.latest(&data[..data.len() - 1])?;
        let latest = self.latest(data)?;
        Ok((previous, latest))
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn lookback(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }

    fn evaluate(&self, window: &[f64]) -> Result<f64, IndicatorError> {
        Ok(window.iter().sum::<f64>() / window.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_latest() {
        let sma = Sma::new(3);
        let avg = sma.latest(&[1.0, 2.0, 3.0, 4.0, 8.0]).unwrap();
        assert!((avg - 5.0).abs() < 1e-10); // (3+4+8)/3
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = Sma::new(5);
        assert!(matches!(
            sma.latest(&[1.0, 2.0, 3.0]),
            Err(IndicatorError::InsufficientData {
                required: 5,
                available: 3
            })
        ));
    }

    #[test]
    fn test_sma_last_two() {
        let sma = Sma::new(2);
        let (prev, last) = sma.last_two(&[1.0, 3.0, 5.0, 9.0]).unwrap();
        assert!((prev - 4.0).abs() < 1e-10);
        assert!((last - 7.0).abs() < 1e-10);

        assert!(sma.last_two(&[1.0, 3.0]).is_err());
    }
}

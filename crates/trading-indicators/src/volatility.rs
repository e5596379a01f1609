//! Volatility bands.

use trading_core::error::IndicatorError;
use trading_core::traits::Indicator;

/// Lower, middle and upper band for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLevels {
    pub lower: f64,
    /// Mean of the band window
    pub middle: f64,
    pub upper: f64,
}

impl BandLevels {
    pub fn touches_upper(&self, price: f64) -> bool {
        price >= self.upper
    }

    pub fn touches_lower(&self, price: f64) -> bool {
        price <= self.lower
    }
}

/// Bollinger Bands measured over the `period` closes before the latest one.
///
/// Bands are `mean ± num_std * sd` with the population standard deviation.
/// The latest close is excluded so it can be compared against the bands
/// without widening them.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    num_std: f64,
}

impl BollingerBands {
    pub fn new(period: usize, num_std: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(num_std > 0.0, "Std dev multiplier must be positive");
        Self { period, num_std }
    }
}

impl Indicator for BollingerBands {
    type Output = BandLevels;

    fn lookback(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }

    fn evaluate(&self, window: &[f64]) -> Result<BandLevels, IndicatorError> {
        let prior = &window[..window.len().saturating_sub(1)];
        if prior.len() < self.period {
            return Err(IndicatorError::InsufficientData {
                required: self.lookback(),
                available: window.len(),
            });
        }

        let n = prior.len() as f64;
        let mean = prior.iter().sum::<f64>() / n;
        let sd = (prior.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();

        Ok(BandLevels {
            lower: mean - self.num_std * sd,
            middle: mean,
            upper: mean + self.num_std * sd,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_exclude_latest_close() {
        let bb = BollingerBands::new(4, 2.0);
        // Prior window 2, 4, 6, 8: mean 5, sd sqrt(5)
        let bands = bb.latest(&[100.0, 2.0, 4.0, 6.0, 8.0, 1000.0]).unwrap();

        let sd = 5.0_f64.sqrt();
        assert!((bands.middle - 5.0).abs() < 1e-12);
        assert!((bands.lower - (5.0 - 2.0 * sd)).abs() < 1e-12);
        assert!((bands.upper - (5.0 + 2.0 * sd)).abs() < 1e-12);
    }

    #[test]
    fn test_flat_window_collapses_bands() {
        let bb = BollingerBands::new(5, 2.0);
        let bands = bb.latest(&[100.0; 6]).unwrap();
        assert_eq!(bands.lower, 100.0);
        assert_eq!(bands.upper, 100.0);
        assert!(bands.touches_lower(100.0) && bands.touches_upper(100.0));
    }

    #[test]
    fn test_needs_window_plus_one() {
        let bb = BollingerBands::new(5, 2.0);
        assert!(matches!(
            bb.latest(&[1.0, 2.0, 3.0, 4.0, 5.0]),
            Err(IndicatorError::InsufficientData {
                required: 6,
                available: 5
            })
        ));
    }

    #[test]
    fn test_band_touches() {
        let bands = BandLevels {
            lower: 90.0,
            middle: 100.0,
            upper: 110.0,
        };

        assert!(bands.touches_upper(110.0));
        assert!(!bands.touches_upper(105.0));
        assert!(bands.touches_lower(85.0));
        assert!(!bands.touches_lower(95.0));
    }
}

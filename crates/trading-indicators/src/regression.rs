//! Least-squares trend line.

use trading_core::error::IndicatorError;
use trading_core::traits::Indicator;

/// Fitted trend for one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendFit {
    /// Change per bar
    pub slope: f64,
    /// Value extrapolated one bar past the end of the window
    pub next: f64,
}

/// Ordinary least squares of close against bar index.
///
/// The window is fitted as `y = a + b * i` for `i = 0..period` and
/// projected to `i = period`.
#[derive(Debug, Clone)]
pub struct LinearTrend {
    period: usize,
}

impl LinearTrend {
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self { period }
    }
}

impl Indicator for LinearTrend {
    type Output = TrendFit;

    fn lookback(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "LinearTrend"
    }

    fn evaluate(&self, window: &[f64]) -> Result<TrendFit, IndicatorError> {
        let n = window.len() as f64;
        let x_mean = (n - 1.0) / 2.0;
        let y_mean = window.iter().sum::<f64>() / n;

        let (sxy, sxx) = window.iter().enumerate().fold((0.0, 0.0), |(sxy, sxx), (i, y)| {
            let dx = i as f64 - x_mean;
            (sxy + dx * (y - y_mean), sxx + dx * dx)
        });
        if sxx == 0.0 {
            return Err(IndicatorError::CalculationError(
                "degenerate regression window".to_string(),
            ));
        }

        let slope = sxy / sxx;
        let next = y_mean + slope * (n - x_mean);
        if !next.is_finite() {
            return Err(IndicatorError::CalculationError(format!(
                "non-finite trend projection: {}",
                next
            )));
        }
        Ok(TrendFit { slope, next })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_line() {
        let trend = LinearTrend::new(5);
        let data: Vec<f64> = (0..5).map(|i| 10.0 + 2.0 * i as f64).collect();

        let fit = trend.latest(&data).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-10);
        assert!((fit.next - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_uses_trailing_window() {
        let trend = LinearTrend::new(3);
        // Rising history, falling tail
        let data = vec![1.0, 2.0, 3.0, 4.0, 9.0, 6.0, 3.0];

        let fit = trend.latest(&data).unwrap();
        assert!(fit.slope < 0.0);
        assert!(fit.next.abs() < 1e-10);
    }

    #[test]
    fn test_flat_window_projects_flat() {
        let trend = LinearTrend::new(4);
        let fit = trend.latest(&[7.0, 7.0, 7.0, 7.0]).unwrap();
        assert!(fit.slope.abs() < 1e-12);
        assert!((fit.next - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_insufficient_data() {
        let trend = LinearTrend::new(4);
        assert!(matches!(
            trend.latest(&[1.0, 2.0]),
            Err(IndicatorError::InsufficientData {
                required: 4,
                available: 2
            })
        ));
    }

    #[test]
    fn test_non_finite_projection_is_error() {
        let trend = LinearTrend::new(2);
        assert!(matches!(
            trend.latest(&[f64::MAX, -f64::MAX]),
            Err(IndicatorError::CalculationError(_))
        ));
    }
}

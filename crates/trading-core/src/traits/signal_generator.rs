//! Signal generator trait definitions.

use crate::error::StrategyError;
use crate::types::{PriceSeries, Signal};
use async_trait::async_trait;

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Core strategy trait.
///
/// A generator turns the history fetched for one cycle into a directional
/// signal. It never touches positions or orders; reconciling the signal
/// against the account is the engine's job.
#[async_trait]
pub trait SignalGenerator: Send + Sync {
    /// Get the unique name of this strategy.
    fn name(&self) -> &str;

    /// Number of bars to fetch each cycle. Zero means no bars are needed.
    fn required_bars(&self) -> usize;

    /// Compute the signal for this cycle.
    ///
    /// Failing to compute a signal is an error, never `Signal::Neutral`.
    async fn generate(&self, symbol: &str, series: &PriceSeries) -> Result<Signal, StrategyError>;

    /// Get a description of the strategy.
    fn description(&self) -> &str {
        ""
    }
}

/// Fail with `InsufficientData` unless `series` has at least `required` bars.
pub fn ensure_bars(series: &PriceSeries, required: usize) -> Result<(), StrategyError> {
    if series.len() < required {
        return Err(StrategyError::InsufficientData {
            required,
            available: series.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bar, Timeframe};

    struct AlwaysLong;

    #[async_trait]
    impl SignalGenerator for AlwaysLong {
        fn name(&self) -> &str {
            "always-long"
        }

        fn required_bars(&self) -> usize {
            2
        }

        async fn generate(&self, _symbol: &str, series: &PriceSeries) -> Result<Signal, StrategyError> {
            ensure_bars(series, self.required_bars())?;
            Ok(Signal::Long)
        }
    }

    #[tokio::test]
    async fn test_generator_checks_history() {
        let generator = AlwaysLong;
        let short = PriceSeries::new("AAPL", Timeframe::Daily, vec![Bar::default()]);
        assert!(matches!(
            generator.generate("AAPL", &short).await,
            Err(StrategyError::InsufficientData {
                required: 2,
                available: 1
            })
        ));

        let enough = PriceSeries::new(
            "AAPL",
            Timeframe::Daily,
            vec![Bar::new(1, 1.0, 1.0, 1.0, 1.0, 1.0), Bar::new(2, 1.0, 1.0, 1.0, 1.0, 1.0)],
        );
        assert_eq!(generator.generate("AAPL", &enough).await.unwrap(), Signal::Long);
        assert_eq!(generator.description(), "");
    }
}

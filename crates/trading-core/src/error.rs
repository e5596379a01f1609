//! Error types for the trading system.

use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level trading system error.
#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("Sizing error: {0}")]
    Sizing(#[from] SizingError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),
}

impl TradingError {
    /// Whether the error only means "not enough history yet".
    ///
    /// The polling loop treats these cycles as skipped rather than failed.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            TradingError::Strategy(StrategyError::InsufficientData { .. })
        )
    }
}

/// Strategy-specific errors.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Strategy not found: {0}")]
    NotFound(String),

    #[error("Strategy initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Text source failed: {0}")]
    Source(#[from] DataError),

    #[error("Strategy error: {0}")]
    Internal(String),
}

impl From<IndicatorError> for StrategyError {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData {
                required,
                available,
            } => StrategyError::InsufficientData {
                required,
                available,
            },
            other => StrategyError::Internal(other.to_string()),
        }
    }
}

/// Broker-specific errors.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Order rejected: {0}")]
    OrderRejected(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Rate limited: retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Timed out after {secs}s waiting for {operation}")]
    Timeout { operation: String, secs: u64 },

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("API error: {0}")]
    ApiError(String),
}

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Order sizing errors.
#[derive(Error, Debug, PartialEq)]
pub enum SizingError {
    #[error("Invalid price for {symbol}: {price}")]
    InvalidPrice { symbol: String, price: Decimal },

    #[error("Share count for {symbol} out of range: {budget} / {price}")]
    QuantityOverflow {
        symbol: String,
        budget: Decimal,
        price: Decimal,
    },
}

/// Errors raised while submitting a reconciliation plan.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("{intent} order for {symbol} failed: {source}")]
    Submission {
        symbol: String,
        intent: String,
        #[source]
        source: BrokerError,
    },

    #[error("Close order {order_id} for {symbol} not confirmed ({reason}); open leg skipped")]
    FlipAborted {
        symbol: String,
        order_id: String,
        reason: String,
    },
}

/// Sentiment classifier errors.
///
/// A failure while analyzing one snippet only excludes that snippet; a
/// failure during construction is reported to whoever builds the classifier.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Classifier initialization failed: {0}")]
    Initialization(String),

    #[error("Classifier request failed: {0}")]
    Request(String),

    #[error("Unexpected classifier output: {0}")]
    Malformed(String),

    #[error("No sentiment-bearing terms in text")]
    Inconclusive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_error_maps_to_insufficient_data() {
        let err: StrategyError = IndicatorError::InsufficientData {
            required: 21,
            available: 5,
        }
        .into();
        assert!(matches!(
            err,
            StrategyError::InsufficientData {
                required: 21,
                available: 5
            }
        ));

        let top: TradingError = err.into();
        assert!(top.is_insufficient_data());
    }

    #[test]
    fn test_other_errors_are_not_insufficient_data() {
        let err: TradingError = BrokerError::Connection("reset".into()).into();
        assert!(!err.is_insufficient_data());
    }
}

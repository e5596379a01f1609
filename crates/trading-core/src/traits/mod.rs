//! Core traits for the trading system.

mod broker;
mod indicator;
mod signal_generator;
mod text_source;

pub use broker::{MarketData, OrderGateway};
pub use indicator::Indicator;
pub use signal_generator::{ensure_bars, SignalGenerator, StrategyConfig};
pub use text_source::{Polarity, Sentiment, SentimentClassifier, TextSource};

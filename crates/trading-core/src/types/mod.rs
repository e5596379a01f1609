//! Core data types for the trading system.

mod ohlcv;
mod order;
mod position;
mod signal;
mod timeframe;

pub use ohlcv::{Bar, PriceSeries, Trade};
pub use order::{OrderAck, OrderRequest, OrderStatus, OrderType, Side, TimeInForce};
pub use position::{AccountState, Position};
pub use signal::Signal;
pub use timeframe::Timeframe;

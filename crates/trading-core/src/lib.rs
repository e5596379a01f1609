//! Core types and traits for the trading system.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, PriceSeries, Trade)
//! - Order, position and account snapshot types
//! - The directional trading signal
//! - Adapter contracts for market data, order submission and text sources
//! - The error taxonomy shared by every crate

pub mod types;
pub mod traits;
pub mod error;

pub use error::TradingError;
pub use types::*;
pub use traits::*;

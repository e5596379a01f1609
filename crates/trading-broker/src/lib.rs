//! Brokerage adapters.
//!
//! - [`AlpacaClient`]: market data and order submission over the Alpaca REST API
//! - [`AlpacaNewsSource`]: Alpaca news as a sentiment text source
//! - [`PaperBroker`]: in-memory broker for tests and offline runs
//! - [`DryRunGateway`]: logs orders without sending them

mod alpaca;
mod dry_run;
mod paper;

pub use alpaca::{AlpacaClient, AlpacaConfig, AlpacaNewsSource, DATA_URL, LIVE_URL, PAPER_URL};
pub use dry_run::DryRunGateway;
pub use paper::PaperBroker;

//! Trading engine.
//!
//! Reconciles signals against positions, submits the resulting orders and
//! drives the polling loop.

mod executor;
mod reconciler;
mod timeout;
mod trader;

pub use executor::{ExecutionReport, FlipSettlement, OrderExecutor};
pub use reconciler::{OrderIntent, PlannedOrder, Reconciler};
pub use timeout::with_timeout;
pub use trader::{CycleReport, RunSummary, Trader, TraderConfig};

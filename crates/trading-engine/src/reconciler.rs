//! Position reconciliation.
//!
//! Maps a signal and the current position onto the orders that move the
//! account to the signalled side.

use serde::{Deserialize, Serialize};
use std::fmt;
use trading_core::types::{OrderRequest, Position, Side, Signal, TimeInForce};

/// Why an order is part of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderIntent {
    /// Flattens the existing position
    Close,
    /// Establishes the new position
    Open,
}

impl fmt::Display for OrderIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderIntent::Close => write!(f, "close"),
            OrderIntent::Open => write!(f, "open"),
        }
    }
}

/// One order in a reconciliation plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedOrder {
    pub intent: OrderIntent,
    pub request: OrderRequest,
}

/// Stateless mapping from `(signal, position)` to orders.
///
/// | Signal  | Flat      | Long                 | Short                |
/// |---------|-----------|----------------------|----------------------|
/// | Long    | open buy  | hold                 | close buy, open buy  |
/// | Short   | open sell | close sell, open sell| hold                 |
/// | Neutral | hold      | hold                 | hold                 |
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    time_in_force: TimeInForce,
}

impl Reconciler {
    pub fn new(time_in_force: TimeInForce) -> Self {
        Self { time_in_force }
    }

    /// Build the ordered plan, close leg first.
    ///
    /// A zero-quantity position counts as flat. A `target_quantity` of zero
    /// drops the open leg but keeps the close leg of a flip.
    pub fn reconcile(
        &self,
        symbol: &str,
        signal: Signal,
        position: Option<&Position>,
        target_quantity: u64,
    ) -> Vec<PlannedOrder> {
        let held = position.map(|p| p.quantity).unwrap_or(0);

        let side = match signal {
            Signal::Long => Side::Buy,
            Signal::Short => Side::Sell,
            Signal::Neutral => return Vec::new(),
        };

        let aligned = match side {
            Side::Buy => held > 0,
            Side::Sell => held < 0,
        };
        if aligned {
            return Vec::new();
        }

        let mut plan = Vec::with_capacity(2);
        if held != 0 {
            plan.push(self.planned(OrderIntent::Close, symbol, side, held.unsigned_abs()));
        }
        if target_quantity > 0 {
            plan.push(self.planned(OrderIntent::Open, symbol, side, target_quantity));
        }
        plan
    }

    fn planned(&self, intent: OrderIntent, symbol: &str, side: Side, quantity: u64) -> PlannedOrder {
        PlannedOrder {
            intent,
            request: OrderRequest::market(symbol, side, quantity, self.time_in_force),
        }
    }
}

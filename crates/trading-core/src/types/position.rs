//! Position and account snapshot types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Snapshot of the position held in a single security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol
    pub symbol: String,
    /// Number of shares (positive for long, negative for short)
    pub quantity: i64,
    /// Average entry price, informational only
    pub avg_entry_price: Decimal,
}

impl Position {
    /// Create a new position.
    pub fn new(symbol: impl Into<String>, quantity: i64, avg_entry_price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            avg_entry_price,
        }
    }

    /// Check if this is a long position.
    pub fn is_long(&self) -> bool {
        self.quantity > 0
    }

    /// Check if this is a short position.
    pub fn is_short(&self) -> bool {
        self.quantity < 0
    }

    /// Check if the position is flat (no shares).
    pub fn is_flat(&self) -> bool {
        self.quantity == 0
    }

    /// Get the absolute quantity.
    pub fn abs_quantity(&self) -> u64 {
        self.quantity.unsigned_abs()
    }
}

/// Account figures read once per cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountState {
    /// Capital available for new positions
    pub buying_power: Decimal,
    /// Available cash
    pub cash: Decimal,
    /// Total equity
    pub equity: Decimal,
}

impl AccountState {
    /// Account with only buying power known.
    pub fn with_buying_power(buying_power: Decimal) -> Self {
        Self {
            buying_power,
            cash: buying_power,
            equity: buying_power,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_position_sides() {
        let long = Position::new("AAPL", 10, dec!(150.00));
        assert!(long.is_long());
        assert!(!long.is_short());

        let short = Position::new("AAPL", -10, dec!(150.00));
        assert!(short.is_short());
        assert_eq!(short.abs_quantity(), 10);

        let flat = Position::new("AAPL", 0, Decimal::ZERO);
        assert!(flat.is_flat());
        assert!(!flat.is_long() && !flat.is_short());
    }

    #[test]
    fn test_account_with_buying_power() {
        let account = AccountState::with_buying_power(dec!(2500));
        assert_eq!(account.buying_power, dec!(2500));
        assert_eq!(account.equity, dec!(2500));
    }
}

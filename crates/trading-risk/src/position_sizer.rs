//! Order sizing.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trading_core::error::SizingError;
use tracing::debug;

/// Turns a dollar budget into a whole number of shares.
///
/// `quantity = floor(min(dollar_amount, buying_power) / price)`, optionally
/// capped at `max_shares`. A zero result means "do not trade".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderSizer {
    max_shares: Option<u64>,
}

impl OrderSizer {
    /// Create a sizer without a share cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum shares per order.
    pub fn with_max_shares(mut self, max: u64) -> Self {
        self.max_shares = Some(max);
        self
    }

    /// Calculate the order quantity.
    ///
    /// Fails when `current_price` is not positive or the share count does
    /// not fit the order quantity. Negative budgets size to zero.
    pub fn size(
        &self,
        symbol: &str,
        dollar_amount: Decimal,
        current_price: Decimal,
        buying_power: Decimal,
    ) -> Result<u64, SizingError> {
        if current_price <= Decimal::ZERO {
            return Err(SizingError::InvalidPrice {
                symbol: symbol.to_string(),
                price: current_price,
            });
        }

        let budget = dollar_amount.min(buying_power).max(Decimal::ZERO);
        let quantity = budget
            .checked_div(current_price)
            .and_then(|shares| shares.floor().to_u64());
        let Some(mut quantity) = quantity else {
            return Err(SizingError::QuantityOverflow {
                symbol: symbol.to_string(),
                budget,
                price: current_price,
            });
        };

        if let Some(max) = self.max_shares {
            quantity = quantity.min(max);
        }

        debug!(
            symbol,
            %dollar_amount,
            %buying_power,
            %current_price,
            quantity,
            "sized order"
        );
        Ok(quantity)
    }
}

//! Brokerage adapter contracts.

use crate::error::BrokerError;
use crate::types::{AccountState, Bar, OrderAck, OrderRequest, OrderStatus, Position, Timeframe, Trade};
use async_trait::async_trait;

/// Read side of the brokerage: prices, positions and account figures.
///
/// Every call returns a fresh snapshot; callers must not cache results
/// across cycles.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch the most recent bars.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `timeframe` - The bar timeframe
    /// * `limit` - Maximum number of bars
    ///
    /// # Returns
    /// Up to `limit` bars ordered from oldest to newest
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, BrokerError>;

    /// Get the latest trade for a symbol.
    async fn get_latest_trade(&self, symbol: &str) -> Result<Trade, BrokerError>;

    /// Get all open positions.
    async fn list_positions(&self) -> Result<Vec<Position>, BrokerError>;

    /// Get account figures.
    async fn get_account(&self) -> Result<AccountState, BrokerError>;

    /// Get the open position for a symbol, if any.
    ///
    /// A position reported with zero quantity counts as no position.
    async fn position(&self, symbol: &str) -> Result<Option<Position>, BrokerError> {
        let positions = self.list_positions().await?;
        Ok(positions
            .into_iter()
            .find(|p| p.symbol == symbol && !p.is_flat()))
    }

    /// Get the adapter name.
    fn name(&self) -> &str;
}

/// Write side of the brokerage.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit a new order.
    ///
    /// # Returns
    /// The broker's acknowledgement. Fills are not tracked beyond this point.
    async fn submit_order(&self, request: OrderRequest) -> Result<OrderAck, BrokerError>;

    /// Get the current status of a previously submitted order.
    async fn order_status(&self, order_id: &str) -> Result<OrderStatus, BrokerError>;

    /// Get the gateway name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct FixedPositions(Vec<Position>);

    #[async_trait]
    impl MarketData for FixedPositions {
        async fn get_bars(
            &self,
            _symbol: &str,
            _timeframe: Timeframe,
            _limit: usize,
        ) -> Result<Vec<Bar>, BrokerError> {
            Ok(vec![])
        }

        async fn get_latest_trade(&self, symbol: &str) -> Result<Trade, BrokerError> {
            Ok(Trade {
                symbol: symbol.to_string(),
                price: dec!(100),
                timestamp: None,
            })
        }

        async fn list_positions(&self) -> Result<Vec<Position>, BrokerError> {
            Ok(self.0.clone())
        }

        async fn get_account(&self) -> Result<AccountState, BrokerError> {
            Ok(AccountState::default())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_position_lookup_by_symbol() {
        let data = FixedPositions(vec![
            Position::new("MSFT", 5, dec!(300)),
            Position::new("AAPL", -3, dec!(150)),
        ]);

        let pos = data.position("AAPL").await.unwrap().unwrap();
        assert_eq!(pos.quantity, -3);
        assert!(data.position("TSLA").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_flat_position_is_none() {
        let data = FixedPositions(vec![Position::new("AAPL", 0, dec!(150))]);
        assert!(data.position("AAPL").await.unwrap().is_none());
    }
}

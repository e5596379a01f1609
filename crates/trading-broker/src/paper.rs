//! Paper trading broker for tests and simulation.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use trading_core::error::BrokerError;
use trading_core::traits::{MarketData, OrderGateway};
use trading_core::types::{
    AccountState, Bar, OrderAck, OrderRequest, OrderStatus, Position, Side, Timeframe, Trade,
};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
struct PaperState {
    cash: Decimal,
    prices: HashMap<String, Decimal>,
    bars: HashMap<String, Vec<Bar>>,
    positions: HashMap<String, Position>,
    orders: HashMap<String, OrderStatus>,
    submitted: Vec<OrderRequest>,
}

/// In-memory broker that fills market orders immediately at the last price.
///
/// Buying power equals cash, floored at zero. Short sales credit cash.
pub struct PaperBroker {
    state: Mutex<PaperState>,
}

impl PaperBroker {
    /// Create a new paper broker with initial cash.
    pub fn new(initial_cash: Decimal) -> Self {
        Self {
            state: Mutex::new(PaperState {
                cash: initial_cash,
                ..Default::default()
            }),
        }
    }

    /// Set the last trade price for a symbol.
    pub fn with_price(self, symbol: &str, price: Decimal) -> Self {
        self.set_price(symbol, price);
        self
    }

    /// Set the bar history for a symbol, oldest first.
    pub fn with_bars(self, symbol: &str, bars: Vec<Bar>) -> Self {
        if let Ok(mut state) = self.state() {
            state.bars.insert(symbol.to_string(), bars);
        }
        self
    }

    /// Seed an existing position.
    pub fn with_position(self, symbol: &str, quantity: i64, avg_entry_price: Decimal) -> Self {
        if let Ok(mut state) = self.state() {
            state
                .positions
                .insert(symbol.to_string(), Position::new(symbol, quantity, avg_entry_price));
        }
        self
    }

    pub fn set_price(&self, symbol: &str, price: Decimal) {
        if let Ok(mut state) = self.state() {
            state.prices.insert(symbol.to_string(), price);
        }
    }

    /// Orders received so far, in submission order.
    pub fn submitted(&self) -> Vec<OrderRequest> {
        self.state().map(|s| s.submitted.clone()).unwrap_or_default()
    }

    /// Signed quantity currently held.
    pub fn position_quantity(&self, symbol: &str) -> i64 {
        self.state()
            .ok()
            .and_then(|s| s.positions.get(symbol).map(|p| p.quantity))
            .unwrap_or(0)
    }

    pub fn cash(&self) -> Decimal {
        self.state().map(|s| s.cash).unwrap_or_default()
    }

    fn state(&self) -> Result<MutexGuard<'_, PaperState>, BrokerError> {
        self.state
            .lock()
            .map_err(|_| BrokerError::ApiError("paper broker state poisoned".to_string()))
    }
}

#[async_trait]
impl MarketData for PaperBroker {
    async fn get_bars(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, BrokerError> {
        let state = self.state()?;
        let bars = state.bars.get(symbol).map(Vec::as_slice).unwrap_or(&[]);
        let start = bars.len().saturating_sub(limit);
        Ok(bars[start..].to_vec())
    }

    async fn get_latest_trade(&self, symbol: &str) -> Result<Trade, BrokerError> {
        let state = self.state()?;
        let price = state
            .prices
            .get(symbol)
            .copied()
            .ok_or_else(|| BrokerError::ApiError(format!("no price for {}", symbol)))?;
        Ok(Trade {
            symbol: symbol.to_string(),
            price,
            timestamp: Some(Utc::now()),
        })
    }

    async fn list_positions(&self) -> Result<Vec<Position>, BrokerError> {
        let state = self.state()?;
        Ok(state.positions.values().cloned().collect())
    }

    async fn get_account(&self) -> Result<AccountState, BrokerError> {
        let state = self.state()?;
        let holdings: Decimal = state
            .positions
            .values()
            .map(|p| {
                let price = state.prices.get(&p.symbol).copied().unwrap_or(p.avg_entry_price);
                price * Decimal::from(p.quantity)
            })
            .sum();

        Ok(AccountState {
            buying_power: state.cash.max(Decimal::ZERO),
            cash: state.cash,
            equity: state.cash + holdings,
        })
    }

    fn name(&self) -> &str {
        "paper"
    }
}

#[async_trait]
impl OrderGateway for PaperBroker {
    async fn submit_order(&self, request: OrderRequest) -> Result<OrderAck, BrokerError> {
        if request.quantity == 0 {
            return Err(BrokerError::OrderRejected("quantity must be positive".to_string()));
        }

        let mut state = self.state()?;
        let price = state
            .prices
            .get(&request.symbol)
            .copied()
            .ok_or_else(|| BrokerError::OrderRejected(format!("no price for {}", request.symbol)))?;

        let quantity = Decimal::from(request.quantity);
        let signed = match request.side {
            Side::Buy => request.quantity as i64,
            Side::Sell => -(request.quantity as i64),
        };

        match request.side {
            Side::Buy => state.cash -= price * quantity,
            Side::Sell => state.cash += price * quantity,
        }

        let position = state
            .positions
            .entry(request.symbol.clone())
            .or_insert_with(|| Position::new(&request.symbol, 0, Decimal::ZERO));
        let previous = position.quantity;
        position.quantity += signed;
        if previous == 0 || previous.signum() != position.quantity.signum() {
            position.avg_entry_price = price;
        }
        if position.is_flat() {
            state.positions.remove(&request.symbol);
        }

        let id = Uuid::new_v4().to_string();
        state.orders.insert(id.clone(), OrderStatus::Filled);
        state.submitted.push(request.clone());
        debug!(order = %request, %price, "paper fill");

        Ok(OrderAck {
            id,
            client_order_id: request.client_order_id,
            symbol: request.symbol,
            side: request.side,
            quantity: request.quantity,
            status: OrderStatus::Filled,
            submitted_at: Utc::now(),
        })
    }

    async fn order_status(&self, order_id: &str) -> Result<OrderStatus, BrokerError> {
        let state = self.state()?;
        state
            .orders
            .get(order_id)
            .copied()
            .ok_or_else(|| BrokerError::OrderNotFound(order_id.to_string()))
    }

    fn name(&self) -> &str {
        "paper"
    }
}

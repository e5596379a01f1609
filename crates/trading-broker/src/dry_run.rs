//! Order gateway that logs orders instead of sending them.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use trading_core::error::BrokerError;
use trading_core::traits::OrderGateway;
use trading_core::types::{OrderAck, OrderRequest, OrderStatus};
use tracing::info;
use uuid::Uuid;

/// Acknowledges every order as filled without touching the brokerage.
///
/// Positions read from the real account never change, so a dry run
/// repeats the same plan each cycle.
#[derive(Debug, Default)]
pub struct DryRunGateway {
    submitted: Mutex<Vec<OrderRequest>>,
}

impl DryRunGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders recorded so far.
    pub fn submitted(&self) -> Vec<OrderRequest> {
        self.submitted
            .lock()
            .map(|orders| orders.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl OrderGateway for DryRunGateway {
    async fn submit_order(&self, request: OrderRequest) -> Result<OrderAck, BrokerError> {
        info!(
            symbol = %request.symbol,
            side = %request.side,
            quantity = request.quantity,
            client_order_id = %request.client_order_id,
            "dry run: order not sent"
        );

        let ack = OrderAck {
            id: format!("dry-{}", Uuid::new_v4()),
            client_order_id: request.client_order_id.clone(),
            symbol: request.symbol.clone(),
            side: request.side,
            quantity: request.quantity,
            status: OrderStatus::Filled,
            submitted_at: Utc::now(),
        };

        self.submitted
            .lock()
            .map_err(|_| BrokerError::ApiError("dry run state poisoned".into()))?
            .push(request);
        Ok(ack)
    }

    async fn order_status(&self, _order_id: &str) -> Result<OrderStatus, BrokerError> {
        Ok(OrderStatus::Filled)
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}

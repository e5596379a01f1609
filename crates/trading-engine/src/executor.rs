//! Order submission for reconciliation plans.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use trading_core::error::{BrokerError, ExecutionError};
use trading_core::traits::OrderGateway;
use trading_core::types::{OrderAck, OrderStatus};
use tracing::{info, warn};

use crate::reconciler::{OrderIntent, PlannedOrder};
use crate::timeout::with_timeout;

/// What counts as a completed close before the following open is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FlipSettlement {
    /// The broker accepted the close order
    OnAck,
    /// The close order reports `filled` within `timeout_ms`
    AwaitFill { timeout_ms: u64, poll_interval_ms: u64 },
}

impl Default for FlipSettlement {
    fn default() -> Self {
        FlipSettlement::AwaitFill {
            timeout_ms: 10_000,
            poll_interval_ms: 500,
        }
    }
}

/// Orders acknowledged while running a plan, and the failure that stopped it.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub acks: Vec<OrderAck>,
    pub failure: Option<ExecutionError>,
}

impl ExecutionReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Drop the acknowledgements and keep only the outcome.
    pub fn into_result(self) -> Result<Vec<OrderAck>, ExecutionError> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(self.acks),
        }
    }
}

/// Submits plans strictly in order.
pub struct OrderExecutor {
    gateway: Arc<dyn OrderGateway>,
    settlement: FlipSettlement,
    call_timeout: Duration,
}

impl OrderExecutor {
    pub fn new(gateway: Arc<dyn OrderGateway>, settlement: FlipSettlement, call_timeout: Duration) -> Self {
        Self {
            gateway,
            settlement,
            call_timeout,
        }
    }

    /// Current status of a submitted order.
    pub async fn order_status(&self, order_id: &str) -> Result<OrderStatus, BrokerError> {
        with_timeout("order_status", self.call_timeout, self.gateway.order_status(order_id)).await
    }

    /// Submit every order of the plan.
    ///
    /// The first failure stops the plan. An open that follows a close is only
    /// sent once the close is settled.
    pub async fn execute(&self, plan: Vec<PlannedOrder>) -> ExecutionReport {
        let mut report = ExecutionReport::default();
        let mut pending_close: Option<OrderAck> = None;

        for planned in plan {
            if planned.intent == OrderIntent::Open {
                if let Some(close) = pending_close.take() {
                    if let Err(err) = self.settle(&close).await {
                        warn!(symbol = %close.symbol, order_id = %close.id, error = %err, "flip aborted");
                        report.failure = Some(err);
                        return report;
                    }
                }
            }

            let request = planned.request;
            let description = request.to_string();
            let submitted = with_timeout(
                "submit_order",
                self.call_timeout,
                self.gateway.submit_order(request.clone()),
            )
            .await;

            match submitted {
                Ok(ack) => {
                    info!(
                        intent = %planned.intent,
                        order = %description,
                        order_id = %ack.id,
                        status = ?ack.status,
                        "order submitted"
                    );
                    if planned.intent == OrderIntent::Close {
                        pending_close = Some(ack.clone());
                    }
                    report.acks.push(ack);
                }
                Err(source) => {
                    report.failure = Some(ExecutionError::Submission {
                        symbol: request.symbol,
                        intent: planned.intent.to_string(),
                        source,
                    });
                    return report;
                }
            }
        }

        report
    }

    /// Confirm a close order according to the settlement mode.
    async fn settle(&self, close: &OrderAck) -> Result<(), ExecutionError> {
        let (timeout, poll_interval) = match self.settlement {
            FlipSettlement::OnAck => return Ok(()),
            FlipSettlement::AwaitFill {
                timeout_ms,
                poll_interval_ms,
            } => (
                Duration::from_millis(timeout_ms),
                Duration::from_millis(poll_interval_ms),
            ),
        };

        let aborted = |reason: String| ExecutionError::FlipAborted {
            symbol: close.symbol.clone(),
            order_id: close.id.clone(),
            reason,
        };

        let deadline = Instant::now() + timeout;
        let mut status = close.status;

        loop {
            if status == OrderStatus::Filled {
                return Ok(());
            }
            if status.is_terminal() {
                return Err(aborted(format!("close order ended {:?}", status)));
            }
            if Instant::now() >= deadline {
                return Err(aborted(format!(
                    "not filled within {}ms, last status {:?}",
                    timeout.as_millis(),
                    status
                )));
            }

            tokio::time::sleep(poll_interval.min(deadline.saturating_duration_since(Instant::now()))).await;

            status = self
                .order_status(&close.id)
                .await
                .map_err(|e| aborted(e.to_string()))?;
        }
    }
}

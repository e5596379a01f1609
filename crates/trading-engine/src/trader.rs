//! The polling loop.
//!
//! One cycle reads the account, asks the strategy for a signal, reconciles
//! it against the position and submits the resulting orders. Cycles run
//! strictly one after another with a fixed pause in between.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use trading_core::error::{ExecutionError, TradingError};
use trading_core::traits::{MarketData, OrderGateway, SignalGenerator};
use trading_core::types::{OrderAck, PriceSeries, Signal, TimeInForce, Timeframe};
use trading_risk::OrderSizer;
use tracing::{error, info, warn};

use crate::executor::{FlipSettlement, OrderExecutor};
use crate::reconciler::Reconciler;
use crate::timeout::with_timeout;

/// Settings for one trader instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraderConfig {
    /// Symbol to trade
    pub symbol: String,
    /// Dollar budget for each opening order
    pub dollar_amount: Decimal,
    /// Pause between cycles
    pub check_interval: Duration,
    /// Bar timeframe handed to the market data adapter
    pub timeframe: Timeframe,
    pub time_in_force: TimeInForce,
    /// Deadline for each adapter call
    pub call_timeout: Duration,
    pub flip_settlement: FlipSettlement,
    /// Optional cap on shares per opening order
    pub max_shares: Option<u64>,
    /// Stop after this many cycles
    pub max_cycles: Option<u64>,
}

impl Default for TraderConfig {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            dollar_amount: Decimal::from(1000),
            check_interval: Duration::from_secs(10),
            timeframe: Timeframe::Daily,
            time_in_force: TimeInForce::GTC,
            call_timeout: Duration::from_secs(30),
            flip_settlement: FlipSettlement::default(),
            max_shares: None,
            max_cycles: None,
        }
    }
}

/// What happened in one successful cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub signal: Signal,
    /// Signed quantity held when the cycle started
    pub position: i64,
    /// Shares the opening order was sized to; zero when no price was needed
    pub target_quantity: u64,
    pub acks: Vec<OrderAck>,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub cycles: u64,
    /// Cycles that ended in an error
    pub failures: u64,
    /// Cycles skipped for lack of history
    pub skipped: u64,
    pub orders_submitted: u64,
}

/// Drives one strategy against one symbol.
pub struct Trader {
    config: TraderConfig,
    market: Arc<dyn MarketData>,
    strategy: Box<dyn SignalGenerator>,
    sizer: OrderSizer,
    reconciler: Reconciler,
    executor: OrderExecutor,
    /// Close order left working by an aborted flip
    unsettled_close: Mutex<Option<String>>,
}

impl Trader {
    pub fn new(
        config: TraderConfig,
        market: Arc<dyn MarketData>,
        gateway: Arc<dyn OrderGateway>,
        strategy: Box<dyn SignalGenerator>,
    ) -> Self {
        let mut sizer = OrderSizer::new();
        if let Some(max) = config.max_shares {
            sizer = sizer.with_max_shares(max);
        }

        Self {
            reconciler: Reconciler::new(config.time_in_force),
            executor: OrderExecutor::new(gateway, config.flip_settlement, config.call_timeout),
            sizer,
            market,
            strategy,
            config,
            unsettled_close: Mutex::new(None),
        }
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Check that the brokerage session works before the loop starts.
    pub async fn preflight(&self) -> Result<(), TradingError> {
        let account = with_timeout("get_account", self.config.call_timeout, self.market.get_account()).await?;
        info!(
            adapter = self.market.name(),
            buying_power = %account.buying_power,
            equity = %account.equity,
            "brokerage session ready"
        );
        Ok(())
    }

    /// Run cycles until `shutdown` turns true or `max_cycles` is reached.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> RunSummary {
        let mut summary = RunSummary::default();
        info!(
            symbol = %self.config.symbol,
            strategy = self.strategy.name(),
            interval_secs = self.config.check_interval.as_secs(),
            "trader started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            summary.cycles += 1;
            match self.cycle(&mut summary).await {
                Ok(report) => {
                    if report.acks.is_empty() {
                        info!(signal = %report.signal, position = report.position, "no action taken");
                    }
                }
                Err(e) if e.is_insufficient_data() => {
                    summary.skipped += 1;
                    warn!(
                        symbol = %self.config.symbol,
                        strategy = self.strategy.name(),
                        error = %e,
                        "cycle skipped"
                    );
                }
                Err(e) => {
                    summary.failures += 1;
                    error!(
                        symbol = %self.config.symbol,
                        strategy = self.strategy.name(),
                        error = %e,
                        "cycle failed"
                    );
                }
            }

            if self.config.max_cycles.is_some_and(|max| summary.cycles >= max) {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.check_interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(
            cycles = summary.cycles,
            failures = summary.failures,
            skipped = summary.skipped,
            orders = summary.orders_submitted,
            "trader stopped"
        );
        summary
    }

    /// Run a single cycle.
    pub async fn run_cycle(&self) -> Result<CycleReport, TradingError> {
        self.cycle(&mut RunSummary::default()).await
    }

    async fn cycle(&self, summary: &mut RunSummary) -> Result<CycleReport, TradingError> {
        let symbol = self.config.symbol.as_str();
        let limit = self.config.call_timeout;

        let position = with_timeout("list_positions", limit, self.market.position(symbol)).await?;
        let account = with_timeout("get_account", limit, self.market.get_account()).await?;

        let required = self.strategy.required_bars();
        let series = if required > 0 {
            let bars = with_timeout(
                "get_bars",
                limit,
                self.market.get_bars(symbol, self.config.timeframe, required),
            )
            .await?;
            PriceSeries::new(symbol, self.config.timeframe, bars)
        } else {
            PriceSeries::empty(symbol, self.config.timeframe)
        };

        let signal = self.strategy.generate(symbol, &series).await?;
        let held = position.as_ref().map(|p| p.quantity).unwrap_or(0);
        info!(symbol, %signal, position = held, "signal computed");

        let target_quantity = if signal.is_directional() {
            let trade = with_timeout("get_latest_trade", limit, self.market.get_latest_trade(symbol)).await?;
            let quantity =
                self.sizer
                    .size(symbol, self.config.dollar_amount, trade.price, account.buying_power)?;
            if quantity == 0 {
                info!(
                    symbol,
                    price = %trade.price,
                    buying_power = %account.buying_power,
                    "computed quantity is zero, no opening order"
                );
            }
            quantity
        } else {
            0
        };

        let plan = self
            .reconciler
            .reconcile(symbol, signal, position.as_ref(), target_quantity);

        let acks = if plan.is_empty() {
            Vec::new()
        } else if let Some(order_id) = self.working_close().await? {
            info!(symbol, %order_id, "earlier close order still working, holding off");
            Vec::new()
        } else {
            let report = self.executor.execute(plan).await;
            summary.orders_submitted += report.acks.len() as u64;
            if let Some(ExecutionError::FlipAborted { order_id, .. }) = &report.failure {
                self.remember_close(Some(order_id.clone()));
            }
            report.into_result()?
        };

        Ok(CycleReport {
            signal,
            position: held,
            target_quantity,
            acks,
        })
    }

    /// The aborted close order, if the broker still reports it open.
    async fn working_close(&self) -> Result<Option<String>, TradingError> {
        let pending = self
            .unsettled_close
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(order_id) = pending else {
            return Ok(None);
        };

        let status = self.executor.order_status(&order_id).await?;
        if status.is_terminal() {
            info!(%order_id, ?status, "earlier close order settled");
            self.remember_close(None);
            return Ok(None);
        }
        Ok(Some(order_id))
    }

    fn remember_close(&self, order_id: Option<String>) {
        *self.unsettled_close.lock().unwrap_or_else(PoisonError::into_inner) = order_id;
    }
}

//! Order types and structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Wire representation used by the brokerage API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type. Only market orders are issued by the trader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Market order - execute immediately at best available price
    #[default]
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "market",
        }
    }
}

/// Time in force for orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Valid for the trading day only
    Day,
    /// Good til canceled
    #[default]
    #[serde(rename = "gtc")]
    GTC,
    /// Immediate or cancel
    #[serde(rename = "ioc")]
    IOC,
    /// Fill or kill
    #[serde(rename = "fok")]
    FOK,
    /// At market open
    #[serde(rename = "opg")]
    OPG,
    /// At market close
    #[serde(rename = "cls")]
    CLS,
}

impl TimeInForce {
    /// Wire representation used by the brokerage API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Day => "day",
            TimeInForce::GTC => "gtc",
            TimeInForce::IOC => "ioc",
            TimeInForce::FOK => "fok",
            TimeInForce::OPG => "opg",
            TimeInForce::CLS => "cls",
        }
    }
}

impl FromStr for TimeInForce {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(TimeInForce::Day),
            "gtc" => Ok(TimeInForce::GTC),
            "ioc" => Ok(TimeInForce::IOC),
            "fok" => Ok(TimeInForce::FOK),
            "opg" => Ok(TimeInForce::OPG),
            "cls" => Ok(TimeInForce::CLS),
            _ => Err(format!("Invalid time in force: {}", s)),
        }
    }
}

/// Order status as reported by the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order received but not yet routed
    Pending,
    /// Order accepted by broker/exchange
    Accepted,
    /// Order partially filled
    PartiallyFilled,
    /// Order completely filled
    Filled,
    /// Order canceled
    Canceled,
    /// Order rejected
    Rejected,
    /// Order expired
    Expired,
}

impl OrderStatus {
    /// Check if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled
                | OrderStatus::Canceled
                | OrderStatus::Rejected
                | OrderStatus::Expired
        )
    }

    /// Map a brokerage status string onto the local enum.
    pub fn from_broker(status: &str) -> Self {
        match status {
            "partially_filled" => OrderStatus::PartiallyFilled,
            "filled" => OrderStatus::Filled,
            "canceled" | "done_for_day" | "replaced" => OrderStatus::Canceled,
            "rejected" | "suspended" => OrderStatus::Rejected,
            "expired" => OrderStatus::Expired,
            "accepted" | "accepted_for_bidding" | "calculated" | "stopped" => {
                OrderStatus::Accepted
            }
            _ => OrderStatus::Pending,
        }
    }
}

/// Order request for submitting new orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Symbol to trade
    pub symbol: String,
    /// Whole shares to trade, always positive
    pub quantity: u64,
    /// Buy or sell
    pub side: Side,
    /// Type of order
    pub order_type: OrderType,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Client-provided order ID
    pub client_order_id: String,
}

impl OrderRequest {
    /// Create a market order request.
    pub fn market(
        symbol: impl Into<String>,
        side: Side,
        quantity: u64,
        time_in_force: TimeInForce,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            side,
            order_type: OrderType::Market,
            time_in_force,
            client_order_id: Uuid::new_v4().to_string(),
        }
    }

    /// Check whether two requests ask for the same trade, ignoring the client id.
    pub fn same_trade(&self, other: &OrderRequest) -> bool {
        self.symbol == other.symbol
            && self.quantity == other.quantity
            && self.side == other.side
            && self.order_type == other.order_type
            && self.time_in_force == other.time_in_force
    }
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({}, {})",
            self.side,
            self.quantity,
            self.symbol,
            self.order_type.as_str(),
            self.time_in_force.as_str()
        )
    }
}

/// Broker acknowledgement of a submitted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAck {
    /// Broker-assigned order ID
    pub id: String,
    /// Client-provided order ID echoed back
    pub client_order_id: String,
    pub symbol: String,
    pub side: Side,
    pub quantity: u64,
    pub status: OrderStatus,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_request_market() {
        let request = OrderRequest::market("AAPL", Side::Buy, 100, TimeInForce::GTC);
        assert_eq!(request.symbol, "AAPL");
        assert_eq!(request.side, Side::Buy);
        assert_eq!(request.order_type, OrderType::Market);
        assert_eq!(request.quantity, 100);
        assert!(Uuid::parse_str(&request.client_order_id).is_ok());
    }

    #[test]
    fn test_same_trade_ignores_client_id() {
        let a = OrderRequest::market("AAPL", Side::Sell, 5, TimeInForce::GTC);
        let b = OrderRequest::market("AAPL", Side::Sell, 5, TimeInForce::GTC);
        assert_ne!(a.client_order_id, b.client_order_id);
        assert!(a.same_trade(&b));

        let c = OrderRequest::market("AAPL", Side::Buy, 5, TimeInForce::GTC);
        assert!(!a.same_trade(&c));
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(OrderStatus::from_broker("filled"), OrderStatus::Filled);
        assert_eq!(OrderStatus::from_broker("new"), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_broker("rejected"), OrderStatus::Rejected);
        assert!(OrderStatus::from_broker("expired").is_terminal());
        assert!(!OrderStatus::from_broker("partially_filled").is_terminal());
    }

    #[test]
    fn test_time_in_force_parse() {
        assert_eq!("GTC".parse::<TimeInForce>().unwrap(), TimeInForce::GTC);
        assert_eq!("day".parse::<TimeInForce>().unwrap(), TimeInForce::Day);
        assert!("forever".parse::<TimeInForce>().is_err());
    }
}

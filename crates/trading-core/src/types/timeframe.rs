//! Timeframe definitions for market data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timeframe for bars/candles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    /// 1 minute bars
    #[serde(rename = "1m", alias = "1Min")]
    Minute1,
    /// 5 minute bars
    #[serde(rename = "5m", alias = "5Min")]
    Minute5,
    /// 15 minute bars
    #[serde(rename = "15m", alias = "15Min")]
    Minute15,
    /// 30 minute bars
    #[serde(rename = "30m", alias = "30Min")]
    Minute30,
    /// 1 hour bars
    #[serde(rename = "1h", alias = "1Hour")]
    Hour1,
    /// 4 hour bars
    #[serde(rename = "4h", alias = "4Hour")]
    Hour4,
    /// Daily bars
    #[serde(rename = "1d", alias = "1Day")]
    #[default]
    Daily,
    /// Weekly bars
    #[serde(rename = "1w", alias = "1Week")]
    Weekly,
    /// Monthly bars
    #[serde(rename = "1mo", alias = "1Month")]
    Monthly,
}

impl Timeframe {
    /// Get the duration of the timeframe in seconds.
    pub fn as_secs(&self) -> u64 {
        match self {
            Timeframe::Minute1 => 60,
            Timeframe::Minute5 => 300,
            Timeframe::Minute15 => 900,
            Timeframe::Minute30 => 1800,
            Timeframe::Hour1 => 3600,
            Timeframe::Hour4 => 14400,
            Timeframe::Daily => 86400,
            Timeframe::Weekly => 604800,
            Timeframe::Monthly => 2592000, // Approximate (30 days)
        }
    }

    /// Check if this is an intraday timeframe.
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Timeframe::Minute1
                | Timeframe::Minute5
                | Timeframe::Minute15
                | Timeframe::Minute30
                | Timeframe::Hour1
                | Timeframe::Hour4
        )
    }

    /// Timeframe string understood by the Alpaca market data API.
    pub fn alpaca_str(&self) -> &'static str {
        match self {
            Timeframe::Minute1 => "1Min",
            Timeframe::Minute5 => "5Min",
            Timeframe::Minute15 => "15Min",
            Timeframe::Minute30 => "30Min",
            Timeframe::Hour1 => "1Hour",
            Timeframe::Hour4 => "4Hour",
            Timeframe::Daily => "1Day",
            Timeframe::Weekly => "1Week",
            Timeframe::Monthly => "1Month",
        }
    }

    /// Calendar span to request so that `bars` trading-session bars are covered.
    ///
    /// Markets are closed most of the week, so the raw span is stretched and
    /// never shorter than ten days.
    pub fn lookback_secs(&self, bars: usize) -> u64 {
        let raw = self.as_secs().saturating_mul(bars as u64);
        let stretch = if self.is_intraday() { 5 } else { 2 };
        raw.saturating_mul(stretch).max(10 * 86400)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Minute30 => "30m",
            Timeframe::Hour1 => "1h",
            Timeframe::Hour4 => "4h",
            Timeframe::Daily => "1d",
            Timeframe::Weekly => "1w",
            Timeframe::Monthly => "1mo",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "1min" | "minute" => Ok(Timeframe::Minute1),
            "5m" | "5min" => Ok(Timeframe::Minute5),
            "15m" | "15min" => Ok(Timeframe::Minute15),
            "30m" | "30min" => Ok(Timeframe::Minute30),
            "1h" | "1hour" | "hour" => Ok(Timeframe::Hour1),
            "4h" | "4hour" => Ok(Timeframe::Hour4),
            "1d" | "1day" | "day" | "daily" => Ok(Timeframe::Daily),
            "1w" | "1week" | "week" | "weekly" => Ok(Timeframe::Weekly),
            "1mo" | "1month" | "month" | "monthly" => Ok(Timeframe::Monthly),
            _ => Err(format!("Invalid timeframe: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_duration() {
        assert_eq!(Timeframe::Minute1.as_secs(), 60);
        assert_eq!(Timeframe::Hour1.as_secs(), 3600);
        assert_eq!(Timeframe::Daily.as_secs(), 86400);
    }

    #[test]
    fn test_timeframe_parse() {
        assert_eq!(Timeframe::from_str("1m").unwrap(), Timeframe::Minute1);
        assert_eq!(Timeframe::from_str("1d").unwrap(), Timeframe::Daily);
        assert_eq!(Timeframe::from_str("daily").unwrap(), Timeframe::Daily);
        assert_eq!(Timeframe::from_str("1Day").unwrap(), Timeframe::Daily);
        assert_eq!(Timeframe::from_str("5Min").unwrap(), Timeframe::Minute5);
        assert_eq!(Timeframe::from_str("1Month").unwrap(), Timeframe::Monthly);
        assert!(Timeframe::from_str("fortnight").is_err());
    }

    #[test]
    fn test_timeframe_display_round_trips() {
        for tf in [Timeframe::Minute1, Timeframe::Daily, Timeframe::Monthly] {
            assert_eq!(Timeframe::from_str(&tf.to_string()).unwrap(), tf);
        }
    }

    #[test]
    fn test_alpaca_strings() {
        assert_eq!(Timeframe::Daily.alpaca_str(), "1Day");
        assert_eq!(Timeframe::Minute5.alpaca_str(), "5Min");
    }

    #[test]
    fn test_lookback_covers_request() {
        assert!(Timeframe::Daily.lookback_secs(30) >= 30 * 86400);
        assert_eq!(Timeframe::Minute1.lookback_secs(10), 10 * 86400);
    }
}

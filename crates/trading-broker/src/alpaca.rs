//! Alpaca REST integration for paper and live trading.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use num_traits::ToPrimitive;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use trading_core::error::{BrokerError, DataError};
use trading_core::traits::{MarketData, OrderGateway, TextSource};
use trading_core::types::{
    AccountState, Bar, OrderAck, OrderRequest, OrderStatus, Position, Side, Timeframe, Trade,
};
use tracing::{debug, info};

/// Paper trading endpoint.
pub const PAPER_URL: &str = "https://paper-api.alpaca.markets";
/// Live trading endpoint.
pub const LIVE_URL: &str = "https://api.alpaca.markets";
/// Market data endpoint.
pub const DATA_URL: &str = "https://data.alpaca.markets";

/// Alpaca API configuration.
#[derive(Clone)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub api_secret: String,
    /// Trading API root, paper by default
    pub base_url: String,
    /// Market data API root
    pub data_url: String,
    /// Market data feed (`iex` or `sip`)
    pub feed: String,
    /// HTTP request timeout
    pub request_timeout: Duration,
}

impl AlpacaConfig {
    /// Create a paper-trading config with key and secret.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            base_url: PAPER_URL.to_string(),
            data_url: DATA_URL.to_string(),
            feed: "iex".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Load credentials from the named environment variables.
    pub fn from_env(key_var: &str, secret_var: &str) -> Result<Self, BrokerError> {
        let api_key = std::env::var(key_var)
            .map_err(|_| BrokerError::Configuration(format!("{} not set", key_var)))?;
        let api_secret = std::env::var(secret_var)
            .map_err(|_| BrokerError::Configuration(format!("{} not set", secret_var)))?;
        Ok(Self::new(api_key, api_secret))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_data_url(mut self, url: impl Into<String>) -> Self {
        self.data_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_feed(mut self, feed: impl Into<String>) -> Self {
        self.feed = feed.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check whether orders go to the paper endpoint.
    pub fn is_paper(&self) -> bool {
        self.base_url.contains("paper-api")
    }
}

impl fmt::Debug for AlpacaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlpacaConfig")
            .field("api_key", &"***")
            .field("api_secret", &"***")
            .field("base_url", &self.base_url)
            .field("data_url", &self.data_url)
            .field("feed", &self.feed)
            .finish()
    }
}

/// Alpaca API response types
#[derive(Debug, Deserialize)]
struct AlpacaAccount {
    cash: String,
    buying_power: String,
    equity: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaPosition {
    symbol: String,
    qty: String,
    avg_entry_price: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaOrder {
    id: String,
    client_order_id: String,
    status: String,
    symbol: String,
    qty: Option<String>,
    side: String,
    submitted_at: Option<String>,
    created_at: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    symbol: &'a str,
    qty: String,
    side: &'a str,
    #[serde(rename = "type")]
    order_type: &'a str,
    time_in_force: &'a str,
    client_order_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct AlpacaBar {
    t: String,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

#[derive(Debug, Deserialize)]
struct AlpacaBarsResponse {
    #[serde(default)]
    bars: Option<Vec<AlpacaBar>>,
}

#[derive(Debug, Deserialize)]
struct AlpacaTrade {
    t: String,
    p: f64,
}

#[derive(Debug, Deserialize)]
struct AlpacaLatestTradeResponse {
    symbol: String,
    trade: AlpacaTrade,
}

#[derive(Debug, Deserialize)]
struct AlpacaNewsArticle {
    headline: String,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaNewsResponse {
    news: Vec<AlpacaNewsArticle>,
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, BrokerError> {
    value
        .parse()
        .map_err(|_| BrokerError::Parse(format!("{} is not a number: {:?}", field, value)))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, BrokerError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| BrokerError::Parse(format!("bad timestamp {:?}: {}", value, e)))
}

impl AlpacaAccount {
    fn into_state(self) -> Result<AccountState, BrokerError> {
        Ok(AccountState {
            buying_power: parse_decimal("buying_power", &self.buying_power)?,
            cash: parse_decimal("cash", &self.cash)?,
            equity: parse_decimal("equity", &self.equity)?,
        })
    }
}

impl AlpacaPosition {
    /// Fractional holdings are truncated toward zero.
    fn into_position(self) -> Result<Position, BrokerError> {
        let qty = parse_decimal("qty", &self.qty)?;
        let quantity = qty
            .trunc()
            .to_i64()
            .ok_or_else(|| BrokerError::Parse(format!("qty out of range: {}", qty)))?;
        let avg_entry_price = parse_decimal("avg_entry_price", &self.avg_entry_price)?;
        Ok(Position::new(self.symbol, quantity, avg_entry_price))
    }
}

impl AlpacaOrder {
    fn into_ack(self) -> Result<OrderAck, BrokerError> {
        let side = match self.side.as_str() {
            "buy" => Side::Buy,
            "sell" => Side::Sell,
            other => return Err(BrokerError::Parse(format!("unknown side: {}", other))),
        };
        let quantity = match &self.qty {
            Some(qty) => parse_decimal("qty", qty)?.trunc().to_u64().unwrap_or(0),
            None => 0,
        };
        let submitted_at = parse_timestamp(self.submitted_at.as_deref().unwrap_or(&self.created_at))?;

        Ok(OrderAck {
            id: self.id,
            client_order_id: self.client_order_id,
            symbol: self.symbol,
            side,
            quantity,
            status: OrderStatus::from_broker(&self.status),
            submitted_at,
        })
    }
}

impl AlpacaBar {
    fn into_bar(self) -> Result<Bar, BrokerError> {
        let ts = parse_timestamp(&self.t)?.timestamp_millis();
        Ok(Bar::new(ts, self.o, self.h, self.l, self.c, self.v))
    }
}

/// Convert a newest-first bars page into an ascending series.
fn bars_ascending(response: AlpacaBarsResponse) -> Result<Vec<Bar>, BrokerError> {
    let mut bars = response
        .bars
        .unwrap_or_default()
        .into_iter()
        .map(AlpacaBar::into_bar)
        .collect::<Result<Vec<_>, _>>()?;
    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

fn news_texts(response: AlpacaNewsResponse) -> Vec<String> {
    response
        .news
        .into_iter()
        .map(|article| {
            let summary = article.summary.trim();
            if summary.is_empty() {
                article.headline
            } else {
                format!("{}. {}", article.headline.trim_end_matches('.'), summary)
            }
        })
        .collect()
}

/// Map a non-success status onto a broker error.
async fn error_for_status(resp: Response, rejected: bool) -> BrokerError {
    let status = resp.status();
    let retry_after = resp
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    let text = resp.text().await.unwrap_or_default();

    match status {
        StatusCode::UNAUTHORIZED => BrokerError::AuthenticationError(text),
        StatusCode::TOO_MANY_REQUESTS => BrokerError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(1),
        },
        StatusCode::NOT_FOUND if !rejected => BrokerError::OrderNotFound(text),
        StatusCode::FORBIDDEN | StatusCode::UNPROCESSABLE_ENTITY if rejected => {
            BrokerError::OrderRejected(format!("{}: {}", status, text))
        }
        StatusCode::FORBIDDEN => BrokerError::AuthenticationError(text),
        _ => BrokerError::ApiError(format!("{}: {}", status, text)),
    }
}

/// Alpaca client implementing both the market data and order adapters.
pub struct AlpacaClient {
    config: AlpacaConfig,
    client: Client,
}

impl AlpacaClient {
    /// Create a new Alpaca client.
    pub fn new(config: AlpacaConfig) -> Result<Self, BrokerError> {
        if config.api_key.is_empty() || config.api_secret.is_empty() {
            return Err(BrokerError::Configuration("Alpaca credentials are empty".into()));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| BrokerError::Configuration(e.to_string()))?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(&config.api_secret)
                .map_err(|e| BrokerError::Configuration(e.to_string()))?,
        );

        reqwest::Url::parse(&config.base_url)
            .map_err(|e| BrokerError::Configuration(format!("base_url: {}", e)))?;
        reqwest::Url::parse(&config.data_url)
            .map_err(|e| BrokerError::Configuration(format!("data_url: {}", e)))?;

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        info!(base_url = %config.base_url, paper = config.is_paper(), "alpaca client created");
        Ok(Self { config, client })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, rejected: bool) -> Result<T, BrokerError> {
        let resp = request
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(error_for_status(resp, rejected).await);
        }

        resp.json().await.map_err(|e| BrokerError::Parse(e.to_string()))
    }

    /// Fetch recent news articles as classifier-ready snippets.
    pub async fn get_news(&self, symbol: &str, limit: usize) -> Result<Vec<String>, BrokerError> {
        let url = format!("{}/v1beta1/news", self.config.data_url);
        let request = self
            .client
            .get(&url)
            .query(&[("symbols", symbol.to_string()), ("limit", limit.to_string())]);
        let response: AlpacaNewsResponse = self.send_json(request, false).await?;
        Ok(news_texts(response))
    }
}

#[async_trait]
impl MarketData for AlpacaClient {
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, BrokerError> {
        let url = format!("{}/v2/stocks/{}/bars", self.config.data_url, symbol);
        let lookback = i64::try_from(timeframe.lookback_secs(limit)).unwrap_or(i64::MAX);
        let start = Utc::now() - ChronoDuration::seconds(lookback.min(20 * 365 * 86_400));

        let params = [
            ("timeframe", timeframe.alpaca_str().to_string()),
            ("start", start.to_rfc3339()),
            ("limit", limit.to_string()),
            ("sort", "desc".to_string()),
            ("adjustment", "raw".to_string()),
            ("feed", self.config.feed.clone()),
        ];
        debug!(symbol, %timeframe, limit, "fetching bars");

        let response: AlpacaBarsResponse = self
            .send_json(self.client.get(&url).query(&params), false)
            .await?;
        bars_ascending(response)
    }

    async fn get_latest_trade(&self, symbol: &str) -> Result<Trade, BrokerError> {
        let url = format!("{}/v2/stocks/{}/trades/latest", self.config.data_url, symbol);
        let request = self.client.get(&url).query(&[("feed", self.config.feed.as_str())]);
        let response: AlpacaLatestTradeResponse = self.send_json(request, false).await?;

        let price = Decimal::try_from(response.trade.p)
            .map_err(|e| BrokerError::Parse(format!("trade price {}: {}", response.trade.p, e)))?;
        Ok(Trade {
            symbol: response.symbol,
            price,
            timestamp: parse_timestamp(&response.trade.t).ok(),
        })
    }

    async fn list_positions(&self) -> Result<Vec<Position>, BrokerError> {
        let url = format!("{}/v2/positions", self.config.base_url);
        let positions: Vec<AlpacaPosition> = self.send_json(self.client.get(&url), false).await?;
        positions.into_iter().map(AlpacaPosition::into_position).collect()
    }

    async fn get_account(&self) -> Result<AccountState, BrokerError> {
        let url = format!("{}/v2/account", self.config.base_url);
        let account: AlpacaAccount = self.send_json(self.client.get(&url), false).await?;
        account.into_state()
    }

    fn name(&self) -> &str {
        "alpaca"
    }
}

#[async_trait]
impl OrderGateway for AlpacaClient {
    async fn submit_order(&self, request: OrderRequest) -> Result<OrderAck, BrokerError> {
        let url = format!("{}/v2/orders", self.config.base_url);
        let body = CreateOrderRequest {
            symbol: &request.symbol,
            qty: request.quantity.to_string(),
            side: request.side.as_str(),
            order_type: request.order_type.as_str(),
            time_in_force: request.time_in_force.as_str(),
            client_order_id: &request.client_order_id,
        };
        debug!(?body, "submitting order");

        let order: AlpacaOrder = self.send_json(self.client.post(&url).json(&body), true).await?;
        order.into_ack()
    }

    async fn order_status(&self, order_id: &str) -> Result<OrderStatus, BrokerError> {
        let url = format!("{}/v2/orders/{}", self.config.base_url, order_id);
        let order: AlpacaOrder = self.send_json(self.client.get(&url), false).await?;
        Ok(OrderStatus::from_broker(&order.status))
    }

    fn name(&self) -> &str {
        "alpaca"
    }
}

/// Recent Alpaca news headlines and summaries as a text source.
pub struct AlpacaNewsSource {
    client: std::sync::Arc<AlpacaClient>,
    limit: usize,
}

impl AlpacaNewsSource {
    pub fn new(client: std::sync::Arc<AlpacaClient>, limit: usize) -> Self {
        Self { client, limit }
    }
}

#[async_trait]
impl TextSource for AlpacaNewsSource {
    async fn fetch(&self, symbol: &str) -> Result<Vec<String>, DataError> {
        self.client
            .get_news(symbol, self.limit)
            .await
            .map_err(|e| match e {
                BrokerError::Parse(msg) => DataError::ParseError(msg),
                other => DataError::ConnectionError(other.to_string()),
            })
    }

    fn name(&self) -> &str {
        "alpaca-news"
    }
}

//! Request and response types for REST endpoints

use chrono::{DateTime, Utc};
use cryptocom_types::{ExecInst, OrderStatus, OrderType, Params, Side, TimeInForce};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{require_at_most, require_non_empty, RestError, RestResult};

/// Largest page the exchange serves for history queries
pub const MAX_PAGE_SIZE: u32 = 200;

/// Deepest order book the exchange serves
pub const MAX_BOOK_DEPTH: u32 = 150;

// ============================================================================
// Market Data Types
// ============================================================================

/// Result of `public/get-instruments`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InstrumentsResult {
    #[serde(default)]
    pub instruments: Vec<Instrument>,
}

/// Tradable instrument
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Instrument {
    /// Instrument name, e.g. `BTC_USDT`
    pub instrument_name: String,
    pub quote_currency: String,
    pub base_currency: String,
    /// Maximum decimal places for prices
    pub price_decimals: u32,
    /// Maximum decimal places for quantities
    pub quantity_decimals: u32,
    #[serde(default)]
    pub margin_trading_enabled: bool,
    #[serde(default)]
    pub max_quantity: Option<Decimal>,
    #[serde(default)]
    pub min_quantity: Option<Decimal>,
    #[serde(default)]
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde(default)]
    pub last_update_date: Option<i64>,
    #[serde(default)]
    pub price_tick_size: Option<Decimal>,
    #[serde(default)]
    pub quantity_tick_size: Option<Decimal>,
}

/// Result of `public/get-book`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BookResult {
    #[serde(default)]
    pub instrument_name: String,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub data: Vec<Book>,
}

impl BookResult {
    /// Most recent snapshot
    pub fn snapshot(&self) -> Option<&Book> {
        self.data.first()
    }
}

/// Order book snapshot
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Book {
    #[serde(default)]
    pub bids: Vec<BookLevel>,
    #[serde(default)]
    pub asks: Vec<BookLevel>,
    /// Snapshot time
    #[serde(rename = "t", with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Book {
    /// Best bid
    pub fn best_bid(&self) -> Option<&BookLevel> {
        self.bids.first()
    }

    /// Best ask
    pub fn best_ask(&self) -> Option<&BookLevel> {
        self.asks.first()
    }

    /// Ask minus bid
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }
}

/// One price level, sent by the exchange as `[price, quantity, orders]`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BookLevel {
    pub price: Decimal,
    pub quantity: Decimal,
    /// Number of orders at this level
    #[serde(deserialize_with = "deserialize_count")]
    pub orders: u32,
}

/// Order counts arrive as integers, floats or strings depending on the feed
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Integer(u32),
        Float(f64),
        Text(String),
    }

    match RawCount::deserialize(deserializer)? {
        RawCount::Integer(n) => Ok(n),
        RawCount::Float(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => Ok(f as u32),
        RawCount::Float(f) => Err(serde::de::Error::custom(format!("invalid order count {f}"))),
        RawCount::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// Trade History Types
// ============================================================================

/// Query for `private/get-trades`
///
/// `page` is always sent; every other field only when set.
///
/// ```
/// use cryptocom_rest::{GetTradesRequest, Params};
///
/// let request = GetTradesRequest::new()
///     .with_instrument("ETH_CRO")
///     .with_page_size(100)
///     .with_page(2);
///
/// assert!(request.validate().is_ok());
/// assert_eq!(
///     request.to_params(),
///     Params::new()
///         .with("instrument_name", "ETH_CRO")
///         .with("page_size", 100)
///         .with("page", 2)
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetTradesRequest {
    /// Restrict to one instrument
    pub instrument_name: Option<String>,
    /// Inclusive start time
    pub start: Option<DateTime<Utc>>,
    /// Inclusive end time
    pub end: Option<DateTime<Utc>>,
    /// Page size; `0` leaves the exchange default
    pub page_size: u32,
    /// Zero-based page number
    pub page: u32,
}

impl GetTradesRequest {
    /// Query every instrument, first page, exchange default page size
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one instrument
    pub fn with_instrument(mut self, instrument_name: impl Into<String>) -> Self {
        self.instrument_name = Some(instrument_name.into());
        self
    }

    /// Restrict to trades created between `start` and `end`
    pub fn with_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Set the page size, at most 200; `0` keeps the exchange default
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the zero-based page number
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Check the query against exchange limits
    pub fn validate(&self) -> RestResult<()> {
        require_at_most("page_size", self.page_size, MAX_PAGE_SIZE)?;
        if let Some(instrument) = &self.instrument_name {
            require_non_empty("instrument_name", instrument)?;
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(RestError::invalid_parameter(
                    "start_ts",
                    "cannot be after end_ts",
                ));
            }
        }
        Ok(())
    }

    /// Build RPC parameters
    pub fn to_params(&self) -> Params {
        Params::new()
            .with("page", self.page)
            .with_opt("page_size", (self.page_size != 0).then_some(self.page_size))
            .with_opt("instrument_name", self.instrument_name.as_deref())
            .with_opt("start_ts", self.start.map(|t| t.timestamp_millis()))
            .with_opt("end_ts", self.end.map(|t| t.timestamp_millis()))
    }
}

/// Result of `private/get-trades`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TradesResult {
    #[serde(default)]
    pub trade_list: Vec<Trade>,
}

/// Executed trade
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Trade {
    pub side: Side,
    pub instrument_name: String,
    /// Fee paid, positive
    pub fee: Decimal,
    pub trade_id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub create_time: DateTime<Utc>,
    pub traded_price: Decimal,
    pub traded_quantity: Decimal,
    pub fee_currency: String,
    pub order_id: String,
    /// `MAKER` or `TAKER`
    #[serde(default)]
    pub liquidity_indicator: Option<String>,
    #[serde(default)]
    pub client_oid: Option<String>,
}

impl Trade {
    /// Price times quantity
    pub fn notional(&self) -> Decimal {
        self.traded_price * self.traded_quantity
    }
}

// ============================================================================
// Order Types
// ============================================================================

/// Order placement request for `private/create-order`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderRequest {
    pub instrument_name: String,
    pub side: Side,
    pub order_type: OrderType,
    /// Limit price
    pub price: Option<Decimal>,
    /// Order quantity in base currency
    pub quantity: Option<Decimal>,
    /// Amount to spend in quote currency, market buys only
    pub notional: Option<Decimal>,
    /// Caller-assigned order ID
    pub client_oid: Option<String>,
    pub time_in_force: Option<TimeInForce>,
    pub exec_inst: Option<ExecInst>,
    /// Trigger for stop and take-profit orders
    pub trigger_price: Option<Decimal>,
}

impl CreateOrderRequest {
    fn new(instrument_name: impl Into<String>, side: Side, order_type: OrderType) -> Self {
        Self {
            instrument_name: instrument_name.into(),
            side,
            order_type,
            price: None,
            quantity: None,
            notional: None,
            client_oid: None,
            time_in_force: None,
            exec_inst: None,
            trigger_price: None,
        }
    }

    /// Limit order
    pub fn limit(
        instrument_name: impl Into<String>,
        side: Side,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        let mut order = Self::new(instrument_name, side, OrderType::Limit);
        order.quantity = Some(quantity);
        order.price = Some(price);
        order
    }

    /// Market order for a base quantity
    pub fn market(instrument_name: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        let mut order = Self::new(instrument_name, side, OrderType::Market);
        order.quantity = Some(quantity);
        order
    }

    /// Market buy spending a quote amount
    pub fn market_buy_notional(instrument_name: impl Into<String>, notional: Decimal) -> Self {
        let mut order = Self::new(instrument_name, Side::Buy, OrderType::Market);
        order.notional = Some(notional);
        order
    }

    /// Stop-loss order that fires at `trigger_price`
    pub fn stop_loss(
        instrument_name: impl Into<String>,
        side: Side,
        quantity: Decimal,
        trigger_price: Decimal,
    ) -> Self {
        let mut order = Self::new(instrument_name, side, OrderType::StopLoss);
        order.quantity = Some(quantity);
        order.trigger_price = Some(trigger_price);
        order
    }

    /// Attach a client order ID, echoed back by the exchange
    pub fn with_client_oid(mut self, client_oid: impl Into<String>) -> Self {
        self.client_oid = Some(client_oid.into());
        self
    }

    /// Set the time in force for limit orders
    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    /// Reject the order if it would take liquidity
    pub fn post_only(mut self) -> Self {
        self.exec_inst = Some(ExecInst::PostOnly);
        self
    }

    /// Check required fields for the order type
    pub fn validate(&self) -> RestResult<()> {
        require_non_empty("instrument_name", &self.instrument_name)?;

        match (self.quantity, self.notional) {
            (Some(quantity), _) => require_positive("quantity", quantity)?,
            (None, Some(notional)) if self.order_type == OrderType::Market && self.side == Side::Buy => {
                require_positive("notional", notional)?
            }
            (None, Some(_)) => {
                return Err(RestError::invalid_parameter(
                    "notional",
                    "only allowed for market buy orders",
                ))
            }
            (None, None) => return Err(RestError::invalid_parameter("quantity", "is required")),
        }

        if self.order_type.requires_price() {
            match self.price {
                Some(price) => require_positive("price", price)?,
                None => return Err(RestError::invalid_parameter("price", "is required")),
            }
        }

        if self.order_type.requires_trigger() {
            match self.trigger_price {
                Some(trigger) => require_positive("trigger_price", trigger)?,
                None => return Err(RestError::invalid_parameter("trigger_price", "is required")),
            }
        }

        if let Some(client_oid) = &self.client_oid {
            require_non_empty("client_oid", client_oid)?;
        }

        Ok(())
    }

    /// Build RPC parameters; decimals travel as strings
    pub fn to_params(&self) -> Params {
        Params::new()
            .with("instrument_name", self.instrument_name.as_str())
            .with("side", self.side.as_str())
            .with("type", self.order_type.as_str())
            .with_opt("price", self.price)
            .with_opt("quantity", self.quantity)
            .with_opt("notional", self.notional)
            .with_opt("client_oid", self.client_oid.as_deref())
            .with_opt("time_in_force", self.time_in_force.map(|t| t.as_str()))
            .with_opt("exec_inst", self.exec_inst.map(|e| e.as_str()))
            .with_opt("trigger_price", self.trigger_price)
    }
}

fn require_positive(parameter: &str, value: Decimal) -> RestResult<()> {
    if value <= Decimal::ZERO {
        return Err(RestError::invalid_parameter(parameter, "must be positive"));
    }
    Ok(())
}

/// Result of `private/create-order`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateOrderResult {
    pub order_id: String,
    #[serde(default)]
    pub client_oid: Option<String>,
}

/// Order as reported by the exchange
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Order {
    pub order_id: String,
    #[serde(default)]
    pub client_oid: Option<String>,
    pub instrument_name: String,
    pub status: OrderStatus,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub cumulative_quantity: Decimal,
    #[serde(default)]
    pub cumulative_value: Decimal,
    #[serde(default)]
    pub avg_price: Decimal,
    #[serde(default)]
    pub fee_currency: Option<String>,
    #[serde(default)]
    pub time_in_force: Option<TimeInForce>,
    #[serde(default)]
    pub reason: Option<i64>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub create_time: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub update_time: DateTime<Utc>,
}

impl Order {
    /// Quantity still working
    pub fn remaining_quantity(&self) -> Decimal {
        (self.quantity - self.cumulative_quantity).max(Decimal::ZERO)
    }

    /// Check if the order can no longer change
    pub fn is_final(&self) -> bool {
        self.status.is_final()
    }
}

/// Result of `private/get-open-orders`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OpenOrdersResult {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub order_list: Vec<Order>,
}

/// Result of `private/get-order-detail`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderDetailResult {
    pub order_info: Order,
    #[serde(default)]
    pub trade_list: Vec<Trade>,
}

// ============================================================================
// Account Types
// ============================================================================

/// Result of `private/get-account-summary`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccountSummary {
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl AccountSummary {
    /// Balance entry for a currency
    pub fn currency(&self, currency: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.currency == currency)
    }
}

/// Balance of one currency
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Account {
    pub currency: String,
    /// Total balance
    pub balance: Decimal,
    /// Free to trade or withdraw
    pub available: Decimal,
    /// Locked in open orders
    #[serde(default)]
    pub order: Decimal,
    /// Locked in staking
    #[serde(default)]
    pub stake: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use cryptocom_types::ParamValue;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trade_deserialization() {
        let json = r#"{
            "side": "SELL",
            "instrument_name": "ETH_CRO",
            "fee": 0.007,
            "trade_id": "371303044218155296",
            "create_time": 1588902493045,
            "traded_price": 7,
            "traded_quantity": 1,
            "fee_currency": "CRO",
            "order_id": "371302913889488619"
        }"#;

        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.side, Side::Sell);
        assert_eq!(trade.fee, dec!(0.007));
        assert_eq!(trade.traded_price, dec!(7));
        assert_eq!(trade.create_time.timestamp_millis(), 1588902493045);
        assert_eq!(trade.notional(), dec!(7));
        assert_eq!(trade.liquidity_indicator, None);
    }

    #[test]
    fn test_book_deserialization() {
        let json = r#"{
            "instrument_name": "BTC_USDT",
            "depth": 2,
            "data": [{
                "bids": [["9668.44", "0.006325", 1], [9659.75, 0.006776, 1.0]],
                "asks": [["9697.0", "0.68251", "2"]],
                "t": 1591704180270
            }]
        }"#;

        let book: BookResult = serde_json::from_str(json).unwrap();
        let snapshot = book.snapshot().unwrap();
        assert_eq!(snapshot.bids.len(), 2);
        assert_eq!(snapshot.bids[1].orders, 1);
        assert_eq!(snapshot.best_ask().unwrap().orders, 2);
        assert_eq!(snapshot.spread(), Some(dec!(28.56)));
    }

    #[test]
    fn test_book_rejects_fractional_count() {
        let json = r#"{"bids": [[1, 1, 1.5]], "asks": [], "t": 0}"#;
        assert!(serde_json::from_str::<Book>(json).is_err());
    }

    #[test]
    fn test_instrument_deserialization() {
        let json = r#"{
            "instrument_name": "BTC_USDT",
            "quote_currency": "USDT",
            "base_currency": "BTC",
            "price_decimals": 2,
            "quantity_decimals": 6,
            "margin_trading_enabled": true,
            "max_quantity": "100000000",
            "min_quantity": "0.000001",
            "price_tick_size": "0.01"
        }"#;

        let instrument: Instrument = serde_json::from_str(json).unwrap();
        assert_eq!(instrument.price_decimals, 2);
        assert_eq!(instrument.min_quantity, Some(dec!(0.000001)));
        assert_eq!(instrument.max_price, None);
    }

    #[test]
    fn test_get_trades_default_params() {
        let params = GetTradesRequest::new().to_params();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("page"), Some(&ParamValue::Integer(0)));
    }

    #[test]
    fn test_get_trades_full_params() {
        let start = Utc.timestamp_millis_opt(1_600_000_000_000).unwrap();
        let end = Utc.timestamp_millis_opt(1_600_000_100_000).unwrap();
        let params = GetTradesRequest::new()
            .with_instrument("ETH_CRO")
            .with_range(start, end)
            .with_page_size(100)
            .with_page(2)
            .to_params();

        assert_eq!(params.get("page_size").and_then(ParamValue::as_i64), Some(100));
        assert_eq!(params.get("page").and_then(ParamValue::as_i64), Some(2));
        assert_eq!(params.get("instrument_name").and_then(ParamValue::as_str), Some("ETH_CRO"));
        assert_eq!(params.get("start_ts").and_then(ParamValue::as_i64), Some(1_600_000_000_000));
        assert_eq!(params.get("end_ts").and_then(ParamValue::as_i64), Some(1_600_000_100_000));
    }

    #[test]
    fn test_get_trades_validation() {
        assert!(GetTradesRequest::new().with_page_size(200).validate().is_ok());

        match GetTradesRequest::new().with_page_size(201).validate() {
            Err(RestError::InvalidParameter(e)) => {
                assert_eq!(e.parameter, "page_size");
                assert_eq!(e.reason, "cannot be greater than 200");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let start = Utc.timestamp_millis_opt(2_000).unwrap();
        let end = Utc.timestamp_millis_opt(1_000).unwrap();
        assert!(GetTradesRequest::new().with_range(start, end).validate().is_err());
        assert!(GetTradesRequest::new().with_instrument("").validate().is_err());
    }

    #[test]
    fn test_limit_order_params() {
        let order = CreateOrderRequest::limit("BTC_USDT", Side::Buy, dec!(0.5), dec!(50000.10))
            .with_client_oid("my-order-1")
            .with_time_in_force(TimeInForce::GoodTillCancel)
            .post_only();
        assert!(order.validate().is_ok());

        let params = order.to_params();
        assert_eq!(params.get("type").and_then(ParamValue::as_str), Some("LIMIT"));
        assert_eq!(params.get("side").and_then(ParamValue::as_str), Some("BUY"));
        assert_eq!(params.get("price").and_then(ParamValue::as_str), Some("50000.1"));
        assert_eq!(params.get("quantity").and_then(ParamValue::as_str), Some("0.5"));
        assert_eq!(params.get("exec_inst").and_then(ParamValue::as_str), Some("POST_ONLY"));
        assert_eq!(
            params.get("time_in_force").and_then(ParamValue::as_str),
            Some("GOOD_TILL_CANCEL")
        );
        assert!(params.get("notional").is_none());
    }

    #[test]
    fn test_order_validation() {
        let invalid = |order: CreateOrderRequest| match order.validate() {
            Err(RestError::InvalidParameter(e)) => e.parameter,
            other => panic!("expected invalid parameter, got {other:?}"),
        };

        assert_eq!(
            invalid(CreateOrderRequest::limit("", Side::Buy, dec!(1), dec!(1))),
            "instrument_name"
        );
        assert_eq!(
            invalid(CreateOrderRequest::limit("BTC_USDT", Side::Buy, dec!(0), dec!(1))),
            "quantity"
        );
        assert_eq!(
            invalid(CreateOrderRequest::limit("BTC_USDT", Side::Buy, dec!(1), dec!(-1))),
            "price"
        );

        let mut no_price = CreateOrderRequest::limit("BTC_USDT", Side::Buy, dec!(1), dec!(1));
        no_price.price = None;
        assert_eq!(invalid(no_price), "price");

        let mut sell_notional = CreateOrderRequest::market_buy_notional("BTC_USDT", dec!(100));
        sell_notional.side = Side::Sell;
        assert_eq!(invalid(sell_notional), "notional");

        let mut no_trigger = CreateOrderRequest::stop_loss("BTC_USDT", Side::Sell, dec!(1), dec!(1));
        no_trigger.trigger_price = None;
        assert_eq!(invalid(no_trigger), "trigger_price");

        assert!(CreateOrderRequest::market("BTC_USDT", Side::Sell, dec!(1)).validate().is_ok());
        assert!(CreateOrderRequest::market_buy_notional("BTC_USDT", dec!(100)).validate().is_ok());
    }

    #[test]
    fn test_order_deserialization() {
        let json = r#"{
            "status": "ACTIVE",
            "side": "BUY",
            "price": 1,
            "quantity": 1,
            "order_id": "366543374673423753",
            "client_oid": "my_order_0002",
            "create_time": 1588760643829,
            "update_time": 1588760644292,
            "type": "LIMIT",
            "instrument_name": "CRO_BTC",
            "cumulative_quantity": 0.25,
            "cumulative_value": 0,
            "avg_price": 0,
            "fee_currency": "CRO",
            "time_in_force": "GOOD_TILL_CANCEL"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Active);
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.remaining_quantity(), dec!(0.75));
        assert!(!order.is_final());
    }

    #[test]
    fn test_account_summary_lookup() {
        let json = r#"{"accounts": [
            {"balance": 99999999.905, "available": 99999996.905, "order": 3, "stake": 0, "currency": "CRO"},
            {"balance": "1.5", "available": "1.5", "currency": "BTC"}
        ]}"#;

        let summary: AccountSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.currency("CRO").unwrap().order, dec!(3));
        assert_eq!(summary.currency("BTC").unwrap().stake, Decimal::ZERO);
        assert!(summary.currency("ETH").is_none());
    }
}

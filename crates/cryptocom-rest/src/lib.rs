//! REST API client for the Crypto.com Exchange
//!
//! This crate provides an authenticated JSON-RPC client for the exchange's
//! v2 REST API: market data, order management and account queries.
//!
//! # Features
//!
//! - **Market Data**: Instruments, order book
//! - **Trading**: Place and cancel orders, open orders, trade history
//! - **Account**: Balances
//!
//! # Authentication
//!
//! Private methods are POSTed as a JSON envelope carrying a request ID, the
//! API key, a millisecond nonce and an HMAC-SHA256 signature. Public methods
//! are plain GETs. See `cryptocom-auth` for the signing rules.
//!
//! # Cancellation
//!
//! Every call takes a [`CancellationToken`]. A token that has already fired
//! stops the call before anything is generated or sent; one that fires while
//! the request is in flight abandons it and returns [`RestError::Cancelled`].
//!
//! # Example
//!
//! ```no_run
//! use cryptocom_rest::{CryptoComClient, GetTradesRequest};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CryptoComClient::from_env()?;
//!     let cancel = CancellationToken::new();
//!
//!     let trades = client
//!         .get_trades(&cancel, &GetTradesRequest::new().with_instrument("BTC_USDT"))
//!         .await?;
//!     println!("{} trades", trades.trade_list.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Exchange failures surface as [`RestError::Response`]. The wrapped
//! [`ResponseError`] keeps the raw code and HTTP status and exposes an
//! [`ExchangeError`] sentinel for matching. The client never retries.

pub mod client;
pub mod clock;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod id;
pub mod requester;
pub mod types;

// Re-export main types
pub use client::{ClientConfig, CryptoComClient, DEFAULT_BASE_URL};
pub use clock::{Clock, FixedClock, SystemClock};
pub use envelope::EnvelopeBuilder;
pub use error::{InvalidParameterError, RestError, RestResult};
pub use id::{IdGenerator, SequentialIdGenerator};
pub use requester::Requester;

// Re-export endpoint-specific types
pub use types::{
    // Market data
    Book, BookLevel, BookResult, Instrument, InstrumentsResult,
    // Trading
    CreateOrderRequest, CreateOrderResult, GetTradesRequest, OpenOrdersResult, Order,
    OrderDetailResult, Trade, TradesResult,
    // Account
    Account, AccountSummary,
};

pub use cryptocom_auth::{Credentials, HmacSignatureGenerator, SignatureGenerator, SignatureRequest};
pub use cryptocom_types::{
    ExchangeError, ExecInst, OrderStatus, OrderType, Params, ResponseError, Side, TimeInForce,
};
pub use tokio_util::sync::CancellationToken;

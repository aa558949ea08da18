//! Main REST client implementation

use crate::clock::{Clock, SystemClock};
use crate::endpoints::{AccountEndpoints, MarketEndpoints, TradingEndpoints};
use crate::envelope::EnvelopeBuilder;
use crate::error::{RestError, RestResult};
use crate::id::{IdGenerator, SequentialIdGenerator};
use crate::requester::Requester;
use crate::types::{
    AccountSummary, BookResult, CreateOrderRequest, CreateOrderResult, GetTradesRequest,
    InstrumentsResult, OpenOrdersResult, OrderDetailResult, TradesResult,
};
use cryptocom_auth::{Credentials, HmacSignatureGenerator, SignatureGenerator};
use cryptocom_types::{BaseResponse, Params};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use url::Url;

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://api.crypto.com/v2/";

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_USER_AGENT: &str = concat!("cryptocom-rest/", env!("CARGO_PKG_VERSION"));

/// Crypto.com Exchange REST client
///
/// Cheap to clone; clones share the HTTP connection pool, clock, ID generator
/// and signer. Every call takes a [`CancellationToken`] so callers can abort
/// it at any point.
///
/// # Example
///
/// ```no_run
/// use cryptocom_rest::CryptoComClient;
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CryptoComClient::from_env()?;
///     let cancel = CancellationToken::new();
///
///     let book = client.get_book(&cancel, "BTC_USDT", 10).await?;
///     client.cancel_all_orders(&cancel, "BTC_USDT").await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CryptoComClient {
    credentials: Credentials,
    requester: Requester,
    clock: Arc<dyn Clock>,
    id_generator: Arc<dyn IdGenerator>,
    signature_generator: Arc<dyn SignatureGenerator>,
}

impl CryptoComClient {
    /// Create a client for the production API
    ///
    /// # Errors
    /// Returns [`RestError::Credentials`] if either key is empty.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> RestResult<Self> {
        let credentials = Credentials::new(api_key, secret_key).map_err(RestError::Credentials)?;
        Self::with_config(ClientConfig::new(credentials))
    }

    /// Create a client with credentials from `CRYPTOCOM_API_KEY` and
    /// `CRYPTOCOM_SECRET_KEY`
    pub fn from_env() -> RestResult<Self> {
        Self::with_config(ClientConfig::new(
            Credentials::from_env().map_err(RestError::Credentials)?,
        ))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        let http_client = match config.http_client {
            Some(client) => client,
            None => Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .user_agent(config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
                .build()?,
        };

        info!(base_url = %base_url, "Created Crypto.com REST client");

        Ok(Self {
            credentials: config.credentials,
            requester: Requester::new(http_client, base_url),
            clock: config.clock,
            id_generator: config.id_generator,
            signature_generator: config.signature_generator,
        })
    }

    /// Base URL method names are appended to
    pub fn base_url(&self) -> &Url {
        self.requester.base_url()
    }

    /// API key this client signs with
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Envelope builder bound to this client's clock, IDs and signer
    pub fn envelope(&self) -> EnvelopeBuilder<'_> {
        EnvelopeBuilder::new(
            &self.credentials,
            self.clock.as_ref(),
            self.id_generator.as_ref(),
            self.signature_generator.as_ref(),
        )
    }

    // ========================================================================
    // Endpoint Groups
    // ========================================================================

    /// Get public market data endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(self)
    }

    /// Get order management endpoints
    pub fn trading(&self) -> TradingEndpoints<'_> {
        TradingEndpoints::new(self)
    }

    /// Get account endpoints
    pub fn account(&self) -> AccountEndpoints<'_> {
        AccountEndpoints::new(self)
    }

    // ========================================================================
    // Public Market Endpoints
    // ========================================================================

    /// List tradable instruments
    pub async fn get_instruments(&self, cancel: &CancellationToken) -> RestResult<InstrumentsResult> {
        self.market().get_instruments(cancel).await
    }

    /// Get the order book for an instrument
    ///
    /// # Arguments
    /// * `instrument_name` - Instrument (e.g., "BTC_USDT")
    /// * `depth` - Number of levels (1-150), `0` for the exchange default
    pub async fn get_book(
        &self,
        cancel: &CancellationToken,
        instrument_name: &str,
        depth: u32,
    ) -> RestResult<BookResult> {
        self.market().get_book(cancel, instrument_name, depth).await
    }

    // ========================================================================
    // Private Trading Endpoints
    // ========================================================================

    /// Cancel every open order on an instrument
    pub async fn cancel_all_orders(
        &self,
        cancel: &CancellationToken,
        instrument_name: &str,
    ) -> RestResult<()> {
        self.trading().cancel_all_orders(cancel, instrument_name).await
    }

    /// Get executed trades
    pub async fn get_trades(
        &self,
        cancel: &CancellationToken,
        request: &GetTradesRequest,
    ) -> RestResult<TradesResult> {
        self.trading().get_trades(cancel, request).await
    }

    /// Place a new order
    pub async fn create_order(
        &self,
        cancel: &CancellationToken,
        order: &CreateOrderRequest,
    ) -> RestResult<CreateOrderResult> {
        self.trading().create_order(cancel, order).await
    }

    /// Cancel one order
    pub async fn cancel_order(
        &self,
        cancel: &CancellationToken,
        instrument_name: &str,
        order_id: &str,
    ) -> RestResult<()> {
        self.trading()
            .cancel_order(cancel, instrument_name, order_id)
            .await
    }

    /// Get open orders, optionally for one instrument
    pub async fn get_open_orders(
        &self,
        cancel: &CancellationToken,
        instrument_name: Option<&str>,
    ) -> RestResult<OpenOrdersResult> {
        self.trading()
            .get_open_orders(cancel, instrument_name, 0, 0)
            .await
    }

    /// Get one order with its fills
    pub async fn get_order_detail(
        &self,
        cancel: &CancellationToken,
        order_id: &str,
    ) -> RestResult<OrderDetailResult> {
        self.trading().get_order_detail(cancel, order_id).await
    }

    // ========================================================================
    // Private Account Endpoints
    // ========================================================================

    /// Get balances, optionally for one currency
    pub async fn get_account_summary(
        &self,
        cancel: &CancellationToken,
        currency: Option<&str>,
    ) -> RestResult<AccountSummary> {
        self.account().get_account_summary(cancel, currency).await
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Sign and POST an authenticated call, returning the checked envelope
    ///
    /// Nothing is generated, signed or sent once `cancel` has fired.
    pub(crate) async fn send_private<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        method: &str,
        params: Params,
    ) -> RestResult<BaseResponse<T>> {
        if cancel.is_cancelled() {
            return Err(RestError::Cancelled);
        }

        let request = self.envelope().build(method, params)?;
        let (status, response) = self.requester.post(cancel, &request).await?;
        Requester::check_error_response(status, response.code)?;
        Requester::decode_result(status, response)
    }

    /// GET a public call, returning the checked envelope
    pub(crate) async fn send_public<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        method: &str,
        params: &Params,
    ) -> RestResult<BaseResponse<T>> {
        if cancel.is_cancelled() {
            return Err(RestError::Cancelled);
        }

        let (status, response) = self.requester.get(cancel, method, params).await?;
        Requester::check_error_response(status, response.code)?;
        Requester::decode_result(status, response)
    }
}

impl std::fmt::Debug for CryptoComClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoComClient")
            .field("base_url", &self.requester.base_url().as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Extract the payload of a successful response
pub(crate) fn into_result<T>(method: &str, response: BaseResponse<T>) -> RestResult<T> {
    response.result.ok_or_else(|| RestError::MissingResult {
        method: method.to_string(),
    })
}

fn parse_base_url(raw: &str) -> RestResult<Url> {
    // Url::join drops the last path segment unless it ends in '/'
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };

    let url = Url::parse(&normalized)
        .map_err(|e| RestError::Config(format!("invalid base url {raw:?}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RestError::Config(format!(
            "unsupported base url scheme {other:?}"
        ))),
    }
}

/// Client configuration
///
/// Every collaborator can be replaced, which is how tests pin the clock, the
/// request IDs and the signature.
#[derive(Clone)]
pub struct ClientConfig {
    /// API credentials
    pub credentials: Credentials,
    /// API root; method names are appended to it
    pub base_url: String,
    /// Request timeout in seconds, ignored with a custom HTTP client
    pub timeout_secs: u64,
    /// Custom user agent, ignored with a custom HTTP client
    pub user_agent: Option<String>,
    /// Preconfigured HTTP client
    pub http_client: Option<Client>,
    pub clock: Arc<dyn Clock>,
    pub id_generator: Arc<dyn IdGenerator>,
    pub signature_generator: Arc<dyn SignatureGenerator>,
}

impl ClientConfig {
    /// Create a configuration with production defaults
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            http_client: None,
            clock: Arc::new(SystemClock),
            id_generator: Arc::new(SequentialIdGenerator::new()),
            signature_generator: Arc::new(HmacSignatureGenerator),
        }
    }

    /// Set the API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a preconfigured HTTP client
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the nonce source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the request ID source
    pub fn with_id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = id_generator;
        self
    }

    /// Set the signer
    pub fn with_signature_generator(mut self, signer: Arc<dyn SignatureGenerator>) -> Self {
        self.signature_generator = signer;
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("custom_http_client", &self.http_client.is_some())
            .finish_non_exhaustive()
    }
}

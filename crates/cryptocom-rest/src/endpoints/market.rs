//! Public market data endpoints
//!
//! These endpoints don't require authentication. They are sent as plain GETs
//! and draw no request ID, nonce or signature.

use crate::client::{into_result, CryptoComClient};
use crate::error::{require_at_most, require_non_empty, RestResult};
use crate::types::{BookResult, InstrumentsResult, MAX_BOOK_DEPTH};
use cryptocom_types::Params;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

const GET_INSTRUMENTS: &str = "public/get-instruments";
const GET_BOOK: &str = "public/get-book";

/// Public market data endpoints
pub struct MarketEndpoints<'a> {
    client: &'a CryptoComClient,
}

impl<'a> MarketEndpoints<'a> {
    /// Public market data calls made through `client`
    pub fn new(client: &'a CryptoComClient) -> Self {
        Self { client }
    }

    /// List tradable instruments
    #[instrument(skip(self, cancel))]
    pub async fn get_instruments(&self, cancel: &CancellationToken) -> RestResult<InstrumentsResult> {
        debug!("Fetching instruments");

        let response = self
            .client
            .send_public(cancel, GET_INSTRUMENTS, &Params::new())
            .await?;
        into_result(GET_INSTRUMENTS, response)
    }

    /// Get the order book for an instrument
    ///
    /// # Arguments
    /// * `instrument_name` - Instrument (e.g., "BTC_USDT")
    /// * `depth` - Number of levels (1-150), `0` for the exchange default
    #[instrument(skip(self, cancel))]
    pub async fn get_book(
        &self,
        cancel: &CancellationToken,
        instrument_name: &str,
        depth: u32,
    ) -> RestResult<BookResult> {
        require_non_empty("instrument_name", instrument_name)?;
        require_at_most("depth", depth, MAX_BOOK_DEPTH)?;

        let params = Params::new()
            .with("instrument_name", instrument_name)
            .with_opt("depth", (depth != 0).then_some(depth));

        debug!("Fetching order book");

        let response = self.client.send_public(cancel, GET_BOOK, &params).await?;
        into_result(GET_BOOK, response)
    }
}

//! Private account endpoints
//!
//! These endpoints require authentication.

use crate::client::{into_result, CryptoComClient};
use crate::error::{require_non_empty, RestResult};
use crate::types::AccountSummary;
use cryptocom_types::Params;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

const GET_ACCOUNT_SUMMARY: &str = "private/get-account-summary";

/// Private account endpoints
pub struct AccountEndpoints<'a> {
    client: &'a CryptoComClient,
}

impl<'a> AccountEndpoints<'a> {
    /// Account calls made through `client`
    pub fn new(client: &'a CryptoComClient) -> Self {
        Self { client }
    }

    /// Get balances
    ///
    /// # Arguments
    /// * `currency` - Restrict to one currency (e.g., "CRO"); all when `None`
    #[instrument(skip(self, cancel))]
    pub async fn get_account_summary(
        &self,
        cancel: &CancellationToken,
        currency: Option<&str>,
    ) -> RestResult<AccountSummary> {
        if let Some(currency) = currency {
            require_non_empty("currency", currency)?;
        }

        let params = Params::new().with_opt("currency", currency);

        debug!("Fetching account summary");

        let response = self
            .client
            .send_private(cancel, GET_ACCOUNT_SUMMARY, params)
            .await?;
        into_result(GET_ACCOUNT_SUMMARY, response)
    }
}

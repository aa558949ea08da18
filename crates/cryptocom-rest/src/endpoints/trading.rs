//! Trading endpoints for order management
//!
//! These endpoints require authentication. Every call validates its input
//! first; invalid input never draws an ID, a nonce or a signature.

use crate::client::{into_result, CryptoComClient};
use crate::error::{require_at_most, require_non_empty, RestResult};
use crate::types::{
    CreateOrderRequest, CreateOrderResult, GetTradesRequest, OpenOrdersResult, OrderDetailResult,
    TradesResult, MAX_PAGE_SIZE,
};
use cryptocom_types::Params;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

const CANCEL_ALL_ORDERS: &str = "private/cancel-all-orders";
const CANCEL_ORDER: &str = "private/cancel-order";
const CREATE_ORDER: &str = "private/create-order";
const GET_OPEN_ORDERS: &str = "private/get-open-orders";
const GET_ORDER_DETAIL: &str = "private/get-order-detail";
const GET_TRADES: &str = "private/get-trades";

/// Trading endpoints for order management
pub struct TradingEndpoints<'a> {
    client: &'a CryptoComClient,
}

impl<'a> TradingEndpoints<'a> {
    /// Trading calls made through `client`
    pub fn new(client: &'a CryptoComClient) -> Self {
        Self { client }
    }

    /// Cancel all open orders on an instrument
    ///
    /// The exchange acknowledges asynchronously; success means the request
    /// was accepted, not that every order is already gone.
    #[instrument(skip(self, cancel))]
    pub async fn cancel_all_orders(
        &self,
        cancel: &CancellationToken,
        instrument_name: &str,
    ) -> RestResult<()> {
        require_non_empty("instrument_name", instrument_name)?;

        let params = Params::new().with("instrument_name", instrument_name);

        debug!("Cancelling all orders");

        self.client
            .send_private::<Value>(cancel, CANCEL_ALL_ORDERS, params)
            .await?;
        Ok(())
    }

    /// Get executed trades
    #[instrument(skip(self, cancel))]
    pub async fn get_trades(
        &self,
        cancel: &CancellationToken,
        request: &GetTradesRequest,
    ) -> RestResult<TradesResult> {
        request.validate()?;

        debug!("Fetching trade history");

        let response = self
            .client
            .send_private(cancel, GET_TRADES, request.to_params())
            .await?;
        into_result(GET_TRADES, response)
    }

    /// Place a new order
    ///
    /// # Returns
    /// The exchange order ID and echoed client order ID
    #[instrument(
        skip(self, cancel, order),
        fields(instrument = %order.instrument_name, side = %order.side, order_type = %order.order_type)
    )]
    pub async fn create_order(
        &self,
        cancel: &CancellationToken,
        order: &CreateOrderRequest,
    ) -> RestResult<CreateOrderResult> {
        order.validate()?;

        debug!(
            quantity = ?order.quantity,
            price = ?order.price,
            "Placing order"
        );

        let response = self
            .client
            .send_private(cancel, CREATE_ORDER, order.to_params())
            .await?;
        into_result(CREATE_ORDER, response)
    }

    /// Cancel one order
    #[instrument(skip(self, cancel))]
    pub async fn cancel_order(
        &self,
        cancel: &CancellationToken,
        instrument_name: &str,
        order_id: &str,
    ) -> RestResult<()> {
        require_non_empty("instrument_name", instrument_name)?;
        require_non_empty("order_id", order_id)?;

        let params = Params::new()
            .with("instrument_name", instrument_name)
            .with("order_id", order_id);

        debug!("Cancelling order");

        self.client
            .send_private::<Value>(cancel, CANCEL_ORDER, params)
            .await?;
        Ok(())
    }

    /// Get open orders
    ///
    /// # Arguments
    /// * `instrument_name` - Restrict to one instrument; all when `None`
    /// * `page_size` - Orders per page (max 200), `0` for the exchange default
    /// * `page` - Zero-based page number
    #[instrument(skip(self, cancel))]
    pub async fn get_open_orders(
        &self,
        cancel: &CancellationToken,
        instrument_name: Option<&str>,
        page_size: u32,
        page: u32,
    ) -> RestResult<OpenOrdersResult> {
        if let Some(instrument_name) = instrument_name {
            require_non_empty("instrument_name", instrument_name)?;
        }
        require_at_most("page_size", page_size, MAX_PAGE_SIZE)?;

        let params = Params::new()
            .with("page", page)
            .with_opt("page_size", (page_size != 0).then_some(page_size))
            .with_opt("instrument_name", instrument_name);

        debug!("Fetching open orders");

        let response = self
            .client
            .send_private(cancel, GET_OPEN_ORDERS, params)
            .await?;
        into_result(GET_OPEN_ORDERS, response)
    }

    /// Get one order with its fills
    #[instrument(skip(self, cancel))]
    pub async fn get_order_detail(
        &self,
        cancel: &CancellationToken,
        order_id: &str,
    ) -> RestResult<OrderDetailResult> {
        require_non_empty("order_id", order_id)?;

        let params = Params::new().with("order_id", order_id);

        debug!("Fetching order detail");

        let response = self
            .client
            .send_private(cancel, GET_ORDER_DETAIL, params)
            .await?;
        into_result(GET_ORDER_DETAIL, response)
    }
}

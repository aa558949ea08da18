//! HTTP transport for RPC calls
//!
//! Public methods go out as `GET {base}{method}?k=v...`; authenticated methods
//! as `POST {base}{method}` with the JSON envelope as body. Both decode the
//! response into a [`BaseResponse`] regardless of HTTP status, because the
//! exchange reports failures in the body as well as in the status line.
//!
//! The `result` payload stays untyped until the status and code have been
//! classified, so an error reply whose `result` does not fit the expected
//! type still surfaces as the exchange error.

use cryptocom_auth::canonical::canonical_value;
use cryptocom_auth::AuthError;
use cryptocom_types::{classify, BaseResponse, Params, Request};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::error::{RestError, RestResult};

/// Sends envelopes and decodes responses
///
/// Never logs request bodies, signatures or credentials.
#[derive(Debug, Clone)]
pub struct Requester {
    http: Client,
    base_url: Url,
}

impl Requester {
    /// Create a requester for an already validated base URL
    pub fn new(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Base URL method names are appended to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue a public GET with `params` as query string
    ///
    /// Returns the HTTP status alongside the decoded envelope.
    pub async fn get(
        &self,
        cancel: &CancellationToken,
        method: &str,
        params: &Params,
    ) -> RestResult<(u16, BaseResponse<Value>)> {
        let url = self.endpoint(method)?;
        let query = query_pairs(params)?;

        let mut builder = self.http.get(url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }

        debug!(method, "sending GET request");
        self.execute(cancel, builder).await
    }

    /// Issue an authenticated POST with the envelope as JSON body
    pub async fn post(
        &self,
        cancel: &CancellationToken,
        request: &Request,
    ) -> RestResult<(u16, BaseResponse<Value>)> {
        let url = self.endpoint(&request.method)?;

        debug!(method = %request.method, id = request.id, "sending POST request");
        self.execute(cancel, self.http.post(url).json(request)).await
    }

    /// Map an HTTP status and exchange code to success or a response error
    pub fn check_error_response(http_status_code: u16, code: i64) -> RestResult<()> {
        classify(http_status_code, code).map_err(RestError::from)
    }

    /// Decode the `result` of an already classified envelope into `T`
    ///
    /// A `result` that does not fit `T` is a [`RestError::Decode`] carrying
    /// the HTTP status.
    pub fn decode_result<T: DeserializeOwned>(
        http_status_code: u16,
        response: BaseResponse<Value>,
    ) -> RestResult<BaseResponse<T>> {
        let BaseResponse {
            id,
            method,
            code,
            message,
            result,
        } = response;

        let result = result
            .map(serde_json::from_value::<T>)
            .transpose()
            .map_err(|source| RestError::Decode {
                status: http_status_code,
                source,
            })?;

        Ok(BaseResponse {
            id,
            method,
            code,
            message,
            result,
        })
    }

    fn endpoint(&self, method: &str) -> RestResult<Url> {
        self.base_url
            .join(method)
            .map_err(|e| RestError::Config(format!("invalid method path {method:?}: {e}")))
    }

    async fn execute(
        &self,
        cancel: &CancellationToken,
        builder: RequestBuilder,
    ) -> RestResult<(u16, BaseResponse<Value>)> {
        let exchange = async {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;

            debug!(status, body_len = body.len(), "received response");

            let decoded = serde_json::from_slice::<BaseResponse<Value>>(&body)
                .map_err(|source| RestError::Decode { status, source })?;
            Ok::<_, RestError>((status, decoded))
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("request cancelled");
                Err(RestError::Cancelled)
            }
            result = exchange => result,
        }
    }
}

/// Render parameters as query pairs, values in canonical form
fn query_pairs(params: &Params) -> RestResult<Vec<(String, String)>> {
    params
        .iter()
        .map(|(key, value)| {
            canonical_value(key, value)
                .map(|text| (key.to_string(), text))
                .map_err(|e| match e {
                    AuthError::NonFiniteNumber { key } => {
                        RestError::invalid_parameter(key, "must be a finite number")
                    }
                    other => RestError::Signing(other),
                })
        })
        .collect()
}

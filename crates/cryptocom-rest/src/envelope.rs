//! Signed request envelopes
//!
//! One ID and one nonce are drawn per envelope. The parameters placed in the
//! envelope are the very map that was signed, so the body and the signature
//! cannot disagree.

use cryptocom_auth::{Credentials, SignatureGenerator, SignatureRequest};
use cryptocom_types::{Params, Request};
use tracing::debug;

use crate::clock::Clock;
use crate::error::{RestError, RestResult};
use crate::id::IdGenerator;

/// Assembles authenticated request envelopes
pub struct EnvelopeBuilder<'a> {
    credentials: &'a Credentials,
    clock: &'a dyn Clock,
    ids: &'a dyn IdGenerator,
    signer: &'a dyn SignatureGenerator,
}

impl<'a> EnvelopeBuilder<'a> {
    /// Borrow the client's credentials and seams for one or more envelopes
    pub fn new(
        credentials: &'a Credentials,
        clock: &'a dyn Clock,
        ids: &'a dyn IdGenerator,
        signer: &'a dyn SignatureGenerator,
    ) -> Self {
        Self {
            credentials,
            clock,
            ids,
            signer,
        }
    }

    /// Build and sign a request for `method`
    ///
    /// # Errors
    /// Returns [`RestError::Signing`] if the signer fails.
    pub fn build(&self, method: &str, params: Params) -> RestResult<Request> {
        let id = self.ids.generate();
        let nonce = self.clock.now_millis();

        let signature_request = SignatureRequest::new(self.credentials, id, method, nonce, params);
        let signature = self
            .signer
            .generate_signature(&signature_request)
            .map_err(RestError::Signing)?;

        debug!(method, id, nonce, "signed request envelope");

        let SignatureRequest {
            api_key, params, ..
        } = signature_request;

        Ok(Request {
            id,
            method: method.to_string(),
            api_key,
            params,
            nonce,
            signature,
        })
    }
}

impl std::fmt::Debug for EnvelopeBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeBuilder")
            .field("credentials", self.credentials)
            .finish_non_exhaustive()
    }
}

//! Common test utilities and fixtures for integration tests
//!
//! Every test runs against a local wiremock server. The clock is frozen and
//! IDs and signatures come from mocks unless a test exercises the real signer.

#![allow(dead_code)]

use std::sync::Arc;

use cryptocom_auth::{AuthResult, Credentials, HmacSignatureGenerator, SignatureGenerator, SignatureRequest};
use cryptocom_rest::{ClientConfig, CryptoComClient, FixedClock, IdGenerator, SequentialIdGenerator};
use hmac::{Hmac, Mac};
use mockall::mock;
use serde_json::{json, Value};
use sha2::Sha256;
use wiremock::{MockServer, Request};

pub const API_KEY: &str = "test-api-key";
pub const SECRET_KEY: &str = "test-secret-key";
pub const NOW: i64 = 1_587_846_358_253;
pub const REQUEST_ID: i64 = 1234;
pub const SIGNATURE: &str = "mock-signature";

/// Base URL that refuses connections
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1/";

mock! {
    pub Ids {}

    impl IdGenerator for Ids {
        fn generate(&self) -> i64;
    }
}

mock! {
    pub Signer {}

    impl SignatureGenerator for Signer {
        fn generate_signature(&self, request: &SignatureRequest) -> AuthResult<String>;
    }
}

pub fn credentials() -> Credentials {
    Credentials::new(API_KEY, SECRET_KEY).unwrap()
}

/// ID generator expected to be drawn exactly once
pub fn one_id() -> MockIds {
    let mut ids = MockIds::new();
    ids.expect_generate().times(1).return_const(REQUEST_ID);
    ids
}

/// ID generator that must not be touched
pub fn no_ids() -> MockIds {
    let mut ids = MockIds::new();
    ids.expect_generate().never();
    ids
}

/// Signer that must not be touched
pub fn no_signer() -> MockSigner {
    let mut signer = MockSigner::new();
    signer.expect_generate_signature().never();
    signer
}

/// Signer expected once for `method`, returning [`SIGNATURE`]
pub fn signer_for(method: &'static str) -> MockSigner {
    let mut signer = MockSigner::new();
    signer
        .expect_generate_signature()
        .withf(move |req| {
            req.api_key == API_KEY
                && secret_of(req) == SECRET_KEY
                && req.id == REQUEST_ID
                && req.method == method
                && req.timestamp == NOW
        })
        .times(1)
        .returning(|_| Ok(SIGNATURE.to_string()));
    signer
}

fn secret_of(req: &SignatureRequest) -> &str {
    use cryptocom_auth::ExposeSecret;
    req.secret_key.expose_secret()
}

/// Client wired to mocks
pub fn mock_client(base_url: &str, ids: MockIds, signer: MockSigner) -> CryptoComClient {
    let config = ClientConfig::new(credentials())
        .with_base_url(base_url)
        .with_clock(Arc::new(FixedClock::new(NOW)))
        .with_id_generator(Arc::new(ids))
        .with_signature_generator(Arc::new(signer));
    CryptoComClient::with_config(config).unwrap()
}

/// Client with the production signer and a counter starting at [`REQUEST_ID`]
pub fn signing_client(base_url: &str) -> CryptoComClient {
    let config = ClientConfig::new(credentials())
        .with_base_url(base_url)
        .with_clock(Arc::new(FixedClock::new(NOW)))
        .with_id_generator(Arc::new(SequentialIdGenerator::starting_at(REQUEST_ID)))
        .with_signature_generator(Arc::new(HmacSignatureGenerator));
    CryptoComClient::with_config(config).unwrap()
}

/// Base URL of a mock server, with the trailing slash the client expects
pub fn base_url(server: &MockServer) -> String {
    format!("{}/", server.uri())
}

/// Reference HMAC-SHA256 computed without the crate under test
pub fn reference_signature(payload: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET_KEY.as_bytes()).unwrap();
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Successful response envelope
pub fn ok_body(method: &str, result: Value) -> Value {
    json!({
        "id": REQUEST_ID,
        "method": method,
        "code": 0,
        "result": result,
    })
}

/// All requests the server has seen
pub async fn received(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap_or_default()
}

/// JSON body of the only request the server has seen
pub async fn single_body(server: &MockServer) -> Value {
    let requests = received(server).await;
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests[0].body_json::<Value>().unwrap()
}

/// Sample trade list captured from the exchange documentation
pub fn trade_list() -> Value {
    json!({
        "trade_list": [{
            "side": "SELL",
            "instrument_name": "ETH_CRO",
            "fee": 0.007,
            "trade_id": "371303044218155296",
            "create_time": 1588902493045u64,
            "traded_price": 7,
            "traded_quantity": 1,
            "fee_currency": "CRO",
            "order_id": "371302913889488619"
        }, {
            "side": "SELL",
            "instrument_name": "ETH_CRO",
            "fee": 0.007,
            "trade_id": "371303044218155297",
            "create_time": 1588902493045u64,
            "traded_price": 7,
            "traded_quantity": 1,
            "fee_currency": "CRO",
            "order_id": "371302913889488619"
        }]
    })
}

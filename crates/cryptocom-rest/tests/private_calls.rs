//! Integration tests for authenticated calls
//!
//! Covers the request envelope on the wire, error classification and the
//! guarantee that nothing is generated or sent for invalid or cancelled calls.

mod common;

use std::collections::HashSet;
use std::error::Error;
use std::time::Duration;

use common::*;
use cryptocom_auth::AuthError;
use cryptocom_rest::{CancellationToken, ExchangeError, RestError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CANCEL_ALL: &str = "private/cancel-all-orders";

// =============================================================================
// Envelope Tests
// =============================================================================

#[tokio::test]
async fn test_cancel_all_orders_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/private/cancel-all-orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": REQUEST_ID,
            "method": CANCEL_ALL,
            "code": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&base_url(&server), one_id(), signer_for(CANCEL_ALL));
    client
        .cancel_all_orders(&CancellationToken::new(), "BTC_USDT")
        .await
        .unwrap();

    let body = single_body(&server).await;
    assert_eq!(
        body,
        json!({
            "id": REQUEST_ID,
            "method": CANCEL_ALL,
            "api_key": API_KEY,
            "params": {"instrument_name": "BTC_USDT"},
            "nonce": NOW,
            "sig": SIGNATURE
        })
    );
}

#[tokio::test]
async fn test_real_signature_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .mount(&server)
        .await;

    let client = signing_client(&base_url(&server));
    client
        .cancel_all_orders(&CancellationToken::new(), "BTC_USDT")
        .await
        .unwrap();

    let body = single_body(&server).await;
    let payload = format!("{CANCEL_ALL}{REQUEST_ID}{API_KEY}instrument_nameBTC_USDT{NOW}");
    assert_eq!(body["sig"], json!(reference_signature(&payload)));
    assert_eq!(body["id"], json!(REQUEST_ID));
}

#[tokio::test]
async fn test_concurrent_calls_get_distinct_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .mount(&server)
        .await;

    let client = signing_client(&base_url(&server));
    let handles: Vec<_> = (0..10)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .cancel_all_orders(&CancellationToken::new(), "BTC_USDT")
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let requests = received(&server).await;
    assert_eq!(requests.len(), 10);

    let ids: HashSet<i64> = requests
        .iter()
        .map(|r| r.body_json::<serde_json::Value>().unwrap()["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 10);
}

// =============================================================================
// Validation and Cancellation Tests
// =============================================================================

#[tokio::test]
async fn test_empty_instrument_rejected_before_anything_happens() {
    let server = MockServer::start().await;
    let client = mock_client(&base_url(&server), no_ids(), no_signer());

    let err = client
        .cancel_all_orders(&CancellationToken::new(), "")
        .await
        .unwrap_err();

    match err {
        RestError::InvalidParameter(e) => {
            assert_eq!(e.parameter, "instrument_name");
            assert_eq!(e.reason, "cannot be empty");
        }
        other => panic!("expected invalid parameter, got {other:?}"),
    }
    assert!(received(&server).await.is_empty());
}

#[tokio::test]
async fn test_cancelled_token_draws_nothing() {
    let server = MockServer::start().await;
    let client = mock_client(&base_url(&server), no_ids(), no_signer());

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client.cancel_all_orders(&cancel, "BTC_USDT").await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(received(&server).await.is_empty());
}

#[tokio::test]
async fn test_cancel_while_in_flight() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 0}))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let client = mock_client(&base_url(&server), one_id(), signer_for(CANCEL_ALL));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        client.cancel_all_orders(&cancel, "BTC_USDT"),
    )
    .await
    .expect("call did not return promptly after cancellation");

    assert!(matches!(result, Err(RestError::Cancelled)));
}

// =============================================================================
// Failure Tests
// =============================================================================

#[tokio::test]
async fn test_signing_failure_sends_nothing() {
    let server = MockServer::start().await;

    let mut signer = MockSigner::new();
    signer
        .expect_generate_signature()
        .times(1)
        .returning(|_| Err(AuthError::InvalidKey("rejected".to_string())));

    let client = mock_client(&base_url(&server), one_id(), signer);
    let err = client
        .cancel_all_orders(&CancellationToken::new(), "BTC_USDT")
        .await
        .unwrap_err();

    assert!(matches!(err, RestError::Signing(AuthError::InvalidKey(_))));
    assert!(received(&server).await.is_empty());
}

#[tokio::test]
async fn test_transport_failure() {
    let client = mock_client(UNREACHABLE_URL, one_id(), signer_for(CANCEL_ALL));

    let err = client
        .cancel_all_orders(&CancellationToken::new(), "BTC_USDT")
        .await
        .unwrap_err();

    assert!(matches!(err, RestError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn test_illegal_ip_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/private/cancel-all-orders"))
        .respond_with(ResponseTemplate::new(418).set_body_json(json!({"code": "10003"})))
        .mount(&server)
        .await;

    let client = mock_client(&base_url(&server), one_id(), signer_for(CANCEL_ALL));
    let err = client
        .cancel_all_orders(&CancellationToken::new(), "BTC_USDT")
        .await
        .unwrap_err();

    let response = err.response_error().expect("expected a response error");
    assert_eq!(response.code, 10003);
    assert_eq!(response.http_status_code, 418);
    assert_eq!(response.err, ExchangeError::IllegalIp);
    assert!(err.is(ExchangeError::IllegalIp));

    let sentinel = std::iter::successors(Some(&err as &dyn Error), |&e| e.source())
        .find_map(|e| e.downcast_ref::<ExchangeError>());
    assert_eq!(sentinel, Some(&ExchangeError::IllegalIp));
}

#[tokio::test]
async fn test_error_status_with_zero_code_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"code": 0})))
        .mount(&server)
        .await;

    let client = mock_client(&base_url(&server), one_id(), signer_for(CANCEL_ALL));
    let err = client
        .cancel_all_orders(&CancellationToken::new(), "BTC_USDT")
        .await
        .unwrap_err();

    assert!(err.is(ExchangeError::Unknown));
    assert_eq!(err.response_error().unwrap().http_status_code, 500);
}

#[tokio::test]
async fn test_unrecognized_code_keeps_raw_value() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 99999})))
        .mount(&server)
        .await;

    let client = mock_client(&base_url(&server), one_id(), signer_for(CANCEL_ALL));
    let err = client
        .cancel_all_orders(&CancellationToken::new(), "BTC_USDT")
        .await
        .unwrap_err();

    assert!(err.is(ExchangeError::Unknown));
    assert_eq!(err.response_error().unwrap().code, 99999);
}

#[tokio::test]
async fn test_undecodable_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let client = mock_client(&base_url(&server), one_id(), signer_for(CANCEL_ALL));
    let err = client
        .cancel_all_orders(&CancellationToken::new(), "BTC_USDT")
        .await
        .unwrap_err();

    assert!(matches!(err, RestError::Decode { status: 502, .. }), "got {err:?}");
}

//! Request signing
//!
//! Crypto.com signature algorithm:
//! 1. payload = method + id + api_key + canonical(params) + nonce
//! 2. HMAC-SHA256(secret_key, payload)
//! 3. Lowercase hex encode the result
//!
//! `id` and `nonce` are rendered in decimal. See [`crate::canonical`] for the
//! parameter string.

use cryptocom_types::Params;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::canonical::canonicalize;
use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Everything that goes into one request signature
#[derive(Debug)]
pub struct SignatureRequest {
    /// Account API key
    pub api_key: String,
    /// Account secret, used as the MAC key
    pub secret_key: SecretString,
    /// Request ID
    pub id: i64,
    /// RPC method
    pub method: String,
    /// Nonce in epoch milliseconds
    pub timestamp: i64,
    /// Request parameters
    pub params: Params,
}

impl SignatureRequest {
    /// Create a signature request for the given credentials
    pub fn new(
        credentials: &Credentials,
        id: i64,
        method: impl Into<String>,
        timestamp: i64,
        params: Params,
    ) -> Self {
        Self {
            api_key: credentials.api_key().to_string(),
            secret_key: SecretString::from(credentials.secret_key().expose_secret().to_owned()),
            id,
            method: method.into(),
            timestamp,
            params,
        }
    }

    /// Build the string that gets signed
    pub fn payload(&self) -> AuthResult<String> {
        let params = canonicalize(&self.params)?;
        Ok(format!(
            "{}{}{}{}{}",
            self.method, self.id, self.api_key, params, self.timestamp
        ))
    }
}

/// Produces request signatures
///
/// The client calls this once per authenticated request. Implementations must
/// be pure functions of the request so they can be swapped for test doubles.
pub trait SignatureGenerator: Send + Sync {
    /// Compute the signature for a request
    fn generate_signature(&self, request: &SignatureRequest) -> AuthResult<String>;
}

/// HMAC-SHA256 signer used by default
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSignatureGenerator;

impl HmacSignatureGenerator {
    /// Create a new signer
    pub fn new() -> Self {
        Self
    }
}

impl SignatureGenerator for HmacSignatureGenerator {
    fn generate_signature(&self, request: &SignatureRequest) -> AuthResult<String> {
        let payload = request.payload()?;
        sign_payload(&request.secret_key, &payload)
    }
}

/// HMAC-SHA256 a payload with the secret key, hex encoded
pub fn sign_payload(secret_key: &SecretString, payload: &str) -> AuthResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret_key.expose_secret().as_bytes())
        .map_err(|e| AuthError::InvalidKey(e.to_string()))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(params: Params) -> SignatureRequest {
        let creds = Credentials::new("k", "s").unwrap();
        SignatureRequest::new(&creds, 1234, "private/cancel-all-orders", 1_700_000_000_000, params)
    }

    #[test]
    fn test_known_answer() {
        // Published HMAC-SHA256 reference vector
        let secret = SecretString::from("key".to_string());
        let sig = sign_payload(&secret, "The quick brown fox jumps over the lazy dog").unwrap();
        assert_eq!(
            sig,
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn test_payload_layout() {
        let req = request(Params::new().with("instrument_name", "BTC_USDT"));
        assert_eq!(
            req.payload().unwrap(),
            "private/cancel-all-orders1234kinstrument_nameBTC_USDT1700000000000"
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let signer = HmacSignatureGenerator::new();
        let a = signer
            .generate_signature(&request(Params::new().with("page", 1)))
            .unwrap();
        let b = signer
            .generate_signature(&request(Params::new().with("page", 1.0)))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_signature_matches_manual_hmac() {
        let req = request(Params::new().with("instrument_name", "BTC_USDT"));
        let expected = sign_payload(
            &SecretString::from("s".to_string()),
            "private/cancel-all-orders1234kinstrument_nameBTC_USDT1700000000000",
        )
        .unwrap();
        assert_eq!(
            HmacSignatureGenerator.generate_signature(&req).unwrap(),
            expected
        );
    }

    #[test]
    fn test_different_params_change_signature() {
        let signer = HmacSignatureGenerator;
        let a = signer
            .generate_signature(&request(Params::new().with("ids", vec!["a", "b"])))
            .unwrap();
        let b = signer
            .generate_signature(&request(Params::new().with("ids", vec!["b", "a"])))
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_canonicalization_failure_surfaces() {
        let req = request(Params::new().with("price", f64::NAN));
        assert!(matches!(
            HmacSignatureGenerator.generate_signature(&req),
            Err(AuthError::NonFiniteNumber { .. })
        ));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let creds = Credentials::new("k", "super-secret-value").unwrap();
        let req = SignatureRequest::new(&creds, 1, "m", 2, Params::new());
        assert!(!format!("{:?}", req).contains("super-secret-value"));
    }
}

//! Wire envelopes for the Crypto.com Exchange JSON-RPC API

use crate::params::Params;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request Envelope
// ============================================================================

/// Request body of an RPC call
///
/// Authenticated calls carry every field. Public calls only use `method` and
/// `params`, the latter sent as a query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Correlation ID, echoed in the response
    pub id: i64,
    /// RPC method, e.g. `private/get-trades`
    pub method: String,
    /// Account API key
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    /// Method parameters
    #[serde(default)]
    pub params: Params,
    /// Millisecond timestamp used by the exchange for replay protection
    pub nonce: i64,
    /// Lowercase hex HMAC over the canonical request
    #[serde(rename = "sig", default, skip_serializing_if = "String::is_empty")]
    pub signature: String,
}

// ============================================================================
// Response Envelope
// ============================================================================

/// Response envelope common to every RPC method
#[derive(Debug, Clone, Deserialize)]
pub struct BaseResponse<T> {
    /// Echoed request ID
    #[serde(default)]
    pub id: i64,
    /// Echoed method
    #[serde(default)]
    pub method: String,
    /// Exchange status code, `0` on success
    #[serde(default, deserialize_with = "deserialize_code")]
    pub code: i64,
    /// Optional human readable error detail
    #[serde(default)]
    pub message: Option<String>,
    /// Method-specific payload
    pub result: Option<T>,
}

impl<T> BaseResponse<T> {
    /// Check if the exchange reported success
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// The exchange sends `code` as either a number or a numeric string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCode {
    Number(i64),
    Text(String),
    Null(()),
}

fn deserialize_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match RawCode::deserialize(deserializer)? {
        RawCode::Number(n) => Ok(n),
        RawCode::Null(()) => Ok(0),
        RawCode::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse()
                .map_err(|_| de::Error::custom(format!("invalid response code: {s:?}")))
        }
    }
}

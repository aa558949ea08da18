//! Error types for REST API operations
//!
//! [`RestError`] is a closed set of failure kinds. Each variant names the stage
//! that failed and keeps its cause reachable through
//! [`std::error::Error::source`], so a response error can be traced down to the
//! [`ExchangeError`] sentinel without string matching.

use cryptocom_auth::AuthError;
use cryptocom_types::{ExchangeError, RecoveryStrategy, ResponseError};

/// A caller-supplied parameter failed client-side validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid parameter {parameter}: {reason}")]
pub struct InvalidParameterError {
    /// Name of the offending parameter
    pub parameter: String,
    /// Why it was rejected
    pub reason: String,
}

impl InvalidParameterError {
    /// Create a new validation error
    pub fn new(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Caller input rejected before any network call
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameterError),

    /// Invalid API credentials
    #[error("Invalid credentials")]
    Credentials(#[source] AuthError),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Signature could not be computed; nothing was sent
    #[error("Failed to generate signature")]
    Signing(#[source] AuthError),

    /// HTTP request failed before a response was read
    #[error("Failed to execute request: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not a valid envelope
    #[error("Failed to decode response (HTTP {status}): {source}")]
    Decode {
        /// HTTP status of the undecodable response
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The caller's cancellation token fired
    #[error("Request cancelled")]
    Cancelled,

    /// Exchange reported a failure
    #[error("Error received in response: {0}")]
    Response(#[from] ResponseError),

    /// Successful response without the expected payload
    #[error("Response to {method} carried no result")]
    MissingResult {
        /// RPC method that was called
        method: String,
    },
}

impl RestError {
    /// Create a validation error
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter(InvalidParameterError::new(parameter, reason))
    }

    /// Get the exchange response error, if this is one
    pub fn response_error(&self) -> Option<&ResponseError> {
        match self {
            Self::Response(err) => Some(err),
            _ => None,
        }
    }

    /// Get the exchange sentinel, if this is a response error
    pub fn exchange_error(&self) -> Option<ExchangeError> {
        self.response_error().map(|err| err.err)
    }

    /// Check if this error carries the given exchange sentinel
    pub fn is(&self, sentinel: ExchangeError) -> bool {
        self.exchange_error() == Some(sentinel)
    }

    /// Check if the call was cancelled by the caller
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this error indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        self.response_error().is_some_and(ResponseError::is_rate_limit)
    }

    /// Get the recovery hint for this error
    ///
    /// The client itself never retries; this only informs the caller.
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            Self::Response(err) if err.is_rate_limit() => RecoveryStrategy::rate_limit_backoff(),
            Self::Response(err) => err.err.recovery_strategy(),
            Self::Transport(err) if err.is_timeout() || err.is_connect() => RecoveryStrategy::Backoff {
                initial_ms: 1000,
                max_ms: 30000,
                multiplier: 2,
            },
            Self::InvalidParameter(_) => RecoveryStrategy::Skip,
            Self::Credentials(_) | Self::Config(_) | Self::Signing(_) => RecoveryStrategy::Fatal,
            Self::Transport(_) | Self::Decode { .. } | Self::MissingResult { .. } | Self::Cancelled => {
                RecoveryStrategy::Manual
            }
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// Reject an empty required string parameter
pub(crate) fn require_non_empty(parameter: &str, value: &str) -> RestResult<()> {
    if value.is_empty() {
        return Err(RestError::invalid_parameter(parameter, "cannot be empty"));
    }
    Ok(())
}

/// Reject a value above an exchange-documented maximum
pub(crate) fn require_at_most(parameter: &str, value: u32, max: u32) -> RestResult<()> {
    if value > max {
        return Err(RestError::invalid_parameter(
            parameter,
            format!("cannot be greater than {max}"),
        ));
    }
    Ok(())
}

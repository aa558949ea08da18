//! Error types for authentication operations

/// Errors that can occur while preparing or signing a request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Invalid API credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// The secret could not be used as a MAC key
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    /// A parameter holds NaN or infinity, which has no JSON representation
    #[error("Parameter {key} is not a finite number")]
    NonFiniteNumber {
        /// Path of the offending parameter, e.g. `price` or `orders[1].price`
        key: String,
    },
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

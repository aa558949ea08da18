//! Request signing for the Crypto.com Exchange API
//!
//! Private RPC methods must carry an HMAC-SHA256 signature over the method,
//! request ID, API key, the canonical parameter string and the nonce. This
//! crate owns that computation and nothing else: it never performs I/O.
//!
//! # Example
//!
//! ```
//! use cryptocom_auth::{Credentials, HmacSignatureGenerator, SignatureGenerator, SignatureRequest};
//! use cryptocom_types::Params;
//!
//! # fn main() -> Result<(), cryptocom_auth::AuthError> {
//! let creds = Credentials::new("api-key", "secret-key")?;
//! let params = Params::new().with("instrument_name", "BTC_USDT");
//! let request = SignatureRequest::new(&creds, 1, "private/cancel-all-orders", 1_700_000_000_000, params);
//!
//! let sig = HmacSignatureGenerator.generate_signature(&request)?;
//! assert_eq!(sig.len(), 64);
//! # Ok(())
//! # }
//! ```

pub mod canonical;
mod credentials;
mod error;
mod signature;

pub use canonical::canonicalize;
pub use credentials::{Credentials, API_KEY_ENV, SECRET_KEY_ENV};
pub use error::{AuthError, AuthResult};
pub use signature::{sign_payload, HmacSignatureGenerator, SignatureGenerator, SignatureRequest};

// Re-export so callers can build secrets without naming the dependency
pub use secrecy::{ExposeSecret, SecretString};

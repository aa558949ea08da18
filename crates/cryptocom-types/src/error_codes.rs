//! Crypto.com Exchange response code mapping and response classification
//!
//! Every RPC response carries a numeric `code`. Zero means success; anything
//! else identifies a failure. [`ExchangeError`] is the stable sentinel for each
//! known code, and [`classify`] turns an (HTTP status, code) pair into either
//! success or a [`ResponseError`].
//!
//! # Example
//!
//! ```
//! use cryptocom_types::{classify, ExchangeError};
//!
//! assert!(classify(200, 0).is_ok());
//!
//! let err = classify(418, 10003).unwrap_err();
//! assert_eq!(err.err, ExchangeError::IllegalIp);
//! assert_eq!(err.http_status_code, 418);
//! ```

use std::time::Duration;

/// Recovery hint for handling exchange errors
///
/// This is advisory only; the client never retries on its own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecoveryStrategy {
    /// Exponential backoff before retry
    Backoff {
        initial_ms: u64,
        max_ms: u64,
        multiplier: u32,
    },
    /// Regenerate nonce or credentials before trying again
    Reauthenticate,
    /// Requires user intervention (e.g., add funds)
    UserAction { message: &'static str },
    /// Request is invalid as built; fix it rather than resend it
    Skip,
    /// Cannot recover programmatically
    Fatal,
    /// Manual investigation needed
    #[default]
    Manual,
}

impl RecoveryStrategy {
    /// Default exponential backoff for rate limits
    pub fn rate_limit_backoff() -> Self {
        Self::Backoff {
            initial_ms: 1000,
            max_ms: 60000,
            multiplier: 2,
        }
    }

    /// Get the initial delay duration
    pub fn initial_delay(&self) -> Option<Duration> {
        match self {
            Self::Backoff { initial_ms, .. } => Some(Duration::from_millis(*initial_ms)),
            _ => None,
        }
    }

    /// Check if this strategy allows resending the request
    pub fn allows_retry(&self) -> bool {
        matches!(self, Self::Backoff { .. } | Self::Reauthenticate)
    }
}

/// Known exchange response codes
///
/// Each variant is a stable sentinel for one failure condition, so callers can
/// match on it. Codes the table does not know map to [`ExchangeError::Unknown`];
/// the raw value stays available on [`ResponseError::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ExchangeError {
    // === System / request errors (10xxx) ===
    /// 10001: malformed request or internal failure
    #[error("malformed request")]
    SysError,
    /// 10002: not authenticated, or key/signature incorrect
    #[error("not authenticated, or key/signature incorrect")]
    Unauthorized,
    /// 10003: IP address not whitelisted
    #[error("IP address not whitelisted")]
    IllegalIp,
    /// 10004: missing required fields
    #[error("missing required fields")]
    BadRequest,
    /// 10005: disallowed based on user tier
    #[error("disallowed based on user tier")]
    UserTierInvalid,
    /// 10006: request rate limit exceeded
    #[error("requests have exceeded rate limits")]
    TooManyRequests,
    /// 10007: nonce differs by more than 30 seconds from server time
    #[error("nonce value differs by more than 30 seconds from server")]
    InvalidNonce,
    /// 10008: invalid method specified
    #[error("invalid method specified")]
    MethodNotFound,
    /// 10009: invalid date range
    #[error("invalid date range")]
    InvalidDateRange,

    // === Account errors (20xxx) ===
    /// 20001: duplicated record
    #[error("duplicated record")]
    DuplicateRecord,
    /// 20002: insufficient balance
    #[error("insufficient balance")]
    NegativeBalance,

    // === Order errors (30xxx) ===
    /// 30003: invalid instrument name
    #[error("invalid instrument_name specified")]
    SymbolNotFound,
    /// 30004: invalid side
    #[error("invalid side specified")]
    SideNotSupported,
    /// 30005: invalid order type
    #[error("invalid type specified")]
    OrderTypeNotSupported,
    /// 30006: price below minimum
    #[error("price is lower than the minimum")]
    MinPriceViolated,
    /// 30007: price above maximum
    #[error("price is higher than the maximum")]
    MaxPriceViolated,
    /// 30008: quantity below minimum
    #[error("quantity is lower than the minimum")]
    MinQuantityViolated,
    /// 30009: quantity above maximum
    #[error("quantity is higher than the maximum")]
    MaxQuantityViolated,
    /// 30010: required argument is blank or missing
    #[error("required argument is blank or missing")]
    MissingArgument,
    /// 30013: too many decimal places for price
    #[error("too many decimal places for price")]
    InvalidPricePrecision,
    /// 30014: too many decimal places for quantity
    #[error("too many decimal places for quantity")]
    InvalidQuantityPrecision,
    /// 30016: notional below minimum
    #[error("price x quantity is lower than the minimum")]
    MinNotionalViolated,
    /// 30017: notional above maximum
    #[error("price x quantity is higher than the maximum")]
    MaxNotionalViolated,
    /// 30023: amount below minimum
    #[error("amount is lower than the minimum")]
    MinAmountViolated,
    /// 30024: amount above maximum
    #[error("amount is higher than the maximum")]
    MaxAmountViolated,
    /// 30025: amount precision overflow
    #[error("amount precision overflow")]
    AmountPrecisionOverflow,

    // === Margin errors (40xxx) ===
    /// 40001: operation not permitted for this account status
    #[error("operation has been restricted for this account status")]
    MgInvalidAccountStatus,
    /// 40002: transfer not allowed while a loan is active
    #[error("transfer is not allowed with an active loan")]
    MgTransferActiveLoan,
    /// 40003: currency not eligible for borrowing
    #[error("currency is not eligible for borrowing")]
    MgInvalidLoanCurrency,
    /// 40004: only supports full repayment
    #[error("only supports full repayment of the loan")]
    MgInvalidRepayAmount,
    /// 40005: no active loan
    #[error("no active loan")]
    MgNoActiveLoan,
    /// 40006: borrowing suspended
    #[error("borrowing is suspended")]
    MgBlockedBorrow,
    /// 40007: new orders blocked
    #[error("new order placement is blocked")]
    MgBlockedNewOrder,

    // === Deposit/withdrawal errors (50xxx) ===
    /// 50001: credit line not maintained
    #[error("credit line not maintained")]
    DwCreditLineNotMaintained,

    /// Any code missing from the table above
    #[error("unknown error code")]
    Unknown,
}

impl ExchangeError {
    /// Look up the sentinel for a raw exchange code
    ///
    /// Codes outside the table map to [`ExchangeError::Unknown`].
    pub fn from_code(code: i64) -> Self {
        match code {
            10001 => Self::SysError,
            10002 => Self::Unauthorized,
            10003 => Self::IllegalIp,
            10004 => Self::BadRequest,
            10005 => Self::UserTierInvalid,
            10006 => Self::TooManyRequests,
            10007 => Self::InvalidNonce,
            10008 => Self::MethodNotFound,
            10009 => Self::InvalidDateRange,
            20001 => Self::DuplicateRecord,
            20002 => Self::NegativeBalance,
            30003 => Self::SymbolNotFound,
            30004 => Self::SideNotSupported,
            30005 => Self::OrderTypeNotSupported,
            30006 => Self::MinPriceViolated,
            30007 => Self::MaxPriceViolated,
            30008 => Self::MinQuantityViolated,
            30009 => Self::MaxQuantityViolated,
            30010 => Self::MissingArgument,
            30013 => Self::InvalidPricePrecision,
            30014 => Self::InvalidQuantityPrecision,
            30016 => Self::MinNotionalViolated,
            30017 => Self::MaxNotionalViolated,
            30023 => Self::MinAmountViolated,
            30024 => Self::MaxAmountViolated,
            30025 => Self::AmountPrecisionOverflow,
            40001 => Self::MgInvalidAccountStatus,
            40002 => Self::MgTransferActiveLoan,
            40003 => Self::MgInvalidLoanCurrency,
            40004 => Self::MgInvalidRepayAmount,
            40005 => Self::MgNoActiveLoan,
            40006 => Self::MgBlockedBorrow,
            40007 => Self::MgBlockedNewOrder,
            50001 => Self::DwCreditLineNotMaintained,
            _ => Self::Unknown,
        }
    }

    /// The raw code this sentinel stands for, `None` for [`ExchangeError::Unknown`]
    pub fn code(&self) -> Option<i64> {
        Some(match self {
            Self::SysError => 10001,
            Self::Unauthorized => 10002,
            Self::IllegalIp => 10003,
            Self::BadRequest => 10004,
            Self::UserTierInvalid => 10005,
            Self::TooManyRequests => 10006,
            Self::InvalidNonce => 10007,
            Self::MethodNotFound => 10008,
            Self::InvalidDateRange => 10009,
            Self::DuplicateRecord => 20001,
            Self::NegativeBalance => 20002,
            Self::SymbolNotFound => 30003,
            Self::SideNotSupported => 30004,
            Self::OrderTypeNotSupported => 30005,
            Self::MinPriceViolated => 30006,
            Self::MaxPriceViolated => 30007,
            Self::MinQuantityViolated => 30008,
            Self::MaxQuantityViolated => 30009,
            Self::MissingArgument => 30010,
            Self::InvalidPricePrecision => 30013,
            Self::InvalidQuantityPrecision => 30014,
            Self::MinNotionalViolated => 30016,
            Self::MaxNotionalViolated => 30017,
            Self::MinAmountViolated => 30023,
            Self::MaxAmountViolated => 30024,
            Self::AmountPrecisionOverflow => 30025,
            Self::MgInvalidAccountStatus => 40001,
            Self::MgTransferActiveLoan => 40002,
            Self::MgInvalidLoanCurrency => 40003,
            Self::MgInvalidRepayAmount => 40004,
            Self::MgNoActiveLoan => 40005,
            Self::MgBlockedBorrow => 40006,
            Self::MgBlockedNewOrder => 40007,
            Self::DwCreditLineNotMaintained => 50001,
            Self::Unknown => return None,
        })
    }

    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::TooManyRequests)
    }

    /// Check if this error concerns credentials, IP whitelisting or the nonce
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::IllegalIp | Self::InvalidNonce | Self::UserTierInvalid
        )
    }

    /// Get the recovery hint for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            Self::TooManyRequests => RecoveryStrategy::rate_limit_backoff(),
            Self::SysError => RecoveryStrategy::Backoff {
                initial_ms: 5000,
                max_ms: 120000,
                multiplier: 2,
            },

            // A fresh nonce usually fixes a clock-skew rejection
            Self::InvalidNonce => RecoveryStrategy::Reauthenticate,

            Self::Unauthorized | Self::UserTierInvalid => RecoveryStrategy::Fatal,
            Self::IllegalIp => RecoveryStrategy::UserAction {
                message: "Add this IP address to the API key whitelist",
            },

            Self::NegativeBalance => RecoveryStrategy::UserAction {
                message: "Insufficient balance - deposit more or reduce order size",
            },
            Self::MgBlockedBorrow | Self::MgBlockedNewOrder | Self::MgInvalidAccountStatus => {
                RecoveryStrategy::UserAction {
                    message: "Account is restricted - contact support",
                }
            }
            Self::DwCreditLineNotMaintained => RecoveryStrategy::UserAction {
                message: "Credit line not maintained - add collateral",
            },

            Self::BadRequest
            | Self::MethodNotFound
            | Self::InvalidDateRange
            | Self::DuplicateRecord
            | Self::SymbolNotFound
            | Self::SideNotSupported
            | Self::OrderTypeNotSupported
            | Self::MinPriceViolated
            | Self::MaxPriceViolated
            | Self::MinQuantityViolated
            | Self::MaxQuantityViolated
            | Self::MissingArgument
            | Self::InvalidPricePrecision
            | Self::InvalidQuantityPrecision
            | Self::MinNotionalViolated
            | Self::MaxNotionalViolated
            | Self::MinAmountViolated
            | Self::MaxAmountViolated
            | Self::AmountPrecisionOverflow
            | Self::MgTransferActiveLoan
            | Self::MgInvalidLoanCurrency
            | Self::MgInvalidRepayAmount
            | Self::MgNoActiveLoan => RecoveryStrategy::Skip,

            Self::Unknown => RecoveryStrategy::Manual,
        }
    }
}

/// Failure reported by the exchange in a parsed response
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("exchange returned code {code} (HTTP {http_status_code}): {err}")]
pub struct ResponseError {
    /// Raw exchange code, preserved even when unrecognized
    pub code: i64,
    /// HTTP status of the response
    pub http_status_code: u16,
    /// Sentinel for the code
    #[source]
    pub err: ExchangeError,
}

impl ResponseError {
    /// Build a response error, resolving the sentinel from the code
    pub fn new(http_status_code: u16, code: i64) -> Self {
        Self {
            code,
            http_status_code,
            err: ExchangeError::from_code(code),
        }
    }

    /// Check if the exchange rejected the request for exceeding rate limits
    ///
    /// HTTP 429 counts even when the body carried no recognizable code.
    pub fn is_rate_limit(&self) -> bool {
        self.err.is_rate_limit() || self.http_status_code == 429
    }
}

/// Classify an HTTP status and exchange code
///
/// Success requires both a 2xx status and code `0`. Any other combination is a
/// [`ResponseError`]; a non-2xx status with code `0` maps to
/// [`ExchangeError::Unknown`].
pub fn classify(http_status_code: u16, code: i64) -> Result<(), ResponseError> {
    if (200..300).contains(&http_status_code) && code == 0 {
        return Ok(());
    }
    Err(ResponseError::new(http_status_code, code))
}

//! Shared types for the Crypto.com Exchange JSON-RPC API
//!
//! This crate provides the core type definitions used across the workspace.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Params`], [`ParamValue`] - Request parameters as a closed value type
//! - [`Request`], [`BaseResponse`] - Wire envelopes
//! - [`ExchangeError`], [`ResponseError`], [`classify`] - Response code mapping
//! - [`Side`], [`OrderType`], [`TimeInForce`] - Order enums

pub mod enums;
pub mod error_codes;
pub mod messages;
pub mod params;

// Re-export commonly used types
pub use enums::*;
pub use error_codes::*;
pub use messages::*;
pub use params::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;

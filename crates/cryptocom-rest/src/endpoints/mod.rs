//! API endpoint implementations
//!
//! Method names double as URL paths below the base URL.

pub mod account;
pub mod market;
pub mod trading;

pub use account::AccountEndpoints;
pub use market::MarketEndpoints;
pub use trading::TradingEndpoints;

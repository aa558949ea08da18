//! Side, OrderType, TimeInForce, ExecInst and OrderStatus enums

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl Side {
    /// Returns the side as used in API messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }

    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Limit order - executes at specified price or better
    Limit,
    /// Market order - executes immediately at best available price
    Market,
    /// Stop-loss order
    StopLoss,
    /// Stop-loss limit order
    StopLimit,
    /// Take-profit order
    TakeProfit,
    /// Take-profit limit order
    TakeProfitLimit,
}

impl OrderType {
    /// Returns the order type as used in API messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
            Self::StopLoss => "STOP_LOSS",
            Self::StopLimit => "STOP_LIMIT",
            Self::TakeProfit => "TAKE_PROFIT",
            Self::TakeProfitLimit => "TAKE_PROFIT_LIMIT",
        }
    }

    /// Returns true if the order type carries a limit price
    pub fn requires_price(&self) -> bool {
        matches!(self, Self::Limit | Self::StopLimit | Self::TakeProfitLimit)
    }

    /// Returns true if the order type carries a trigger price
    pub fn requires_trigger(&self) -> bool {
        !matches!(self, Self::Limit | Self::Market)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time in force for limit orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Good till cancelled (default)
    #[default]
    GoodTillCancel,
    /// Fill or kill
    FillOrKill,
    /// Immediate or cancel
    ImmediateOrCancel,
}

impl TimeInForce {
    /// Returns the time in force as used in API messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoodTillCancel => "GOOD_TILL_CANCEL",
            Self::FillOrKill => "FILL_OR_KILL",
            Self::ImmediateOrCancel => "IMMEDIATE_OR_CANCEL",
        }
    }
}

/// Execution instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecInst {
    /// Only add liquidity; rejected if it would match immediately
    PostOnly,
}

impl ExecInst {
    /// Returns the instruction as used in API messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostOnly => "POST_ONLY",
        }
    }
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Resting on the book
    Active,
    /// Cancelled by user or system
    #[serde(rename = "CANCELED")]
    Cancelled,
    /// Completely filled
    Filled,
    /// Rejected by the matching engine
    Rejected,
    /// Expired
    Expired,
}

impl OrderStatus {
    /// Returns true once the order can no longer change
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

//! Order type (market, limit, etc.).

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an order should interact with the (simulated) market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Market order - execute at best available price.
    Market,
    /// Limit order - execute at specified price or better.
    Limit,
    /// Stop-loss order - triggers when the stop price is reached.
    StopLoss,
    /// Take-profit order - triggers when the target price is reached.
    TakeProfit,
}

impl OrderType {
    /// Returns true if this order type requires a limit price.
    #[must_use]
    pub const fn requires_limit_price(&self) -> bool {
        matches!(self, Self::Limit)
    }

    /// Returns true if this order type requires a stop price.
    #[must_use]
    pub const fn requires_stop_price(&self) -> bool {
        matches!(self, Self::StopLoss)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market => write!(f, "MARKET"),
            Self::Limit => write!(f, "LIMIT"),
            Self::StopLoss => write!(f, "STOP_LOSS"),
            Self::TakeProfit => write!(f, "TAKE_PROFIT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_type_requires_limit_price() {
        assert!(OrderType::Limit.requires_limit_price());
        assert!(!OrderType::Market.requires_limit_price());
        assert!(!OrderType::StopLoss.requires_limit_price());
        assert!(!OrderType::TakeProfit.requires_limit_price());
    }

    #[test]
    fn order_type_requires_stop_price() {
        assert!(OrderType::StopLoss.requires_stop_price());
        assert!(!OrderType::Market.requires_stop_price());
        assert!(!OrderType::Limit.requires_stop_price());
    }

    #[test]
    fn order_type_display() {
        assert_eq!(format!("{}", OrderType::Market), "MARKET");
        assert_eq!(format!("{}", OrderType::StopLoss), "STOP_LOSS");
    }

    #[test]
    fn order_type_serde() {
        let json = serde_json::to_string(&OrderType::TakeProfit).unwrap();
        assert_eq!(json, "\"TAKE_PROFIT\"");

        let parsed: OrderType = serde_json::from_str("\"LIMIT\"").unwrap();
        assert_eq!(parsed, OrderType::Limit);
    }
}

//! Order validation.
//!
//! Pure structural and business-rule checks applied before execution.
//! Rules are checked in a fixed order and the first failure wins, so the
//! reported reason is deterministic for a given order and lookup table.

use crate::config::MinOrderSizes;
use crate::domain::order_execution::Order;

/// Outcome of validating an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Whether the order passed all rules.
    pub valid: bool,
    /// Reason for the first failed rule.
    pub reason: Option<String>,
}

impl ValidationOutcome {
    /// A passing outcome.
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    /// A failing outcome with a reason.
    #[must_use]
    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Validates orders against structural rules and the minimum-order-size
/// table. No side effects.
#[derive(Debug, Clone)]
pub struct OrderValidator {
    min_sizes: MinOrderSizes,
}

impl OrderValidator {
    /// Create a validator over the given minimum-size table.
    #[must_use]
    pub const fn new(min_sizes: MinOrderSizes) -> Self {
        Self { min_sizes }
    }

    /// Validate an order. Rules, first failure wins:
    ///
    /// 1. symbol non-empty
    /// 2. venue non-empty
    /// 3. quantity > 0
    /// 4. quantity ≥ minimum order size for the base currency
    /// 5. limit orders carry a limit price
    /// 6. stop-loss orders carry a stop price
    #[must_use]
    pub fn validate(&self, order: &Order) -> ValidationOutcome {
        if order.symbol().is_empty() {
            return ValidationOutcome::fail("symbol must not be empty");
        }
        if order.venue().is_empty() {
            return ValidationOutcome::fail("venue must not be empty");
        }
        if order.quantity() <= rust_decimal::Decimal::ZERO {
            return ValidationOutcome::fail("quantity must be greater than 0");
        }

        let min_size = self.min_sizes.min_for(order.base_currency());
        if order.quantity() < min_size {
            return ValidationOutcome::fail(format!(
                "quantity {} below minimum order size {min_size}",
                order.quantity()
            ));
        }

        if order.order_type().requires_limit_price() && order.price().is_none() {
            return ValidationOutcome::fail("limit orders require a limit price");
        }
        if order.order_type().requires_stop_price() && order.stop_price().is_none() {
            return ValidationOutcome::fail("stop-loss orders require a stop price");
        }

        ValidationOutcome::pass()
    }
}

//! Execution result value object.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::OrderId;

/// Immutable outcome of one order execution attempt.
///
/// Created exactly once per executor invocation at the terminal
/// transition. The coordinator stamps the pair-wide wall-clock time via
/// [`ExecutionResult::with_execution_secs`], which consumes the value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether the order filled successfully.
    pub success: bool,
    /// The order this result refers to.
    pub order_id: OrderId,
    /// Quantity filled (zero on failure).
    pub filled_quantity: Decimal,
    /// Average fill price (zero on failure).
    pub average_price: Decimal,
    /// Commission charged (zero on failure).
    pub commission: Decimal,
    /// Wall-clock execution seconds.
    pub execution_secs: f64,
    /// Measured slippage fraction (0.003 = 0.3%).
    pub slippage: f64,
    /// Error message for failed executions.
    pub error_message: Option<String>,
}

impl ExecutionResult {
    /// Successful fill.
    #[must_use]
    pub fn filled(
        order_id: OrderId,
        filled_quantity: Decimal,
        average_price: Decimal,
        commission: Decimal,
        execution_secs: f64,
        slippage: f64,
    ) -> Self {
        Self {
            success: true,
            order_id,
            filled_quantity,
            average_price,
            commission,
            execution_secs,
            slippage,
            error_message: None,
        }
    }

    /// Failed execution.
    #[must_use]
    pub fn failed(order_id: OrderId, message: impl Into<String>) -> Self {
        Self {
            success: false,
            order_id,
            filled_quantity: Decimal::ZERO,
            average_price: Decimal::ZERO,
            commission: Decimal::ZERO,
            execution_secs: 0.0,
            slippage: 0.0,
            error_message: Some(message.into()),
        }
    }

    /// Failed execution carrying the measured slippage.
    ///
    /// Slippage-exceeded failures keep the measured value (not zero) so
    /// callers can distinguish them from validation failures and pick a
    /// wider tolerance.
    #[must_use]
    pub fn failed_with_slippage(
        order_id: OrderId,
        message: impl Into<String>,
        slippage: f64,
    ) -> Self {
        Self {
            slippage,
            ..Self::failed(order_id, message)
        }
    }

    /// Replace the execution time, consuming the result.
    ///
    /// Used by the coordinator to stamp both legs of a pair with the same
    /// pair-wide wall-clock duration.
    #[must_use]
    pub fn with_execution_secs(self, execution_secs: f64) -> Self {
        Self {
            execution_secs,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn filled_result_has_no_error() {
        let result = ExecutionResult::filled(
            OrderId::new("ord-1"),
            dec!(0.5),
            dec!(50100),
            dec!(25.05),
            0.3,
            0.002,
        );
        assert!(result.success);
        assert!(result.error_message.is_none());
        assert_eq!(result.slippage, 0.002);
    }

    #[test]
    fn failed_result_zeroes_fill_fields() {
        let result = ExecutionResult::failed(OrderId::new("ord-1"), "venue offline");
        assert!(!result.success);
        assert_eq!(result.filled_quantity, Decimal::ZERO);
        assert_eq!(result.average_price, Decimal::ZERO);
        assert_eq!(result.commission, Decimal::ZERO);
        assert_eq!(result.error_message.as_deref(), Some("venue offline"));
    }

    #[test]
    fn failed_with_slippage_keeps_measurement() {
        let result = ExecutionResult::failed_with_slippage(
            OrderId::new("ord-1"),
            "slippage too high",
            0.02,
        );
        assert!(!result.success);
        assert_eq!(result.slippage, 0.02);
    }

    #[test]
    fn with_execution_secs_replaces_time() {
        let result = ExecutionResult::failed(OrderId::new("ord-1"), "x").with_execution_secs(1.5);
        assert_eq!(result.execution_secs, 1.5);
    }

    #[test]
    fn result_serde_roundtrip() {
        let result = ExecutionResult::filled(
            OrderId::new("ord-1"),
            dec!(1),
            dec!(100),
            dec!(0.1),
            0.2,
            0.001,
        );
        let json = serde_json::to_string(&result).unwrap();
        let parsed: ExecutionResult = serde_json::from_str(&json).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.order_id, result.order_id);
    }
}

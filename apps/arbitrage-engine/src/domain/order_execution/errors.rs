//! Order execution errors.

use thiserror::Error;

use super::value_objects::OrderStatus;

/// Errors that can occur in order execution.
///
/// `InvalidStateTransition` is the contract-violation case: it is the only
/// error that crosses the coordinator boundary. Business-level failures
/// (validation, slippage, simulation) are surfaced as failed
/// `ExecutionResult`s, never as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Invalid state transition attempted.
    #[error("invalid order state transition: {from} -> {to}: {reason}")]
    InvalidStateTransition {
        /// Current order status.
        from: OrderStatus,
        /// Attempted status.
        to: OrderStatus,
        /// Reason for failure.
        reason: String,
    },

    /// Invalid order parameters.
    #[error("invalid order parameter '{field}': {message}")]
    InvalidParameters {
        /// Field with invalid value.
        field: String,
        /// Error message.
        message: String,
    },

    /// Order not found.
    #[error("order not found: {order_id}")]
    NotFound {
        /// Order ID.
        order_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_transition_display() {
        let err = OrderError::InvalidStateTransition {
            from: OrderStatus::Filled,
            to: OrderStatus::Submitted,
            reason: "order is already filled".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("FILLED"));
        assert!(msg.contains("SUBMITTED"));
    }

    #[test]
    fn invalid_parameters_display() {
        let err = OrderError::InvalidParameters {
            field: "quantity".to_string(),
            message: "must be greater than 0".to_string(),
        };
        assert!(format!("{err}").contains("quantity"));
    }

    #[test]
    fn not_found_display() {
        let err = OrderError::NotFound {
            order_id: "ord-123".to_string(),
        };
        assert!(format!("{err}").contains("ord-123"));
    }

    #[test]
    fn order_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(OrderError::NotFound {
            order_id: "test".to_string(),
        });
        assert!(!err.to_string().is_empty());
    }
}

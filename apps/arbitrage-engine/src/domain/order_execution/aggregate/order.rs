//! Order aggregate root.
//!
//! The Order aggregate manages the lifecycle of a single-leg trading
//! intent across one execution attempt. Status transitions go through
//! [`Order::transition`], which is the only sanctioned way to mutate
//! status, and are checked against the [`OrderStateMachine`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order_execution::errors::OrderError;
use crate::domain::order_execution::services::OrderStateMachine;
use crate::domain::order_execution::value_objects::{OrderSide, OrderStatus, OrderType};
use crate::domain::shared::OrderId;

/// Parameters for creating a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Trading symbol (e.g. `BTC/USDT`).
    pub symbol: String,
    /// Venue identifier (e.g. `binance`).
    pub venue: String,
    /// Order side.
    pub side: OrderSide,
    /// Order type.
    pub order_type: OrderType,
    /// Requested quantity.
    pub quantity: Decimal,
    /// Limit price for limit orders; reference price for market orders.
    pub price: Option<Decimal>,
    /// Stop price (required for stop-loss orders).
    pub stop_price: Option<Decimal>,
}

/// Details of a completed fill, recorded at the terminal transition.
#[derive(Debug, Clone, Copy)]
pub struct Fill {
    /// Quantity actually filled.
    pub quantity: Decimal,
    /// Average fill price.
    pub price: Decimal,
    /// Commission charged by the venue.
    pub commission: Decimal,
    /// Wall-clock seconds from submission to fill.
    pub execution_secs: f64,
}

/// A single-leg trading intent and its execution state.
///
/// Structural and business-rule validity is checked by the order
/// validator before execution; construction itself only establishes
/// identity, timestamps and the `Pending` status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    symbol: String,
    venue: String,
    side: OrderSide,
    order_type: OrderType,
    quantity: Decimal,
    price: Option<Decimal>,
    stop_price: Option<Decimal>,
    status: OrderStatus,
    filled_quantity: Decimal,
    average_fill_price: Decimal,
    commission: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    execution_secs: Option<f64>,
    error_message: Option<String>,
}

impl Order {
    /// Create a new order in status `Pending` with a generated ID.
    #[must_use]
    pub fn new(params: NewOrder) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::generate(),
            symbol: params.symbol,
            venue: params.venue,
            side: params.side,
            order_type: params.order_type,
            quantity: params.quantity,
            price: params.price,
            stop_price: params.stop_price,
            status: OrderStatus::Pending,
            filled_quantity: Decimal::ZERO,
            average_fill_price: Decimal::ZERO,
            commission: Decimal::ZERO,
            created_at: now,
            updated_at: now,
            execution_secs: None,
            error_message: None,
        }
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the order ID.
    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.id
    }

    /// Get the trading symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the venue identifier.
    #[must_use]
    pub fn venue(&self) -> &str {
        &self.venue
    }

    /// Get the order side.
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        self.side
    }

    /// Get the order type.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Get the requested quantity.
    #[must_use]
    pub const fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Get the limit/reference price, if specified.
    #[must_use]
    pub const fn price(&self) -> Option<Decimal> {
        self.price
    }

    /// Get the stop price, if specified.
    #[must_use]
    pub const fn stop_price(&self) -> Option<Decimal> {
        self.stop_price
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Get the filled quantity.
    #[must_use]
    pub const fn filled_quantity(&self) -> Decimal {
        self.filled_quantity
    }

    /// Get the average fill price (zero until filled).
    #[must_use]
    pub const fn average_fill_price(&self) -> Decimal {
        self.average_fill_price
    }

    /// Get the commission paid (zero until filled).
    #[must_use]
    pub const fn commission(&self) -> Decimal {
        self.commission
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the last-update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Get the execution duration in seconds (set at the terminal transition).
    #[must_use]
    pub const fn execution_secs(&self) -> Option<f64> {
        self.execution_secs
    }

    /// Get the error message (set if and only if the order failed).
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// The base currency of the symbol: the segment before `/`, or the
    /// whole symbol when there is no separator.
    #[must_use]
    pub fn base_currency(&self) -> &str {
        self.symbol.split('/').next().unwrap_or(&self.symbol)
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    /// Transition to a new status, bumping `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidStateTransition` if the transition is
    /// not permitted, in particular for any transition out of a terminal
    /// status.
    pub fn transition(&mut self, to: OrderStatus) -> Result<(), OrderError> {
        OrderStateMachine::validate_transition(self.status, to)?;
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record a completed fill, transitioning to `Filled`.
    ///
    /// # Errors
    ///
    /// Returns an error if the fill exceeds the requested quantity or the
    /// transition to `Filled` is not permitted.
    pub fn record_fill(&mut self, fill: Fill) -> Result<(), OrderError> {
        if fill.quantity > self.quantity {
            return Err(OrderError::InvalidParameters {
                field: "filled_quantity".to_string(),
                message: format!(
                    "fill quantity {} exceeds requested quantity {}",
                    fill.quantity, self.quantity
                ),
            });
        }
        self.transition(OrderStatus::Filled)?;
        self.filled_quantity = fill.quantity;
        self.average_fill_price = fill.price;
        self.commission = fill.commission;
        self.execution_secs = Some(fill.execution_secs);
        Ok(())
    }

    /// Record an execution failure, transitioning to `Failed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition to `Failed` is not permitted.
    pub fn record_failure(
        &mut self,
        message: impl Into<String>,
        execution_secs: Option<f64>,
    ) -> Result<(), OrderError> {
        self.transition(OrderStatus::Failed)?;
        self.error_message = Some(message.into());
        self.execution_secs = execution_secs;
        Ok(())
    }
}

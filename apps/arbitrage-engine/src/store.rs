//! In-memory order store.
//!
//! The single piece of order state shared between the coordinator, the
//! executors and API readers. All mutations go through the store so that
//! concurrent readers (`active_orders`, `order_status`) always observe a
//! consistent order snapshot. Locks are never held across await points.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::order_execution::{Fill, Order, OrderError, OrderStatus};
use crate::domain::shared::OrderId;

/// Thread-safe in-memory store of all orders known to the engine.
///
/// Unbounded: orders are kept for the lifetime of the engine instance.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<String, Order>>,
}

impl InMemoryOrderStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }

    /// Number of orders in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register an order with the store.
    pub fn insert(&self, order: Order) {
        let mut orders = self.orders.write().unwrap_or_else(PoisonError::into_inner);
        orders.insert(order.id().to_string(), order);
    }

    /// Get a snapshot of an order by ID.
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<Order> {
        let orders = self.orders.read().unwrap_or_else(PoisonError::into_inner);
        orders.get(id.as_str()).cloned()
    }

    /// Snapshot of all orders in an active status
    /// (`Pending`, `Submitted`, `PartiallyFilled`).
    #[must_use]
    pub fn active_orders(&self) -> Vec<Order> {
        let orders = self.orders.read().unwrap_or_else(PoisonError::into_inner);
        orders
            .values()
            .filter(|o| o.status().is_active())
            .cloned()
            .collect()
    }

    /// Transition an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for unknown orders and
    /// `OrderError::InvalidStateTransition` for transitions the state
    /// machine rejects.
    pub fn transition(&self, id: &OrderId, to: OrderStatus) -> Result<(), OrderError> {
        self.with_order_mut(id, |order| order.transition(to))
    }

    /// Record a completed fill against an order.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown orders or rejected transitions.
    pub fn record_fill(&self, id: &OrderId, fill: Fill) -> Result<(), OrderError> {
        self.with_order_mut(id, |order| order.record_fill(fill))
    }

    /// Record an execution failure against an order.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown orders or rejected transitions.
    pub fn record_failure(
        &self,
        id: &OrderId,
        message: &str,
        execution_secs: Option<f64>,
    ) -> Result<(), OrderError> {
        self.with_order_mut(id, |order| order.record_failure(message, execution_secs))
    }

    /// Best-effort cancellation.
    ///
    /// Returns false for unknown orders and for orders already in a
    /// terminal status.
    pub fn cancel(&self, id: &OrderId) -> bool {
        self.with_order_mut(id, |order| order.transition(OrderStatus::Cancelled))
            .is_ok()
    }

    fn with_order_mut<T>(
        &self,
        id: &OrderId,
        f: impl FnOnce(&mut Order) -> Result<T, OrderError>,
    ) -> Result<T, OrderError> {
        let mut orders = self.orders.write().unwrap_or_else(PoisonError::into_inner);
        let order = orders.get_mut(id.as_str()).ok_or_else(|| OrderError::NotFound {
            order_id: id.to_string(),
        })?;
        f(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_execution::{NewOrder, OrderSide, OrderType};
    use rust_decimal_macros::dec;

    fn test_order() -> Order {
        Order::new(NewOrder {
            symbol: "BTC/USDT".to_string(),
            venue: "binance".to_string(),
            side: OrderSide::Buy,
            order_type: OrderType::Market,
            quantity: dec!(0.5),
            price: Some(dec!(50000)),
            stop_price: None,
        })
    }

    #[test]
    fn insert_and_get() {
        let store = InMemoryOrderStore::new();
        let order = test_order();
        let id = order.id().clone();

        store.insert(order);
        assert_eq!(store.len(), 1);

        let found = store.get(&id).unwrap();
        assert_eq!(found.status(), OrderStatus::Pending);
    }

    #[test]
    fn get_unknown_returns_none() {
        let store = InMemoryOrderStore::new();
        assert!(store.get(&OrderId::new("nope")).is_none());
    }

    #[test]
    fn transition_through_store() {
        let store = InMemoryOrderStore::new();
        let order = test_order();
        let id = order.id().clone();
        store.insert(order);

        store.transition(&id, OrderStatus::Submitted).unwrap();
        assert_eq!(store.get(&id).unwrap().status(), OrderStatus::Submitted);
    }

    #[test]
    fn transition_unknown_order_not_found() {
        let store = InMemoryOrderStore::new();
        let err = store
            .transition(&OrderId::new("nope"), OrderStatus::Submitted)
            .unwrap_err();
        assert!(matches!(err, OrderError::NotFound { .. }));
    }

    #[test]
    fn active_orders_excludes_terminal() {
        let store = InMemoryOrderStore::new();
        let pending = test_order();
        let filled = test_order();
        let filled_id = filled.id().clone();

        store.insert(pending);
        store.insert(filled);

        store.transition(&filled_id, OrderStatus::Submitted).unwrap();
        store
            .record_fill(
                &filled_id,
                Fill {
                    quantity: dec!(0.5),
                    price: dec!(50100),
                    commission: dec!(25.05),
                    execution_secs: 0.1,
                },
            )
            .unwrap();

        let active = store.active_orders();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].status(), OrderStatus::Pending);
    }

    #[test]
    fn cancel_pending_order() {
        let store = InMemoryOrderStore::new();
        let order = test_order();
        let id = order.id().clone();
        store.insert(order);

        assert!(store.cancel(&id));
        assert_eq!(store.get(&id).unwrap().status(), OrderStatus::Cancelled);
    }

    #[test]
    fn cancel_terminal_order_returns_false() {
        let store = InMemoryOrderStore::new();
        let order = test_order();
        let id = order.id().clone();
        store.insert(order);

        store.transition(&id, OrderStatus::Submitted).unwrap();
        store
            .record_failure(&id, "slippage too high", Some(0.1))
            .unwrap();

        assert!(!store.cancel(&id));
        assert_eq!(store.get(&id).unwrap().status(), OrderStatus::Failed);
    }

    #[test]
    fn cancel_unknown_order_returns_false() {
        let store = InMemoryOrderStore::new();
        assert!(!store.cancel(&OrderId::new("nope")));
    }

    #[test]
    fn record_failure_sets_message() {
        let store = InMemoryOrderStore::new();
        let order = test_order();
        let id = order.id().clone();
        store.insert(order);

        store.transition(&id, OrderStatus::Submitted).unwrap();
        store
            .record_failure(&id, "simulated venue outage", None)
            .unwrap();

        let failed = store.get(&id).unwrap();
        assert_eq!(failed.status(), OrderStatus::Failed);
        assert_eq!(failed.error_message(), Some("simulated venue outage"));
    }
}

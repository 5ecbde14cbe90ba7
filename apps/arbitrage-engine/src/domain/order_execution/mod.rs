//! Order execution bounded context.
//!
//! Manages the lifecycle of a single-leg trading intent from creation to
//! a terminal state, with transitions checked by a state machine.

pub mod aggregate;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use aggregate::{Fill, NewOrder, Order};
pub use errors::OrderError;
pub use services::OrderStateMachine;
pub use value_objects::{OrderSide, OrderStatus, OrderType};

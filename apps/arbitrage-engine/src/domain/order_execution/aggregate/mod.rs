//! Order aggregate.

mod order;

pub use order::{Fill, NewOrder, Order};

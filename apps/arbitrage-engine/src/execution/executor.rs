//! Single-order executor.
//!
//! Drives exactly one order from `Submitted` to a terminal state against
//! the simulated market: a latency window, a slippage estimate checked
//! against the caller's tolerance, then a fill with commission.
//!
//! Business-level failures (slippage exceeded, a cancellation racing the
//! fill, simulation errors) never escape as errors; they come back as
//! failed [`ExecutionResult`]s. The only error [`OrderExecutor::execute`]
//! returns is the contract violation of executing an order that is not
//! `Pending`.
//!
//! The latency window is bounded but not guarded by a timeout; a
//! production build would bound it explicitly and fail the order on
//! expiry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::{FeeSchedule, LatencyConfig};
use crate::domain::order_execution::{Fill, Order, OrderError, OrderSide, OrderStatus, OrderType};
use crate::domain::shared::OrderId;
use crate::execution::commission::commission_for;
use crate::execution::result::ExecutionResult;
use crate::execution::slippage::SlippageModel;
use crate::store::InMemoryOrderStore;

/// Reference price assumed for market orders that carry no price hint.
const DEFAULT_REFERENCE_PRICE: Decimal = dec!(1000);

/// Source of simulated exchange latency.
///
/// Production uses [`UniformLatency`]; tests use [`FixedLatency`].
pub trait LatencySource: Send + Sync {
    /// Delay for one order execution.
    fn execution_delay(&self) -> Duration;

    /// Delay for one cancellation round-trip.
    fn cancellation_delay(&self) -> Duration;
}

/// Randomized latency: a base delay plus uniform jitter.
#[derive(Debug, Clone, Copy)]
pub struct UniformLatency {
    base: Duration,
    jitter_ms: u64,
    cancel: Duration,
}

impl UniformLatency {
    /// Build from the latency configuration.
    #[must_use]
    pub const fn from_config(config: &LatencyConfig) -> Self {
        Self {
            base: Duration::from_millis(config.base_ms),
            jitter_ms: config.jitter_ms,
            cancel: Duration::from_millis(config.cancel_ms),
        }
    }
}

impl LatencySource for UniformLatency {
    fn execution_delay(&self) -> Duration {
        let jitter = if self.jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=self.jitter_ms)
        };
        self.base + Duration::from_millis(jitter)
    }

    fn cancellation_delay(&self) -> Duration {
        self.cancel
    }
}

/// Deterministic latency. Test double.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLatency {
    /// Execution delay.
    pub execution: Duration,
    /// Cancellation delay.
    pub cancellation: Duration,
}

impl FixedLatency {
    /// No delay at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            execution: Duration::ZERO,
            cancellation: Duration::ZERO,
        }
    }

    /// A fixed execution delay with no cancellation delay.
    #[must_use]
    pub const fn of(execution: Duration) -> Self {
        Self {
            execution,
            cancellation: Duration::ZERO,
        }
    }
}

impl LatencySource for FixedLatency {
    fn execution_delay(&self) -> Duration {
        self.execution
    }

    fn cancellation_delay(&self) -> Duration {
        self.cancellation
    }
}

/// Executes single orders against the simulated market.
pub struct OrderExecutor {
    store: Arc<InMemoryOrderStore>,
    slippage: SlippageModel,
    fees: FeeSchedule,
    latency: Arc<dyn LatencySource>,
}

impl OrderExecutor {
    /// Create an executor over the shared order store.
    #[must_use]
    pub fn new(
        store: Arc<InMemoryOrderStore>,
        slippage: SlippageModel,
        fees: FeeSchedule,
        latency: Arc<dyn LatencySource>,
    ) -> Self {
        Self {
            store,
            slippage,
            fees,
            latency,
        }
    }

    /// Execute one order under the caller's slippage tolerance.
    ///
    /// # Errors
    ///
    /// Returns `OrderError` only for contract violations: the order is
    /// unknown or not in `Pending` status. All runtime failures come back
    /// as a failed `ExecutionResult`.
    pub async fn execute(
        &self,
        order_id: &OrderId,
        max_slippage: f64,
    ) -> Result<ExecutionResult, OrderError> {
        let started = Instant::now();

        // Contract: the order must be Pending. Anything else is a caller bug.
        self.store.transition(order_id, OrderStatus::Submitted)?;
        tracing::debug!(order_id = %order_id, "order submitted");

        // Simulated exchange latency. Sole suspension point.
        tokio::time::sleep(self.latency.execution_delay()).await;

        let order = self.store.get(order_id).ok_or_else(|| OrderError::NotFound {
            order_id: order_id.to_string(),
        })?;

        let slippage = self.slippage.estimate(&order);
        if slippage > max_slippage {
            let message = format!(
                "slippage too high: {:.3}% > {:.3}%",
                slippage * 100.0,
                max_slippage * 100.0
            );
            let elapsed = started.elapsed().as_secs_f64();
            if let Err(err) = self.store.record_failure(order_id, &message, Some(elapsed)) {
                tracing::warn!(order_id = %order_id, error = %err, "failure not recorded");
            }
            tracing::warn!(
                order_id = %order_id,
                slippage,
                max_slippage,
                "order rejected on slippage"
            );
            return Ok(ExecutionResult::failed_with_slippage(
                order_id.clone(),
                message,
                slippage,
            ));
        }

        let execution_price = Self::execution_price(&order, slippage);
        let commission = commission_for(&self.fees, order.quantity(), execution_price, order.venue());
        let elapsed = started.elapsed().as_secs_f64();

        let fill = Fill {
            quantity: order.quantity(),
            price: execution_price,
            commission,
            execution_secs: elapsed,
        };
        if let Err(err) = self.store.record_fill(order_id, fill) {
            // A cancellation landed during the latency window, or the
            // simulation misbehaved. Business failure, not a contract one.
            tracing::warn!(order_id = %order_id, error = %err, "fill aborted");
            return Ok(ExecutionResult::failed_with_slippage(
                order_id.clone(),
                format!("fill aborted: {err}"),
                slippage,
            ));
        }

        tracing::info!(
            order_id = %order_id,
            symbol = %order.symbol(),
            venue = %order.venue(),
            side = %order.side(),
            quantity = %order.quantity(),
            price = %execution_price,
            slippage,
            "order filled"
        );

        Ok(ExecutionResult::filled(
            order_id.clone(),
            order.quantity(),
            execution_price,
            commission,
            elapsed,
            slippage,
        ))
    }

    /// Execution price under the measured slippage.
    ///
    /// Market orders slip against the trader on both sides; limit orders
    /// fill at their stated price; other kinds fill at the reference.
    fn execution_price(order: &Order, slippage: f64) -> Decimal {
        let reference = order.price().unwrap_or(DEFAULT_REFERENCE_PRICE);
        match order.order_type() {
            OrderType::Market => {
                let slip = Decimal::try_from(slippage).unwrap_or(Decimal::ZERO);
                match order.side() {
                    OrderSide::Buy => reference * (Decimal::ONE + slip),
                    OrderSide::Sell => reference * (Decimal::ONE - slip),
                }
            }
            OrderType::Limit | OrderType::StopLoss | OrderType::TakeProfit => reference,
        }
    }
}

//! Arbitrage engine facade.
//!
//! The top-level entry point: accepts a buy-leg and a sell-leg request,
//! validates both, executes them concurrently as an atomic-intent pair,
//! and records both outcomes in the execution ledger.
//!
//! Failure semantics, in order of strength:
//!
//! - A leg that fails **validation** gates the opposite leg: neither leg
//!   is submitted, preventing one-sided exposure.
//! - A leg that fails at **runtime** (slippage, simulation) never gates
//!   the other leg; each leg's outcome is reported independently.
//! - Only contract violations (executing a non-`Pending` order) escape as
//!   errors.
//!
//! The engine never retries: retrying a half-filled pair without
//! re-checking the opportunity belongs to the caller.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;

use crate::config::{EngineConfig, SlippageConfig};
use crate::domain::order_execution::{NewOrder, Order, OrderError, OrderSide, OrderType};
use crate::domain::shared::OrderId;
use crate::execution::executor::{LatencySource, OrderExecutor, UniformLatency};
use crate::execution::ledger::{
    ExecutionLedger, ExecutionStatistics, ParameterRecommendations, recommend_parameters,
};
use crate::execution::result::ExecutionResult;
use crate::execution::slippage::{SlippageEstimator, SlippageModel, StochasticEstimator};
use crate::execution::validator::OrderValidator;
use crate::store::InMemoryOrderStore;

/// A single-leg order request from the opportunity-detection collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Trading symbol (e.g. `BTC/USDT`).
    pub symbol: String,
    /// Venue identifier (e.g. `binance`).
    pub venue: String,
    /// Order side.
    pub side: OrderSide,
    /// Order kind.
    pub kind: OrderType,
    /// Requested quantity.
    pub quantity: Decimal,
    /// Limit price for limit orders; reference price for market orders.
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Stop price for stop-loss orders.
    #[serde(default)]
    pub stop_price: Option<Decimal>,
}

impl From<OrderRequest> for NewOrder {
    fn from(request: OrderRequest) -> Self {
        Self {
            symbol: request.symbol,
            venue: request.venue,
            side: request.side,
            order_type: request.kind,
            quantity: request.quantity,
            price: request.price,
            stop_price: request.stop_price,
        }
    }
}

/// The arbitrage execution engine.
///
/// Explicitly constructed and injected; owns the order store, the
/// execution ledger and the shared slippage policy. Construct once at
/// process start, or once per test.
pub struct ArbitrageEngine {
    store: Arc<InMemoryOrderStore>,
    ledger: Arc<ExecutionLedger>,
    validator: OrderValidator,
    executor: Arc<OrderExecutor>,
    slippage_config: Arc<RwLock<SlippageConfig>>,
    latency: Arc<dyn LatencySource>,
}

impl ArbitrageEngine {
    /// Create an engine with the production estimator and latency models.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let estimator = Arc::new(StochasticEstimator::new(config.venue_factors.clone()));
        let latency = Arc::new(UniformLatency::from_config(&config.latency));
        Self::with_models(config, estimator, latency)
    }

    /// Create an engine with injected estimator and latency models.
    ///
    /// This is the deterministic seam for tests: pin slippage with a
    /// fixed estimator and collapse latency to zero.
    #[must_use]
    pub fn with_models(
        config: EngineConfig,
        estimator: Arc<dyn SlippageEstimator>,
        latency: Arc<dyn LatencySource>,
    ) -> Self {
        let slippage_config = Arc::new(RwLock::new(config.slippage));
        let store = Arc::new(InMemoryOrderStore::new());
        let slippage = SlippageModel::new(estimator, Arc::clone(&slippage_config));
        let executor = Arc::new(OrderExecutor::new(
            Arc::clone(&store),
            slippage,
            config.fees,
            Arc::clone(&latency),
        ));
        let validator = OrderValidator::new(config.min_order_sizes);

        Self {
            store,
            ledger: Arc::new(ExecutionLedger::new()),
            validator,
            executor,
            slippage_config,
            latency,
        }
    }

    /// Execute a matched buy/sell pair as a single logical operation.
    ///
    /// Always returns exactly two results. Validation failure on either
    /// leg skips the other leg entirely; runtime failures are isolated
    /// per leg. Both legs run concurrently and both have completed by the
    /// time this returns.
    ///
    /// # Errors
    ///
    /// Returns `OrderError` only for contract violations inside the
    /// executors; business failures are reported in the results.
    pub async fn execute_arbitrage(
        &self,
        buy: OrderRequest,
        sell: OrderRequest,
        max_slippage: f64,
    ) -> Result<(ExecutionResult, ExecutionResult), OrderError> {
        let buy_order = Order::new(buy.into());
        let sell_order = Order::new(sell.into());
        let buy_id = buy_order.id().clone();
        let sell_id = sell_order.id().clone();

        let buy_outcome = self.validator.validate(&buy_order);
        let sell_outcome = self.validator.validate(&sell_order);

        self.store.insert(buy_order);
        self.store.insert(sell_order);

        // Validation gates both legs: an invalid leg means the opposite
        // leg is never submitted.
        if !buy_outcome.valid {
            let reason = buy_outcome.reason.unwrap_or_default();
            tracing::warn!(order_id = %buy_id, reason = %reason, "buy leg rejected by validation");
            return Ok((
                ExecutionResult::failed(buy_id, format!("buy order validation failed: {reason}")),
                ExecutionResult::failed(sell_id, "buy order validation failed, sell leg skipped"),
            ));
        }
        if !sell_outcome.valid {
            let reason = sell_outcome.reason.unwrap_or_default();
            tracing::warn!(order_id = %sell_id, reason = %reason, "sell leg rejected by validation");
            return Ok((
                ExecutionResult::failed(buy_id, "sell order validation failed, buy leg skipped"),
                ExecutionResult::failed(sell_id, format!("sell order validation failed: {reason}")),
            ));
        }

        tracing::info!(
            buy_order = %buy_id,
            sell_order = %sell_id,
            max_slippage,
            "executing arbitrage pair"
        );

        // Both legs race the same market-moving window.
        let started = Instant::now();
        let buy_task = self.spawn_leg(buy_id.clone(), max_slippage);
        let sell_task = self.spawn_leg(sell_id.clone(), max_slippage);
        let (buy_join, sell_join) = tokio::join!(buy_task, sell_task);
        let total_secs = started.elapsed().as_secs_f64();

        // Both joins are resolved before either error can propagate, so a
        // fatal buy leg never leaves the sell leg dangling.
        let buy_result = Self::leg_result(buy_join, &buy_id)?;
        let sell_result = Self::leg_result(sell_join, &sell_id)?;

        // Both legs carry the same pair-wide wall-clock time.
        let buy_result = buy_result.with_execution_secs(total_secs);
        let sell_result = sell_result.with_execution_secs(total_secs);

        self.ledger.record(buy_result.clone());
        self.ledger.record(sell_result.clone());

        tracing::info!(
            buy_order = %buy_id,
            sell_order = %sell_id,
            buy_success = buy_result.success,
            sell_success = sell_result.success,
            total_secs,
            "arbitrage pair completed"
        );

        Ok((buy_result, sell_result))
    }

    fn spawn_leg(
        &self,
        order_id: OrderId,
        max_slippage: f64,
    ) -> tokio::task::JoinHandle<Result<ExecutionResult, OrderError>> {
        let executor = Arc::clone(&self.executor);
        tokio::spawn(async move { executor.execute(&order_id, max_slippage).await })
    }

    /// Collapse a joined leg into a result.
    ///
    /// A panicked task becomes a failed result for that leg only; a typed
    /// executor error (contract violation) propagates.
    fn leg_result(
        join: Result<Result<ExecutionResult, OrderError>, JoinError>,
        order_id: &OrderId,
    ) -> Result<ExecutionResult, OrderError> {
        match join {
            Ok(result) => result,
            Err(join_err) => {
                tracing::error!(order_id = %order_id, error = %join_err, "execution task aborted");
                Ok(ExecutionResult::failed(
                    order_id.clone(),
                    format!("execution task aborted: {join_err}"),
                ))
            }
        }
    }

    /// Look up an order by ID.
    #[must_use]
    pub fn order_status(&self, order_id: &OrderId) -> Option<Order> {
        self.store.get(order_id)
    }

    /// All orders in an active status (Pending, Submitted, PartiallyFilled).
    #[must_use]
    pub fn active_orders(&self) -> Vec<Order> {
        self.store.active_orders()
    }

    /// Aggregate execution statistics.
    #[must_use]
    pub fn statistics(&self) -> ExecutionStatistics {
        self.ledger.statistics()
    }

    /// Derive tuning recommendations from the current statistics.
    ///
    /// Read-only: does not touch the slippage policy.
    #[must_use]
    pub fn optimize_parameters(&self) -> ParameterRecommendations {
        let stats = self.ledger.statistics();
        let config = self.slippage_config();
        recommend_parameters(&stats, &config)
    }

    /// Apply a recommendation set to the slippage policy.
    ///
    /// The explicit write path for suggestions from
    /// [`ArbitrageEngine::optimize_parameters`].
    pub fn adopt_recommendations(&self, recommendations: &ParameterRecommendations) {
        if let Some(new_max) = recommendations.suggested_max_slippage {
            let mut config = self
                .slippage_config
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            tracing::info!(
                old_max_slippage = config.max_slippage,
                new_max_slippage = new_max,
                "adopting slippage tolerance recommendation"
            );
            config.max_slippage = new_max;
        }
    }

    /// Best-effort cancellation after a simulated cancel round-trip.
    ///
    /// Returns false for unknown orders and orders already terminal.
    pub async fn cancel_order(&self, order_id: &OrderId) -> bool {
        let Some(order) = self.store.get(order_id) else {
            return false;
        };
        if order.status().is_terminal() {
            return false;
        }

        tokio::time::sleep(self.latency.cancellation_delay()).await;

        let cancelled = self.store.cancel(order_id);
        if cancelled {
            tracing::info!(order_id = %order_id, "order cancelled");
        }
        cancelled
    }

    /// Snapshot of the current slippage policy.
    #[must_use]
    pub fn slippage_config(&self) -> SlippageConfig {
        self.slippage_config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

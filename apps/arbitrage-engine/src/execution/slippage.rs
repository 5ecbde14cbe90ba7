//! Slippage estimation for simulated fills.
//!
//! The raw estimate comes from a pluggable [`SlippageEstimator`], so tests
//! can pin slippage to a fixed value. Whatever the estimator returns, the
//! [`SlippageModel`] clamps the result into `[0, max_slippage]` — the
//! configured ceiling holds for any estimator and any input.

use std::sync::{Arc, PoisonError, RwLock};

use rand::Rng;
use rust_decimal::prelude::ToPrimitive;

use crate::config::{SlippageConfig, VenueFactors};
use crate::domain::order_execution::Order;

/// Fallback used when an estimator produces a non-finite value.
const FALLBACK_SLIPPAGE: f64 = 0.001;

/// Source of raw (unclamped) slippage estimates.
///
/// Production uses [`StochasticEstimator`]; tests use [`FixedEstimator`]
/// or a purpose-built double.
pub trait SlippageEstimator: Send + Sync {
    /// Raw slippage estimate for an order, as a fraction.
    fn estimate(&self, order: &Order, config: &SlippageConfig) -> f64;
}

/// Randomized estimator modeling market noise.
///
/// base slippage, scaled by order size (larger orders slip more, capped),
/// a per-venue factor (unknown venues are neutral) and a volatility draw.
#[derive(Debug, Clone)]
pub struct StochasticEstimator {
    venue_factors: VenueFactors,
}

impl StochasticEstimator {
    /// Create an estimator over the given venue factor table.
    #[must_use]
    pub const fn new(venue_factors: VenueFactors) -> Self {
        Self { venue_factors }
    }
}

impl SlippageEstimator for StochasticEstimator {
    fn estimate(&self, order: &Order, config: &SlippageConfig) -> f64 {
        let mut rng = rand::rng();

        let base = rng.random_range(0.0001..0.003);

        // Larger orders face more slippage, capped at 2x.
        let size_factor = (order.quantity().to_f64().unwrap_or(0.0) / 1000.0).min(2.0);

        let venue_factor = self.venue_factors.factor_for(order.venue());

        let mut volatility = rng.random_range(0.5..1.5);
        if config.adaptive {
            // Neutral at the default multiplier of 2.0.
            volatility *= config.volatility_multiplier / 2.0;
        }

        base * size_factor * venue_factor * volatility
    }
}

/// Deterministic estimator returning a constant. Test double.
#[derive(Debug, Clone, Copy)]
pub struct FixedEstimator(pub f64);

impl SlippageEstimator for FixedEstimator {
    fn estimate(&self, _order: &Order, _config: &SlippageConfig) -> f64 {
        self.0
    }
}

/// Clamping wrapper around an estimator and the shared slippage policy.
#[derive(Clone)]
pub struct SlippageModel {
    estimator: Arc<dyn SlippageEstimator>,
    config: Arc<RwLock<SlippageConfig>>,
}

impl SlippageModel {
    /// Create a model over an estimator and the shared policy.
    #[must_use]
    pub fn new(estimator: Arc<dyn SlippageEstimator>, config: Arc<RwLock<SlippageConfig>>) -> Self {
        Self { estimator, config }
    }

    /// Estimate slippage for an order, clamped to `[0, max_slippage]`.
    #[must_use]
    pub fn estimate(&self, order: &Order) -> f64 {
        let config = self
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let raw = self.estimator.estimate(order, &config);
        let raw = if raw.is_finite() { raw } else { FALLBACK_SLIPPAGE };
        raw.clamp(0.0, config.max_slippage)
    }
}

impl std::fmt::Debug for SlippageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlippageModel").finish_non_exhaustive()
    }
}

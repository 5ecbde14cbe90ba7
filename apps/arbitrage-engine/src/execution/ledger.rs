//! Execution ledger, statistics and parameter tuning.
//!
//! Append-only record of every execution attempt. Readers get consistent
//! snapshots: statistics are computed under a read lock over an immutable
//! view of the entries, never observing a result mid-append.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::SlippageConfig;
use crate::execution::result::ExecutionResult;

/// One recorded execution attempt.
#[derive(Debug, Clone)]
struct LedgerEntry {
    result: ExecutionResult,
    recorded_at: DateTime<Utc>,
}

/// Aggregate execution-quality metrics.
///
/// All-zero for an empty ledger; no division by zero anywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStatistics {
    /// Total recorded executions.
    pub total: usize,
    /// Successful executions.
    pub successful: usize,
    /// Failed executions.
    pub failed: usize,
    /// Fraction of successful executions.
    pub success_rate: f64,
    /// Mean execution seconds over successful executions.
    pub avg_execution_secs: f64,
    /// Mean slippage over successful executions with slippage > 0.
    pub avg_slippage: f64,
    /// Total commission over successful executions.
    pub total_commission: Decimal,
    /// Executions recorded within the trailing 24 hours.
    pub last_24h: usize,
}

/// Parameter tuning suggestions derived from execution statistics.
///
/// Purely advisory: deriving them has no side effects, and applying them
/// to the slippage policy is a separate, explicit caller action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecommendations {
    /// Raise the slippage ceiling; success rate is below 90%.
    pub increase_slippage_tolerance: bool,
    /// Suggested new slippage ceiling, capped at 1.0.
    pub suggested_max_slippage: Option<f64>,
    /// Prefer market orders; executions are slow.
    pub prefer_market_orders: bool,
    /// Reduce order size; executions are slow.
    pub reduce_order_size: bool,
    /// Split large orders; average slippage is high.
    pub split_large_orders: bool,
    /// Prefer limit orders; average slippage is high.
    pub prefer_limit_orders: bool,
}

impl ParameterRecommendations {
    /// True when no suggestion was derived.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.increase_slippage_tolerance
            || self.prefer_market_orders
            || self.reduce_order_size
            || self.split_large_orders
            || self.prefer_limit_orders)
    }
}

/// Derive tuning suggestions from statistics. Pure function.
#[must_use]
pub fn recommend_parameters(
    stats: &ExecutionStatistics,
    slippage: &SlippageConfig,
) -> ParameterRecommendations {
    let mut recommendations = ParameterRecommendations::default();

    if stats.success_rate < 0.9 {
        recommendations.increase_slippage_tolerance = true;
        recommendations.suggested_max_slippage = Some((slippage.max_slippage * 1.2).min(1.0));
    }

    if stats.avg_execution_secs > 1.0 {
        recommendations.prefer_market_orders = true;
        recommendations.reduce_order_size = true;
    }

    if stats.avg_slippage > 0.005 {
        recommendations.split_large_orders = true;
        recommendations.prefer_limit_orders = true;
    }

    recommendations
}

/// Append-only, thread-safe record of execution results.
///
/// Unbounded: results are kept for the lifetime of the engine instance.
#[derive(Debug, Default)]
pub struct ExecutionLedger {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl ExecutionLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Append a result, stamped with the current time.
    pub fn record(&self, result: ExecutionResult) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.push(LedgerEntry {
            result,
            recorded_at: Utc::now(),
        });
    }

    /// Number of recorded results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compute aggregate statistics over a consistent snapshot.
    #[must_use]
    pub fn statistics(&self) -> ExecutionStatistics {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        if entries.is_empty() {
            return ExecutionStatistics::default();
        }

        let total = entries.len();
        let successful: Vec<&ExecutionResult> = entries
            .iter()
            .map(|entry| &entry.result)
            .filter(|result| result.success)
            .collect();
        let failed = total - successful.len();

        let success_rate = successful.len() as f64 / total as f64;

        let avg_execution_secs = if successful.is_empty() {
            0.0
        } else {
            successful.iter().map(|r| r.execution_secs).sum::<f64>() / successful.len() as f64
        };

        let slippages: Vec<f64> = successful
            .iter()
            .filter(|r| r.slippage > 0.0)
            .map(|r| r.slippage)
            .collect();
        let avg_slippage = if slippages.is_empty() {
            0.0
        } else {
            slippages.iter().sum::<f64>() / slippages.len() as f64
        };

        let total_commission = successful.iter().map(|r| r.commission).sum();

        let cutoff = Utc::now() - Duration::hours(24);
        let last_24h = entries
            .iter()
            .filter(|entry| entry.recorded_at > cutoff)
            .count();

        ExecutionStatistics {
            total,
            successful: successful.len(),
            failed,
            success_rate,
            avg_execution_secs,
            avg_slippage,
            total_commission,
            last_24h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::OrderId;
    use rust_decimal_macros::dec;

    fn success(execution_secs: f64, slippage: f64, commission: Decimal) -> ExecutionResult {
        ExecutionResult::filled(
            OrderId::generate(),
            dec!(1),
            dec!(100),
            commission,
            execution_secs,
            slippage,
        )
    }

    fn failure() -> ExecutionResult {
        ExecutionResult::failed(OrderId::generate(), "slippage too high")
    }

    #[test]
    fn empty_ledger_returns_zero_statistics() {
        let ledger = ExecutionLedger::new();
        let stats = ledger.statistics();
        assert_eq!(stats, ExecutionStatistics::default());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(stats.total_commission, Decimal::ZERO);
    }

    #[test]
    fn statistics_over_mixed_results() {
        let ledger = ExecutionLedger::new();
        for _ in 0..6 {
            ledger.record(success(0.3, 0.002, dec!(1)));
        }
        for _ in 0..4 {
            ledger.record(failure());
        }

        let stats = ledger.statistics();
        assert_eq!(stats.total, 10);
        assert_eq!(stats.successful, 6);
        assert_eq!(stats.failed, 4);
        assert!((stats.success_rate - 0.6).abs() < 1e-9);
        assert!((stats.avg_execution_secs - 0.3).abs() < 1e-9);
        assert_eq!(stats.total_commission, dec!(6));
        assert_eq!(stats.last_24h, 10);
    }

    #[test]
    fn avg_slippage_ignores_zero_slippage_fills() {
        let ledger = ExecutionLedger::new();
        ledger.record(success(0.1, 0.0, dec!(1)));
        ledger.record(success(0.1, 0.004, dec!(1)));
        ledger.record(success(0.1, 0.002, dec!(1)));

        let stats = ledger.statistics();
        assert!((stats.avg_slippage - 0.003).abs() < 1e-9);
    }

    #[test]
    fn avg_slippage_zero_when_no_positive_slippage() {
        let ledger = ExecutionLedger::new();
        ledger.record(success(0.1, 0.0, dec!(1)));
        assert_eq!(ledger.statistics().avg_slippage, 0.0);
    }

    #[test]
    fn failed_results_excluded_from_commission() {
        let ledger = ExecutionLedger::new();
        ledger.record(success(0.1, 0.001, dec!(2.5)));
        ledger.record(failure());

        let stats = ledger.statistics();
        assert_eq!(stats.total_commission, dec!(2.5));
    }

    #[test]
    fn low_success_rate_recommends_wider_tolerance() {
        let stats = ExecutionStatistics {
            total: 10,
            successful: 7,
            failed: 3,
            success_rate: 0.7,
            ..ExecutionStatistics::default()
        };
        let recommendations = recommend_parameters(&stats, &SlippageConfig::default());

        assert!(recommendations.increase_slippage_tolerance);
        let suggested = recommendations.suggested_max_slippage.unwrap();
        assert!((suggested - 0.006).abs() < 1e-12);
    }

    #[test]
    fn suggested_max_slippage_capped_at_one() {
        let stats = ExecutionStatistics {
            success_rate: 0.5,
            ..ExecutionStatistics::default()
        };
        let config = SlippageConfig {
            max_slippage: 0.9,
            ..SlippageConfig::default()
        };
        let recommendations = recommend_parameters(&stats, &config);
        assert_eq!(recommendations.suggested_max_slippage, Some(1.0));
    }

    #[test]
    fn slow_executions_recommend_market_orders() {
        let stats = ExecutionStatistics {
            success_rate: 0.95,
            avg_execution_secs: 1.5,
            ..ExecutionStatistics::default()
        };
        let recommendations = recommend_parameters(&stats, &SlippageConfig::default());
        assert!(!recommendations.increase_slippage_tolerance);
        assert!(recommendations.prefer_market_orders);
        assert!(recommendations.reduce_order_size);
    }

    #[test]
    fn high_slippage_recommends_splitting_orders() {
        let stats = ExecutionStatistics {
            success_rate: 0.95,
            avg_slippage: 0.006,
            ..ExecutionStatistics::default()
        };
        let recommendations = recommend_parameters(&stats, &SlippageConfig::default());
        assert!(recommendations.split_large_orders);
        assert!(recommendations.prefer_limit_orders);
    }

    #[test]
    fn healthy_statistics_recommend_nothing() {
        let stats = ExecutionStatistics {
            total: 100,
            successful: 95,
            failed: 5,
            success_rate: 0.95,
            avg_execution_secs: 0.3,
            avg_slippage: 0.002,
            ..ExecutionStatistics::default()
        };
        let recommendations = recommend_parameters(&stats, &SlippageConfig::default());
        assert!(recommendations.is_empty());
    }

    #[test]
    fn concurrent_appends_all_recorded() {
        use std::sync::Arc;

        let ledger = Arc::new(ExecutionLedger::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        ledger.record(success(0.1, 0.001, dec!(1)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ledger.len(), 800);
        assert_eq!(ledger.statistics().total, 800);
    }
}

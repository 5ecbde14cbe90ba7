//! Execution layer.
//!
//! The machinery that turns validated orders into execution results:
//!
//! - [`validator`]: pre-execution structural and business-rule checks
//! - [`slippage`]: clamped slippage estimation with a pluggable estimator
//! - [`commission`]: per-venue fee accounting
//! - [`executor`]: drives one order through its lifecycle
//! - [`ledger`]: append-only results, statistics, tuning recommendations
//! - [`result`]: the immutable execution outcome

pub mod commission;
pub mod executor;
pub mod ledger;
pub mod result;
pub mod slippage;
pub mod validator;

pub use commission::commission_for;
pub use executor::{FixedLatency, LatencySource, OrderExecutor, UniformLatency};
pub use ledger::{
    ExecutionLedger, ExecutionStatistics, ParameterRecommendations, recommend_parameters,
};
pub use result::ExecutionResult;
pub use slippage::{FixedEstimator, SlippageEstimator, SlippageModel, StochasticEstimator};
pub use validator::{OrderValidator, ValidationOutcome};

// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Arbitrage Execution Engine
//!
//! Turns a detected cross-venue price discrepancy into a pair of
//! coordinated buy/sell orders, executes them concurrently under slippage
//! and risk constraints, and produces verifiable execution results and
//! aggregate statistics.
//!
//! # Architecture
//!
//! ## Layers (inside → outside)
//!
//! - **Domain** ([`domain`]): the Order aggregate, its status lifecycle
//!   and state machine — no infrastructure dependencies.
//! - **Execution** ([`execution`]): validator, slippage model, commission
//!   model, single-order executor, execution ledger and statistics.
//! - **Facade** ([`engine`]): the [`ArbitrageEngine`] coordinator and the
//!   engine's external API, backed by the in-memory order [`store`].
//!
//! # Determinism
//!
//! Randomized market behavior (slippage noise, exchange latency) sits
//! behind the [`SlippageEstimator`] and [`LatencySource`] traits so tests
//! can pin both.
//!
//! # Example
//!
//! ```rust,ignore
//! use arbitrage_engine::{ArbitrageEngine, EngineConfig, OrderRequest};
//!
//! let engine = ArbitrageEngine::new(EngineConfig::default());
//! let (buy_result, sell_result) = engine
//!     .execute_arbitrage(buy_request, sell_request, 0.01)
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Configuration: slippage policy, fee schedules, size minimums, latency.
pub mod config;

/// Domain layer - core business types with no external dependencies.
pub mod domain;

/// Engine facade - the coordinator and external API.
pub mod engine;

/// Execution layer - models, executor, ledger.
pub mod execution;

/// In-memory order store shared across the engine.
pub mod store;

/// Tracing subscriber setup.
pub mod telemetry;

// Domain re-exports
pub use domain::order_execution::{
    Fill, NewOrder, Order, OrderError, OrderSide, OrderStateMachine, OrderStatus, OrderType,
};
pub use domain::shared::OrderId;

// Configuration re-exports
pub use config::{ConfigError, EngineConfig, SlippageConfig};

// Execution re-exports
pub use execution::{
    ExecutionLedger, ExecutionResult, ExecutionStatistics, FixedEstimator, FixedLatency,
    LatencySource, OrderExecutor, OrderValidator, ParameterRecommendations, SlippageEstimator,
    SlippageModel, StochasticEstimator, UniformLatency, ValidationOutcome,
};

// Facade re-exports
pub use engine::{ArbitrageEngine, OrderRequest};
pub use store::InMemoryOrderStore;

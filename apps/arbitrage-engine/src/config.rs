//! Configuration for the arbitrage execution engine.
//!
//! The per-venue fee table, minimum-order-size table and venue slippage
//! factors are configuration data, injected at engine construction. They
//! can be loaded from a YAML file or taken from [`EngineConfig::default`],
//! which mirrors the schedules of the venues the engine ships with.
//!
//! # Usage
//!
//! ```rust,ignore
//! use arbitrage_engine::config::EngineConfig;
//!
//! // Defaults
//! let config = EngineConfig::default();
//!
//! // From a YAML file
//! let config = EngineConfig::from_yaml_file("engine.yaml")?;
//! ```

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("config validation failed: {0}")]
    ValidationError(String),
}

/// Process-wide slippage policy.
///
/// A single shared instance is read by every slippage estimate; writes
/// happen only through explicit adoption of tuning recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlippageConfig {
    /// Maximum allowed slippage as a fraction (0.005 = 0.5%).
    #[serde(default = "default_max_slippage")]
    pub max_slippage: f64,
    /// Price impact threshold as a fraction.
    #[serde(default = "default_price_impact_threshold")]
    pub price_impact_threshold: f64,
    /// Whether the volatility multiplier scales the volatility draw.
    #[serde(default = "default_adaptive")]
    pub adaptive: bool,
    /// Volatility multiplier; neutral at 2.0.
    #[serde(default = "default_volatility_multiplier")]
    pub volatility_multiplier: f64,
}

const fn default_max_slippage() -> f64 {
    0.005
}

const fn default_price_impact_threshold() -> f64 {
    0.001
}

const fn default_adaptive() -> bool {
    true
}

const fn default_volatility_multiplier() -> f64 {
    2.0
}

impl Default for SlippageConfig {
    fn default() -> Self {
        Self {
            max_slippage: default_max_slippage(),
            price_impact_threshold: default_price_impact_threshold(),
            adaptive: default_adaptive(),
            volatility_multiplier: default_volatility_multiplier(),
        }
    }
}

/// Per-venue commission rates, as fractions of notional value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee rate per venue (lowercase venue name).
    #[serde(default = "default_fee_rates")]
    pub rates: HashMap<String, Decimal>,
    /// Fee rate applied to venues missing from the table.
    #[serde(default = "default_fee_rate")]
    pub default_rate: Decimal,
}

fn default_fee_rate() -> Decimal {
    dec!(0.001)
}

fn default_fee_rates() -> HashMap<String, Decimal> {
    HashMap::from([
        ("binance".to_string(), dec!(0.001)),
        ("okx".to_string(), dec!(0.001)),
        ("bybit".to_string(), dec!(0.001)),
        ("kucoin".to_string(), dec!(0.001)),
        ("gate".to_string(), dec!(0.002)),
        ("mexc".to_string(), dec!(0.002)),
        ("bitget".to_string(), dec!(0.001)),
        ("coinex".to_string(), dec!(0.001)),
    ])
}

impl FeeSchedule {
    /// Fee rate for a venue; falls back to the default rate.
    #[must_use]
    pub fn rate_for(&self, venue: &str) -> Decimal {
        self.rates
            .get(&venue.to_lowercase())
            .copied()
            .unwrap_or(self.default_rate)
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            rates: default_fee_rates(),
            default_rate: default_fee_rate(),
        }
    }
}

/// Minimum order sizes per base currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinOrderSizes {
    /// Minimum size per base currency.
    #[serde(default = "default_min_sizes")]
    pub sizes: HashMap<String, Decimal>,
    /// Minimum applied to currencies missing from the table.
    #[serde(default = "default_min_size")]
    pub default_size: Decimal,
}

fn default_min_size() -> Decimal {
    dec!(0.01)
}

fn default_min_sizes() -> HashMap<String, Decimal> {
    HashMap::from([
        ("BTC".to_string(), dec!(0.00001)),
        ("ETH".to_string(), dec!(0.0001)),
        ("BNB".to_string(), dec!(0.001)),
    ])
}

impl MinOrderSizes {
    /// Minimum order size for a base currency; falls back to the default.
    #[must_use]
    pub fn min_for(&self, base_currency: &str) -> Decimal {
        self.sizes
            .get(base_currency)
            .copied()
            .unwrap_or(self.default_size)
    }
}

impl Default for MinOrderSizes {
    fn default() -> Self {
        Self {
            sizes: default_min_sizes(),
            default_size: default_min_size(),
        }
    }
}

/// Per-venue slippage scaling factors. Deeper books slip less.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueFactors {
    /// Slippage factor per venue (lowercase venue name).
    #[serde(default = "default_venue_factors")]
    pub factors: HashMap<String, f64>,
    /// Factor applied to venues missing from the table.
    #[serde(default = "default_venue_factor")]
    pub default_factor: f64,
}

const fn default_venue_factor() -> f64 {
    1.0
}

fn default_venue_factors() -> HashMap<String, f64> {
    HashMap::from([
        ("binance".to_string(), 0.8),
        ("okx".to_string(), 0.9),
        ("bybit".to_string(), 1.0),
        ("kucoin".to_string(), 1.1),
        ("gate".to_string(), 1.2),
        ("mexc".to_string(), 1.3),
        ("bitget".to_string(), 1.0),
        ("coinex".to_string(), 1.1),
    ])
}

impl VenueFactors {
    /// Slippage factor for a venue; falls back to the default factor.
    #[must_use]
    pub fn factor_for(&self, venue: &str) -> f64 {
        self.factors
            .get(&venue.to_lowercase())
            .copied()
            .unwrap_or(self.default_factor)
    }
}

impl Default for VenueFactors {
    fn default() -> Self {
        Self {
            factors: default_venue_factors(),
            default_factor: default_venue_factor(),
        }
    }
}

/// Simulated exchange latency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatencyConfig {
    /// Base execution latency in milliseconds.
    #[serde(default = "default_base_ms")]
    pub base_ms: u64,
    /// Uniform jitter added on top of the base latency, in milliseconds.
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
    /// Simulated cancellation latency in milliseconds.
    #[serde(default = "default_cancel_ms")]
    pub cancel_ms: u64,
}

const fn default_base_ms() -> u64 {
    100
}

const fn default_jitter_ms() -> u64 {
    200
}

const fn default_cancel_ms() -> u64 {
    50
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            base_ms: default_base_ms(),
            jitter_ms: default_jitter_ms(),
            cancel_ms: default_cancel_ms(),
        }
    }
}

/// Root engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Slippage policy.
    #[serde(default)]
    pub slippage: SlippageConfig,
    /// Per-venue commission rates.
    #[serde(default)]
    pub fees: FeeSchedule,
    /// Minimum order sizes per base currency.
    #[serde(default)]
    pub min_order_sizes: MinOrderSizes,
    /// Per-venue slippage factors.
    #[serde(default)]
    pub venue_factors: VenueFactors,
    /// Simulated latency.
    #[serde(default)]
    pub latency: LatencyConfig,
}

impl EngineConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// validation.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_yaml_bw::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` on the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slippage.max_slippage <= 0.0 || self.slippage.max_slippage > 1.0 {
            return Err(ConfigError::ValidationError(format!(
                "slippage.max_slippage must be in (0, 1], got {}",
                self.slippage.max_slippage
            )));
        }
        if self.slippage.price_impact_threshold < 0.0 {
            return Err(ConfigError::ValidationError(
                "slippage.price_impact_threshold must be non-negative".to_string(),
            ));
        }
        if self.slippage.volatility_multiplier <= 0.0 {
            return Err(ConfigError::ValidationError(
                "slippage.volatility_multiplier must be positive".to_string(),
            ));
        }
        if self.fees.default_rate < Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "fees.default_rate must be non-negative".to_string(),
            ));
        }
        if let Some((venue, rate)) = self
            .fees
            .rates
            .iter()
            .find(|(_, rate)| **rate < Decimal::ZERO)
        {
            return Err(ConfigError::ValidationError(format!(
                "fees.rates.{venue} must be non-negative, got {rate}"
            )));
        }
        if self.min_order_sizes.default_size <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "min_order_sizes.default_size must be positive".to_string(),
            ));
        }
        if let Some((currency, size)) = self
            .min_order_sizes
            .sizes
            .iter()
            .find(|(_, size)| **size <= Decimal::ZERO)
        {
            return Err(ConfigError::ValidationError(format!(
                "min_order_sizes.sizes.{currency} must be positive, got {size}"
            )));
        }
        if self.venue_factors.default_factor <= 0.0 {
            return Err(ConfigError::ValidationError(
                "venue_factors.default_factor must be positive".to_string(),
            ));
        }
        if let Some((venue, factor)) = self
            .venue_factors
            .factors
            .iter()
            .find(|(_, factor)| **factor <= 0.0)
        {
            return Err(ConfigError::ValidationError(format!(
                "venue_factors.factors.{venue} must be positive, got {factor}"
            )));
        }
        Ok(())
    }
}

//! Pricing: hot-reloadable configuration and the fare calculation engine.
//!
//! The configuration lives in a YAML file watched on disk; the engine is a
//! pure function of the request, the active snapshot and the clock, so two
//! calculations with identical inputs at a fixed config and hour produce an
//! identical breakdown.

pub mod config;
pub mod engine;
pub mod loader;

pub use config::{
    AbVariant, ConfigError, EconomicConstraints, PricingConfig, RateCard, RateCardOverride,
    ResolvedRates, TimeBandMultiplier, ALLOWED_DENOMINATIONS,
};
pub use engine::{
    round_to_denomination, FareBreakdown, PriceCalculationRequest, PriceQuote, PricingEngine,
};
pub use loader::{ConfigStore, ConfigWatcher};

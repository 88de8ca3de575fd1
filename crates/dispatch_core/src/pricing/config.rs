//! Pricing configuration: YAML model, validation and per-request resolution.
//!
//! A configuration is validated as a whole on load; an invalid file never
//! replaces the previous valid snapshot. Resolution overlays the default rate
//! card with the zone override, the first matching time band and the A/B
//! variant picked from the pricing seed, in that order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cash denominations the platform accepts as rounding step sizes.
pub const ALLOWED_DENOMINATIONS: [f64; 4] = [0.5, 1.0, 3.0, 5.0];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse pricing config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("{scope}: per_km_rate {rate} outside driver rate bounds {min}..={max}")]
    PerKmRateOutOfBounds {
        scope: String,
        rate: f64,
        min: f64,
        max: f64,
    },
    #[error("{scope}: rounding denomination {denomination} not in the allowed set")]
    DisallowedDenomination { scope: String, denomination: f64 },
    #[error("{scope}: rounding denominations must be non-empty and sorted ascending")]
    MalformedDenominations { scope: String },
    #[error("{scope}: commission percent {percent} outside 0..=100")]
    CommissionOutOfRange { scope: String, percent: f64 },
    #[error("time band {index}: hours must be within 0..=23 and differ (got {start}..{end})")]
    MalformedTimeBand { index: usize, start: u8, end: u8 },
    #[error("time band {index}: surge multiplier {multiplier} must be >= 1.0")]
    SurgeBelowOne { index: usize, multiplier: f64 },
}

/// The full set of rates applied to one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCard {
    pub base_fare: f64,
    pub per_km_rate: f64,
    pub per_min_rate: f64,
    pub commission_percent: f64,
    #[serde(default)]
    pub minimum_fare: Option<f64>,
    pub rounding_denominations: Vec<f64>,
}

impl Default for RateCard {
    fn default() -> Self {
        Self {
            base_fare: 5.0,
            per_km_rate: 2.0,
            per_min_rate: 0.5,
            commission_percent: 20.0,
            minimum_fare: None,
            rounding_denominations: vec![0.5, 1.0, 3.0, 5.0],
        }
    }
}

/// Partial rate card: zone overrides and A/B variants set only the fields
/// they change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateCardOverride {
    #[serde(default)]
    pub base_fare: Option<f64>,
    #[serde(default)]
    pub per_km_rate: Option<f64>,
    #[serde(default)]
    pub per_min_rate: Option<f64>,
    #[serde(default)]
    pub commission_percent: Option<f64>,
    #[serde(default)]
    pub minimum_fare: Option<f64>,
    #[serde(default)]
    pub rounding_denominations: Option<Vec<f64>>,
}

impl RateCardOverride {
    fn apply_to(&self, card: &mut RateCard) {
        if let Some(base_fare) = self.base_fare {
            card.base_fare = base_fare;
        }
        if let Some(per_km_rate) = self.per_km_rate {
            card.per_km_rate = per_km_rate;
        }
        if let Some(per_min_rate) = self.per_min_rate {
            card.per_min_rate = per_min_rate;
        }
        if let Some(commission_percent) = self.commission_percent {
            card.commission_percent = commission_percent;
        }
        if let Some(minimum_fare) = self.minimum_fare {
            card.minimum_fare = Some(minimum_fare);
        }
        if let Some(denominations) = &self.rounding_denominations {
            card.rounding_denominations = denominations.clone();
        }
    }
}

/// Surge band over UTC hours. The band covers `[start_hour, end_hour)`; an
/// hour equal to `end_hour` is outside. Bands may wrap past midnight
/// (`start_hour > end_hour`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBandMultiplier {
    pub start_hour: u8,
    pub end_hour: u8,
    pub surge_multiplier: f64,
}

impl TimeBandMultiplier {
    pub fn contains(&self, hour: u8) -> bool {
        if self.start_hour < self.end_hour {
            self.start_hour <= hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

/// One arm of a pricing experiment. Selected deterministically from the
/// request's pricing seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbVariant {
    pub experiment_name: String,
    pub variant: String,
    #[serde(flatten)]
    pub overrides: RateCardOverride,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicConstraints {
    pub min_driver_rate: f64,
    pub max_driver_rate: f64,
    #[serde(default)]
    pub operational_cost_floor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub version: String,
    pub default: RateCard,
    #[serde(default)]
    pub zone_overrides: BTreeMap<String, RateCardOverride>,
    #[serde(default)]
    pub time_based_multipliers: Vec<TimeBandMultiplier>,
    #[serde(default)]
    pub ab_tests: Vec<AbVariant>,
    pub economic_constraints: EconomicConstraints,
}

/// Rates resolved for one request, plus the surge and variant that applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRates {
    pub rates: RateCard,
    pub surge_multiplier: f64,
    pub ab_variant: Option<String>,
}

impl PricingConfig {
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let config: PricingConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate economic constraints, rounding sets, commission and time
    /// bands across the default card, every zone override and every variant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_card("default", &self.default)?;
        for (zone, card_override) in &self.zone_overrides {
            self.validate_override(&format!("zone_overrides.{zone}"), card_override)?;
        }
        for variant in &self.ab_tests {
            self.validate_override(
                &format!("ab_tests.{}/{}", variant.experiment_name, variant.variant),
                &variant.overrides,
            )?;
        }
        for (index, band) in self.time_based_multipliers.iter().enumerate() {
            if band.start_hour > 23 || band.end_hour > 23 || band.start_hour == band.end_hour {
                return Err(ConfigError::MalformedTimeBand {
                    index,
                    start: band.start_hour,
                    end: band.end_hour,
                });
            }
            if band.surge_multiplier < 1.0 {
                return Err(ConfigError::SurgeBelowOne {
                    index,
                    multiplier: band.surge_multiplier,
                });
            }
        }
        Ok(())
    }

    fn validate_card(&self, scope: &str, card: &RateCard) -> Result<(), ConfigError> {
        self.validate_per_km_rate(scope, card.per_km_rate)?;
        self.validate_denominations(scope, &card.rounding_denominations)?;
        self.validate_commission(scope, card.commission_percent)
    }

    fn validate_override(
        &self,
        scope: &str,
        card_override: &RateCardOverride,
    ) -> Result<(), ConfigError> {
        if let Some(rate) = card_override.per_km_rate {
            self.validate_per_km_rate(scope, rate)?;
        }
        if let Some(denominations) = &card_override.rounding_denominations {
            self.validate_denominations(scope, denominations)?;
        }
        if let Some(percent) = card_override.commission_percent {
            self.validate_commission(scope, percent)?;
        }
        Ok(())
    }

    fn validate_per_km_rate(&self, scope: &str, rate: f64) -> Result<(), ConfigError> {
        let constraints = &self.economic_constraints;
        if rate < constraints.min_driver_rate || rate > constraints.max_driver_rate {
            return Err(ConfigError::PerKmRateOutOfBounds {
                scope: scope.to_string(),
                rate,
                min: constraints.min_driver_rate,
                max: constraints.max_driver_rate,
            });
        }
        Ok(())
    }

    fn validate_denominations(&self, scope: &str, denominations: &[f64]) -> Result<(), ConfigError> {
        if denominations.is_empty() || denominations.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::MalformedDenominations {
                scope: scope.to_string(),
            });
        }
        for &denomination in denominations {
            let allowed = ALLOWED_DENOMINATIONS
                .iter()
                .any(|&candidate| (candidate - denomination).abs() < f64::EPSILON);
            if !allowed {
                return Err(ConfigError::DisallowedDenomination {
                    scope: scope.to_string(),
                    denomination,
                });
            }
        }
        Ok(())
    }

    fn validate_commission(&self, scope: &str, percent: f64) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(ConfigError::CommissionOutOfRange {
                scope: scope.to_string(),
                percent,
            });
        }
        Ok(())
    }

    /// Resolve the rates active for a request: default card, then zone
    /// override, then the first time band containing `hour` (else surge 1.0),
    /// then the variant at `pricing_seed % ab_tests.len()`.
    pub fn resolve(&self, zone: Option<&str>, hour: u8, pricing_seed: u64) -> ResolvedRates {
        let mut rates = self.default.clone();
        if let Some(zone) = zone {
            if let Some(card_override) = self.zone_overrides.get(zone) {
                card_override.apply_to(&mut rates);
            }
        }

        let surge_multiplier = self
            .time_based_multipliers
            .iter()
            .find(|band| band.contains(hour))
            .map(|band| band.surge_multiplier)
            .unwrap_or(1.0);

        let ab_variant = if self.ab_tests.is_empty() {
            None
        } else {
            let variant = &self.ab_tests[(pricing_seed as usize) % self.ab_tests.len()];
            variant.overrides.apply_to(&mut rates);
            Some(format!("{}/{}", variant.experiment_name, variant.variant))
        };

        ResolvedRates {
            rates,
            surge_multiplier,
            ab_variant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> PricingConfig {
        PricingConfig {
            version: "v1".to_string(),
            default: RateCard::default(),
            zone_overrides: BTreeMap::new(),
            time_based_multipliers: vec![TimeBandMultiplier {
                start_hour: 7,
                end_hour: 9,
                surge_multiplier: 1.5,
            }],
            ab_tests: Vec::new(),
            economic_constraints: EconomicConstraints {
                min_driver_rate: 1.5,
                max_driver_rate: 3.0,
                operational_cost_floor: 1.0,
            },
        }
    }

    #[test]
    fn validate_rejects_per_km_rate_outside_bounds() {
        let mut config = base_config();
        config.default.per_km_rate = 5.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PerKmRateOutOfBounds { .. })
        ));
    }

    #[test]
    fn validate_rejects_unknown_denominations() {
        let mut config = base_config();
        config.default.rounding_denominations = vec![0.5, 2.0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DisallowedDenomination { .. })
        ));
    }

    #[test]
    fn validate_rejects_malformed_time_bands() {
        let mut config = base_config();
        config.time_based_multipliers.push(TimeBandMultiplier {
            start_hour: 7,
            end_hour: 24,
            surge_multiplier: 1.2,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MalformedTimeBand { index: 1, .. })
        ));
    }

    #[test]
    fn time_band_excludes_end_hour_and_wraps_midnight() {
        let band = TimeBandMultiplier {
            start_hour: 7,
            end_hour: 9,
            surge_multiplier: 1.5,
        };
        assert!(band.contains(7));
        assert!(band.contains(8));
        assert!(!band.contains(9));

        let night = TimeBandMultiplier {
            start_hour: 23,
            end_hour: 5,
            surge_multiplier: 1.2,
        };
        assert!(night.contains(23));
        assert!(night.contains(2));
        assert!(!night.contains(5));
        assert!(!night.contains(12));
    }

    #[test]
    fn resolve_overlays_zone_then_band_then_variant() {
        let mut config = base_config();
        config.zone_overrides.insert(
            "airport".to_string(),
            RateCardOverride {
                base_fare: Some(8.0),
                ..RateCardOverride::default()
            },
        );
        config.ab_tests = vec![
            AbVariant {
                experiment_name: "fare-floor".to_string(),
                variant: "A".to_string(),
                overrides: RateCardOverride::default(),
            },
            AbVariant {
                experiment_name: "fare-floor".to_string(),
                variant: "B".to_string(),
                overrides: RateCardOverride {
                    per_min_rate: Some(0.4),
                    ..RateCardOverride::default()
                },
            },
        ];

        let resolved = config.resolve(Some("airport"), 8, 43);
        assert_eq!(resolved.rates.base_fare, 8.0);
        assert_eq!(resolved.surge_multiplier, 1.5);
        assert_eq!(resolved.rates.per_min_rate, 0.4);
        assert_eq!(resolved.ab_variant.as_deref(), Some("fare-floor/B"));

        // Off-peak, unknown zone, seed selecting variant A: defaults all round.
        let resolved = config.resolve(Some("suburb"), 12, 42);
        assert_eq!(resolved.rates.base_fare, 5.0);
        assert_eq!(resolved.surge_multiplier, 1.0);
        assert_eq!(resolved.rates.per_min_rate, 0.5);
        assert_eq!(resolved.ab_variant.as_deref(), Some("fare-floor/A"));
    }

    #[test]
    fn parse_accepts_a_full_yaml_document() {
        let source = r#"
version: "2024-03"
default:
  base_fare: 5.0
  per_km_rate: 2.0
  per_min_rate: 0.5
  commission_percent: 20.0
  rounding_denominations: [0.5, 1.0, 5.0]
zone_overrides:
  airport:
    base_fare: 8.0
time_based_multipliers:
  - { start_hour: 7, end_hour: 9, surge_multiplier: 1.5 }
  - { start_hour: 23, end_hour: 5, surge_multiplier: 1.2 }
ab_tests:
  - experiment_name: fare-floor
    variant: A
  - experiment_name: fare-floor
    variant: B
    per_min_rate: 0.4
economic_constraints:
  min_driver_rate: 1.5
  max_driver_rate: 3.0
  operational_cost_floor: 1.0
"#;
        let config = PricingConfig::parse(source).expect("valid config");
        assert_eq!(config.version, "2024-03");
        assert_eq!(config.zone_overrides["airport"].base_fare, Some(8.0));
        assert_eq!(config.time_based_multipliers.len(), 2);
        assert_eq!(config.ab_tests[1].overrides.per_min_rate, Some(0.4));
    }
}

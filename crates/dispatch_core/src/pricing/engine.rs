//! Fare calculation: pure function of (request, active configuration, clock).
//!
//! `subtotal = base + per_km * km + per_min * min`, multiplied by
//! `max(1.0, demand * surge)`, floored at the minimum fare, rounded to a cash
//! denomination step, then split into commission and driver payout. The
//! economic guardrail rejects any result whose commission fails to cover the
//! operational cost floor or whose payout does not clear it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::PricingConfig;
use super::loader::ConfigStore;
use crate::api::PricingApi;
use crate::clock::{utc_hour, Clock};
use crate::domain::Location;
use crate::error::{DomainError, DomainResult};

/// How long a quoted price stays valid.
const PRICE_VALIDITY_SECS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCalculationRequest {
    pub trip_request_id: String,
    pub passenger_id: String,
    pub matched_driver_id: String,
    pub origin: Location,
    pub destination: Location,
    pub estimated_distance_meters: f64,
    pub estimated_duration_seconds: f64,
    pub demand_multiplier: f64,
    pub supply_multiplier: f64,
    pub driver_acceptance_rate: f64,
    pub driver_rating: f64,
    pub pricing_seed: u64,
    #[serde(default)]
    pub zone: Option<String>,
}

impl PriceCalculationRequest {
    fn validate(&self) -> DomainResult<()> {
        self.origin.validate()?;
        self.destination.validate()?;
        if !self.estimated_distance_meters.is_finite() || self.estimated_distance_meters < 0.0 {
            return Err(DomainError::InvalidArgument(
                "estimated_distance_meters must be finite and >= 0".into(),
            ));
        }
        if !self.estimated_duration_seconds.is_finite() || self.estimated_duration_seconds < 0.0 {
            return Err(DomainError::InvalidArgument(
                "estimated_duration_seconds must be finite and >= 0".into(),
            ));
        }
        if !self.demand_multiplier.is_finite()
            || !self.supply_multiplier.is_finite()
            || self.supply_multiplier < 0.0
        {
            return Err(DomainError::InvalidArgument(
                "multipliers must be finite and supply_multiplier >= 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.driver_acceptance_rate) {
            return Err(DomainError::InvalidArgument(
                "driver_acceptance_rate must be within 0..=1".into(),
            ));
        }
        if !(0.0..=5.0).contains(&self.driver_rating) {
            return Err(DomainError::InvalidArgument(
                "driver_rating must be within 0..=5".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareBreakdown {
    pub base: f64,
    pub distance: f64,
    pub time: f64,
    /// Amount added on top of the subtotal by demand and surge multipliers.
    pub surge: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub trip_request_id: String,
    pub calculation_id: String,
    pub passenger_fare_total: f64,
    pub driver_payout_total: f64,
    pub platform_commission: f64,
    pub breakdown: FareBreakdown,
    pub surge_multiplier: f64,
    #[serde(default)]
    pub ab_variant: Option<String>,
    pub pricing_model_version: String,
    pub price_expires_at: DateTime<Utc>,
}

/// Round to the nearest cash amount: each denomination proposes its nearest
/// multiple, the closest proposal wins, and ties go to the smallest
/// denomination (denominations are validated ascending, so first-wins).
pub fn round_to_denomination(raw: f64, denominations: &[f64]) -> f64 {
    let mut best = raw;
    let mut best_distance = f64::INFINITY;
    for &denomination in denominations {
        let candidate = (raw / denomination).round() * denomination;
        let distance = (candidate - raw).abs();
        if distance < best_distance {
            best_distance = distance;
            best = candidate;
        }
    }
    best
}

pub struct PricingEngine {
    config: Arc<ConfigStore>,
    clock: Arc<dyn Clock>,
}

impl PricingEngine {
    pub fn new(config: Arc<ConfigStore>, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn calculate(&self, request: &PriceCalculationRequest) -> DomainResult<PriceQuote> {
        request.validate()?;
        let config = self.config.current().ok_or(DomainError::ConfigUnavailable)?;

        let now = self.clock.now();
        let resolved = config.resolve(request.zone.as_deref(), utc_hour(now), request.pricing_seed);
        let rates = &resolved.rates;

        let distance_km = request.estimated_distance_meters / 1000.0;
        let minutes = request.estimated_duration_seconds / 60.0;

        let base = rates.base_fare;
        let distance_fare = rates.per_km_rate * distance_km;
        let time_fare = rates.per_min_rate * minutes;
        let subtotal = base + distance_fare + time_fare;

        // Demand below 1.0 never discounts; the combined multiplier is
        // floored at 1.0 as well.
        let demand = request.demand_multiplier.max(1.0);
        let multiplier = (demand * resolved.surge_multiplier).max(1.0);
        let mut raw_total = subtotal * multiplier;
        if let Some(minimum_fare) = rates.minimum_fare {
            raw_total = raw_total.max(minimum_fare);
        }

        let passenger_fare = round_to_denomination(raw_total, &rates.rounding_denominations);
        let commission = passenger_fare * rates.commission_percent / 100.0;
        let driver_payout = passenger_fare - commission;

        let floor = config.economic_constraints.operational_cost_floor;
        if commission < floor || driver_payout <= floor {
            return Err(DomainError::EconomicGuardrail(format!(
                "fare {passenger_fare:.2} with payout {driver_payout:.2} violates the \
                 operational cost floor {floor:.2}"
            )));
        }

        Ok(PriceQuote {
            trip_request_id: request.trip_request_id.clone(),
            calculation_id: Uuid::new_v4().to_string(),
            passenger_fare_total: passenger_fare,
            driver_payout_total: driver_payout,
            platform_commission: commission,
            breakdown: FareBreakdown {
                base,
                distance: distance_fare,
                time: time_fare,
                surge: subtotal * (multiplier - 1.0),
            },
            surge_multiplier: resolved.surge_multiplier,
            ab_variant: resolved.ab_variant,
            pricing_model_version: config.version.clone(),
            price_expires_at: now + Duration::seconds(PRICE_VALIDITY_SECS),
        })
    }
}

#[async_trait]
impl PricingApi for PricingEngine {
    async fn calculate_price(&self, request: PriceCalculationRequest) -> DomainResult<PriceQuote> {
        self.calculate(&request)
    }

    async fn get_fallback_config(&self) -> DomainResult<Option<PricingConfig>> {
        Ok(self.config.fallback().map(|config| (*config).clone()))
    }

    async fn update_fallback_config(&self, config: PricingConfig) -> DomainResult<()> {
        self.config
            .set_fallback(config)
            .map_err(|error| DomainError::InvalidArgument(error.to_string()))
    }
}

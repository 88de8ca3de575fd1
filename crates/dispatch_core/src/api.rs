//! Service contracts: proto-like commands and one async trait per service.
//!
//! The in-process services and the HTTP clients implement the same traits, so
//! the workflow orchestrator is indifferent to whether a collaborator lives
//! in-process or behind a wire. Every operation returns an explicit
//! `DomainResult`; the caller inspects the error kind to decide between retry
//! and compensation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{CancelReason, DriverStatusRecord, Location, Trip, TripRequest, TripStatus};
use crate::error::DomainResult;
use crate::matching::{MatchOutcome, MatchingRequest};
use crate::pricing::{PriceCalculationRequest, PriceQuote, PricingConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTripRequestCommand {
    pub passenger_id: String,
    pub origin: Location,
    pub destination: Location,
}

/// Pricing inputs the trip creator forwards to the engine. Distance and
/// duration are estimates supplied by the caller; routing is not this
/// system's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingInputs {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTripCommand {
    pub trip_request_id: String,
    pub passenger_id: String,
    pub driver_id: String,
    pub origin: Location,
    pub destination: Location,
    pub pricing: PricingInputs,
}

impl CreateTripCommand {
    /// The price calculation this trip creation triggers.
    pub fn price_request(&self) -> PriceCalculationRequest {
        PriceCalculationRequest {
            trip_request_id: self.trip_request_id.clone(),
            passenger_id: self.passenger_id.clone(),
            matched_driver_id: self.driver_id.clone(),
            origin: self.origin,
            destination: self.destination,
            estimated_distance_meters: self.pricing.estimated_distance_meters,
            estimated_duration_seconds: self.pricing.estimated_duration_seconds,
            demand_multiplier: self.pricing.demand_multiplier,
            supply_multiplier: self.pricing.supply_multiplier,
            driver_acceptance_rate: self.pricing.driver_acceptance_rate,
            driver_rating: self.pricing.driver_rating,
            pricing_seed: self.pricing.pricing_seed,
            zone: self.pricing.zone.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDriverStatusCommand {
    pub driver_id: String,
    pub available: bool,
    pub expected_version: u64,
    pub idempotency_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterDriverCommand {
    pub driver_id: String,
    pub location: Location,
    pub acceptance_rate: f64,
    pub rating: f64,
}

#[async_trait]
pub trait TripRequestApi: Send + Sync {
    async fn create_trip_request(&self, command: CreateTripRequestCommand)
        -> DomainResult<TripRequest>;
    async fn cancel_trip_request(
        &self,
        request_id: &str,
        expected_version: u64,
    ) -> DomainResult<TripRequest>;
    async fn get_trip_request(&self, request_id: &str) -> DomainResult<TripRequest>;
    /// Open -> Fulfilled, applied once the trip referencing the request
    /// commits.
    async fn mark_fulfilled(
        &self,
        request_id: &str,
        expected_version: u64,
    ) -> DomainResult<TripRequest>;
}

#[async_trait]
pub trait MatchingApi: Send + Sync {
    async fn get_candidates(&self, request: MatchingRequest) -> DomainResult<MatchOutcome>;
}

#[async_trait]
pub trait PricingApi: Send + Sync {
    async fn calculate_price(&self, request: PriceCalculationRequest) -> DomainResult<PriceQuote>;
    async fn get_fallback_config(&self) -> DomainResult<Option<PricingConfig>>;
    async fn update_fallback_config(&self, config: PricingConfig) -> DomainResult<()>;
}

#[async_trait]
pub trait DriverStatusApi: Send + Sync {
    async fn update_driver_status(
        &self,
        command: UpdateDriverStatusCommand,
    ) -> DomainResult<DriverStatusRecord>;
    async fn get_driver_status(&self, driver_id: &str) -> DomainResult<DriverStatusRecord>;
    /// Seed a driver into the pool, available at version 1. Registering an
    /// existing driver returns the current record unchanged.
    async fn register_driver(
        &self,
        command: RegisterDriverCommand,
    ) -> DomainResult<DriverStatusRecord>;
}

#[async_trait]
pub trait TripApi: Send + Sync {
    async fn create_trip(&self, command: CreateTripCommand) -> DomainResult<Trip>;
    async fn update_trip_status(
        &self,
        trip_id: &str,
        new_status: TripStatus,
        expected_version: u64,
    ) -> DomainResult<Trip>;
    async fn cancel_trip(
        &self,
        trip_id: &str,
        reason: CancelReason,
        expected_version: u64,
    ) -> DomainResult<Trip>;
    async fn get_trip_by_id(&self, trip_id: &str) -> DomainResult<Trip>;
    async fn get_trip_by_request_id(&self, trip_request_id: &str) -> DomainResult<Trip>;
}

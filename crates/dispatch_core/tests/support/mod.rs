//! Shared fixtures: a fully wired in-process control plane with a pinned
//! clock and a fast retry policy so failure-path tests stay quick.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use dispatch_core::api::{PricingApi, TripApi};
use dispatch_core::clock::FixedClock;
use dispatch_core::domain::Location;
use dispatch_core::matching::NearestDriverPolicy;
use dispatch_core::pricing::{
    ConfigStore, EconomicConstraints, PricingConfig, PricingEngine, RateCard, TimeBandMultiplier,
};
use dispatch_core::services::{
    DriverStatusService, MatchingService, TripRequestService, TripService,
};
use dispatch_core::store::TtlStore;
use dispatch_core::telemetry::TelemetryRecorder;
use dispatch_core::workflow::{Collaborators, RetryPolicy, TripWorkflow};

/// Pickup and dropoff used across scenarios.
pub fn origin() -> Location {
    Location::new(39.60, 67.80)
}

pub fn destination() -> Location {
    Location::new(39.65, 67.85)
}

/// A valid baseline config: 5.0 base, 2.0/km, 0.5/min, 20% commission,
/// morning surge 1.5x over 7..9.
pub fn sample_config() -> PricingConfig {
    PricingConfig {
        version: "v-test".to_string(),
        default: RateCard {
            base_fare: 5.0,
            per_km_rate: 2.0,
            per_min_rate: 0.5,
            commission_percent: 20.0,
            minimum_fare: None,
            rounding_denominations: vec![0.5, 1.0, 5.0],
        },
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

pub struct Harness {
    pub clock: Arc<FixedClock>,
    pub config_store: Arc<ConfigStore>,
    pub telemetry: Arc<TelemetryRecorder>,
    pub idempotency: Arc<TtlStore>,
    pub drivers: Arc<DriverStatusService>,
    pub trip_requests: Arc<TripRequestService>,
    pub matching: Arc<MatchingService>,
    pub pricing: Arc<PricingEngine>,
    pub trips: Arc<TripService>,
    pub retry: RetryPolicy,
}

impl Harness {
    /// Off-peak noon clock, sample config installed, empty driver pool.
    pub fn new() -> Self {
        Self::with_config(sample_config())
    }

    pub fn with_config(config: PricingConfig) -> Self {
        let noon = Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let clock = Arc::new(FixedClock::at(noon));
        let config_store = Arc::new(ConfigStore::new());
        config_store.install(config);

        let drivers = Arc::new(DriverStatusService::new());
        let trip_requests = Arc::new(TripRequestService::new(clock.clone()));
        let matching = Arc::new(MatchingService::new(
            drivers.clone(),
            Box::new(NearestDriverPolicy),
        ));
        let pricing = Arc::new(PricingEngine::new(config_store.clone(), clock.clone()));
        let trips = Arc::new(TripService::new(pricing.clone() as Arc<dyn PricingApi>, clock.clone()));

        Self {
            clock,
            config_store,
            telemetry: Arc::new(TelemetryRecorder::new()),
            idempotency: Arc::new(TtlStore::new()),
            drivers,
            trip_requests,
            matching,
            pricing,
            trips,
            retry: RetryPolicy {
                max_attempts: 3,
                backoff: Duration::from_millis(1),
                call_timeout: Duration::from_millis(250),
            },
        }
    }

    /// Register the scenario pool: driver_1 at the pickup, the rest stepping
    /// away from it.
    pub fn seed_drivers(&self, count: usize) {
        for i in 1..=count {
            let offset = (i - 1) as f64 * 0.01;
            self.drivers
                .register_driver(
                    &format!("driver_{i}"),
                    Location::new(39.60 + offset, 67.80 + offset),
                    1.0,
                    5.0,
                )
                .expect("register driver");
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            trip_requests: self.trip_requests.clone(),
            matching: self.matching.clone(),
            pricing: self.pricing.clone(),
            driver_status: self.drivers.clone(),
            trips: self.trips.clone(),
        }
    }

    pub fn workflow(&self) -> TripWorkflow {
        TripWorkflow::new(
            self.collaborators(),
            self.idempotency.clone(),
            self.telemetry.clone(),
            self.clock.clone(),
            self.retry,
        )
    }

    /// A workflow whose trip service is replaced, for failure injection at
    /// the commit point.
    pub fn workflow_with_trips(&self, trips: Arc<dyn TripApi>) -> TripWorkflow {
        let mut services = self.collaborators();
        services.trips = trips;
        TripWorkflow::new(
            services,
            self.idempotency.clone(),
            self.telemetry.clone(),
            self.clock.clone(),
            self.retry,
        )
    }
}

//! The trip creation saga.
//!
//! A linear sequence of forward actions, each with a defined compensation:
//!
//! 1. create the trip request (compensate: cancel it)
//! 2. fetch candidates and pick the first (no side effect)
//! 3. price with guardrail (no side effect)
//! 4. reserve the driver (compensate: release with a fresh key)
//! 5. create the trip (the commit point)
//!
//! Executions are idempotent on a caller-supplied key: a success stores
//! `key -> trip_id` with a TTL, and a repeat within the TTL returns the
//! committed trip without re-executing. On terminal failure the recorded
//! steps are compensated in reverse; a failed compensation is logged and
//! never stops the remaining rollback.

pub mod log;
pub mod retry;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::{
    CreateTripCommand, CreateTripRequestCommand, DriverStatusApi, MatchingApi, PricingApi,
    PricingInputs, TripApi, TripRequestApi, UpdateDriverStatusCommand,
};
use crate::clock::{seed_from, Clock};
use crate::domain::{Location, Trip};
use crate::error::{DomainError, DomainResult};
use crate::matching::MatchingRequest;
use crate::store::TtlStore;
use crate::telemetry::{TelemetryEvent, TelemetryRecorder};

pub use log::{CompletedStep, WorkflowLog};
pub use retry::{call_with_retries, RetryPolicy};

/// How long a committed `key -> trip_id` mapping stays replayable.
pub const IDEMPOTENCY_TTL: Duration = Duration::from_secs(3600);

const DEFAULT_MAX_CANDIDATES: u32 = 5;
const DEFAULT_DISTANCE_METERS: f64 = 1000.0;
const DEFAULT_DURATION_SECONDS: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    CreateRequest,
    Match,
    Price,
    ReserveDriver,
    CreateTrip,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::CreateRequest => "create_trip_request",
            WorkflowStage::Match => "match",
            WorkflowStage::Price => "price",
            WorkflowStage::ReserveDriver => "reserve_driver",
            WorkflowStage::CreateTrip => "create_trip",
        }
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal workflow failure: the stage that failed and why.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("workflow failed at {stage}: {source}")]
pub struct WorkflowError {
    pub stage: WorkflowStage,
    #[source]
    pub source: DomainError,
}

/// One passenger's trip creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTripOrder {
    pub passenger_id: String,
    pub origin: Location,
    pub destination: Location,
    pub estimated_distance_meters: f64,
    pub estimated_duration_seconds: f64,
    pub demand_multiplier: f64,
    pub max_candidates: u32,
    pub zone: Option<String>,
    /// Replay token; derived from the order when absent.
    pub idempotency_key: Option<String>,
    /// Seed for matching and A/B bucketing; the clock supplies one when
    /// absent.
    pub seed: Option<u64>,
}

impl CreateTripOrder {
    pub fn new(passenger_id: &str, origin: Location, destination: Location) -> Self {
        Self {
            passenger_id: passenger_id.to_string(),
            origin,
            destination,
            estimated_distance_meters: DEFAULT_DISTANCE_METERS,
            estimated_duration_seconds: DEFAULT_DURATION_SECONDS,
            demand_multiplier: 1.0,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            zone: None,
            idempotency_key: None,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_idempotency_key(mut self, key: &str) -> Self {
        self.idempotency_key = Some(key.to_string());
        self
    }

    pub fn with_zone(mut self, zone: &str) -> Self {
        self.zone = Some(zone.to_string());
        self
    }

    pub fn with_estimates(mut self, distance_meters: f64, duration_seconds: f64) -> Self {
        self.estimated_distance_meters = distance_meters;
        self.estimated_duration_seconds = duration_seconds;
        self
    }

    pub fn with_demand_multiplier(mut self, demand_multiplier: f64) -> Self {
        self.demand_multiplier = demand_multiplier;
        self
    }

    fn derived_key(&self) -> String {
        format!(
            "trip_workflow:{}:{}:{}:{}:{}",
            self.passenger_id, self.origin.lat, self.origin.lon, self.destination.lat,
            self.destination.lon
        )
    }
}

/// The five collaborating services, in-process or remote.
#[derive(Clone)]
pub struct Collaborators {
    pub trip_requests: Arc<dyn TripRequestApi>,
    pub matching: Arc<dyn MatchingApi>,
    pub pricing: Arc<dyn PricingApi>,
    pub driver_status: Arc<dyn DriverStatusApi>,
    pub trips: Arc<dyn TripApi>,
}

pub struct TripWorkflow {
    services: Collaborators,
    idempotency: Arc<TtlStore>,
    telemetry: Arc<TelemetryRecorder>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
}

impl TripWorkflow {
    pub fn new(
        services: Collaborators,
        idempotency: Arc<TtlStore>,
        telemetry: Arc<TelemetryRecorder>,
        clock: Arc<dyn Clock>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            services,
            idempotency,
            telemetry,
            clock,
            retry,
        }
    }

    /// Execute the saga, or replay a committed result for a known key.
    pub async fn create_trip(&self, order: CreateTripOrder) -> Result<Trip, WorkflowError> {
        let key = order
            .idempotency_key
            .clone()
            .unwrap_or_else(|| order.derived_key());

        if let Some(trip_id) = self.idempotency.get(&key) {
            info!(%key, %trip_id, "duplicate workflow invocation; returning committed trip");
            self.emit(
                TelemetryEvent::new("WorkflowReplayed", &trip_id, self.clock.now())
                    .with("idempotency_key", key.clone()),
            );
            return self
                .services
                .trips
                .get_trip_by_id(&trip_id)
                .await
                .map_err(|source| WorkflowError {
                    stage: WorkflowStage::CreateTrip,
                    source,
                });
        }

        let mut log = WorkflowLog::default();
        match self.run_forward(&order, &mut log).await {
            Ok(trip) => {
                self.idempotency.set_if_absent(&key, &trip.id, IDEMPOTENCY_TTL);
                Ok(trip)
            }
            Err(failure) => {
                error!(stage = %failure.stage, error = %failure.source, "workflow failed; compensating");
                self.compensate(log).await;
                Err(failure)
            }
        }
    }

    async fn run_forward(
        &self,
        order: &CreateTripOrder,
        log: &mut WorkflowLog,
    ) -> Result<Trip, WorkflowError> {
        let fail = |stage: WorkflowStage| move |source: DomainError| WorkflowError { stage, source };

        // Step 1: create the trip request.
        let request_command = CreateTripRequestCommand {
            passenger_id: order.passenger_id.clone(),
            origin: order.origin,
            destination: order.destination,
        };
        let request = call_with_retries(&self.retry, "create_trip_request", || {
            self.services.trip_requests.create_trip_request(request_command.clone())
        })
        .await
        .map_err(fail(WorkflowStage::CreateRequest))?;
        log.record(CompletedStep::RequestCreated {
            request_id: request.id.clone(),
            version: request.version,
        });
        self.emit(
            TelemetryEvent::new("TripRequestCreated", &request.id, self.clock.now())
                .with("passenger_id", order.passenger_id.clone()),
        );

        // Step 2: candidates. An empty list is transient (supply may
        // recover), so it is retried like any transient failure.
        let seed = order.seed.unwrap_or_else(|| seed_from(self.clock.now()));
        let matching_request = MatchingRequest {
            trip_request_id: request.id.clone(),
            origin: order.origin,
            destination: order.destination,
            max_candidates: order.max_candidates,
            seed,
        };
        let outcome = call_with_retries(&self.retry, "get_candidates", || {
            let matching_request = matching_request.clone();
            async move {
                let outcome = self.services.matching.get_candidates(matching_request).await?;
                if outcome.candidates.is_empty() {
                    let reason = outcome
                        .reason_code
                        .map(|code| code.as_str())
                        .unwrap_or("EMPTY_CANDIDATES");
                    return Err(DomainError::Unavailable(format!(
                        "no driver candidates ({reason})"
                    )));
                }
                Ok(outcome)
            }
        })
        .await
        .map_err(fail(WorkflowStage::Match))?;
        let candidate = outcome.candidates[0].clone();
        self.emit(
            TelemetryEvent::new("DriverCandidatesFetched", &request.id, self.clock.now())
                .with("driver_id", candidate.driver_id.clone())
                .with("candidates", outcome.candidates.len().to_string()),
        );

        // Step 3: price, with the driver's quality stats as inputs.
        let driver = call_with_retries(&self.retry, "get_driver_status", || {
            self.services.driver_status.get_driver_status(&candidate.driver_id)
        })
        .await
        .map_err(fail(WorkflowStage::Price))?;

        let pricing_inputs = PricingInputs {
            estimated_distance_meters: order.estimated_distance_meters,
            estimated_duration_seconds: order.estimated_duration_seconds,
            demand_multiplier: order.demand_multiplier,
            supply_multiplier: 1.0,
            driver_acceptance_rate: driver.acceptance_rate,
            driver_rating: driver.rating,
            pricing_seed: seed,
            zone: order.zone.clone(),
        };
        let trip_command = CreateTripCommand {
            trip_request_id: request.id.clone(),
            passenger_id: order.passenger_id.clone(),
            driver_id: candidate.driver_id.clone(),
            origin: order.origin,
            destination: order.destination,
            pricing: pricing_inputs,
        };
        let quote = call_with_retries(&self.retry, "calculate_price", || {
            self.services.pricing.calculate_price(trip_command.price_request())
        })
        .await
        .map_err(fail(WorkflowStage::Price))?;
        if quote.passenger_fare_total < quote.driver_payout_total {
            return Err(WorkflowError {
                stage: WorkflowStage::Price,
                source: DomainError::EconomicGuardrail(format!(
                    "fare {:.2} below driver payout {:.2}",
                    quote.passenger_fare_total, quote.driver_payout_total
                )),
            });
        }
        self.emit(
            TelemetryEvent::new("PriceCalculated", &request.id, self.clock.now())
                .with("passenger_fare", format!("{:.2}", quote.passenger_fare_total))
                .with("driver_payout", format!("{:.2}", quote.driver_payout_total))
                .with("surge_multiplier", format!("{:.2}", quote.surge_multiplier)),
        );

        // Step 4: reserve the driver. The fresh idempotency key makes the
        // retried update safe.
        let reservation_key = Uuid::new_v4().to_string();
        let reserve_command = UpdateDriverStatusCommand {
            driver_id: candidate.driver_id.clone(),
            available: false,
            expected_version: driver.version,
            idempotency_key: reservation_key,
        };
        let reserved = call_with_retries(&self.retry, "reserve_driver", || {
            self.services.driver_status.update_driver_status(reserve_command.clone())
        })
        .await
        .map_err(fail(WorkflowStage::ReserveDriver))?;
        log.record(CompletedStep::DriverReserved {
            driver_id: reserved.driver_id.clone(),
            version: reserved.version,
        });
        self.emit(
            TelemetryEvent::new("DriverReserved", &request.id, self.clock.now())
                .with("driver_id", reserved.driver_id.clone()),
        );

        // Step 5: create the trip, the commit point.
        let trip = call_with_retries(&self.retry, "create_trip", || {
            self.services.trips.create_trip(trip_command.clone())
        })
        .await
        .map_err(fail(WorkflowStage::CreateTrip))?;
        self.emit(
            TelemetryEvent::new("TripCreated", &trip.id, self.clock.now())
                .with("trip_request_id", trip.trip_request_id.clone()),
        );

        // Post-commit: the request is fulfilled. Best effort; the trip is
        // already committed, so a failure here only leaves the request open.
        if let Err(error) = self
            .services
            .trip_requests
            .mark_fulfilled(&request.id, request.version)
            .await
        {
            warn!(request_id = %request.id, %error, "failed to mark trip request fulfilled");
        }

        Ok(trip)
    }

    async fn compensate(&self, log: WorkflowLog) {
        for step in log.into_reverse() {
            match step {
                CompletedStep::DriverReserved { driver_id, version } => {
                    let release = UpdateDriverStatusCommand {
                        driver_id: driver_id.clone(),
                        available: true,
                        expected_version: version,
                        idempotency_key: Uuid::new_v4().to_string(),
                    };
                    let result = call_with_retries(&self.retry, "release_driver", || {
                        self.services.driver_status.update_driver_status(release.clone())
                    })
                    .await;
                    self.emit_compensation("DriverReleased", &driver_id, result.map(|_| ()));
                }
                CompletedStep::RequestCreated { request_id, version } => {
                    let result = call_with_retries(&self.retry, "cancel_trip_request", || {
                        self.services.trip_requests.cancel_trip_request(&request_id, version)
                    })
                    .await;
                    self.emit_compensation("TripRequestCancelled", &request_id, result.map(|_| ()));
                }
            }
        }
    }

    fn emit_compensation(&self, event_type: &str, entity_id: &str, result: DomainResult<()>) {
        match result {
            Ok(()) => self.emit(TelemetryEvent::new(event_type, entity_id, self.clock.now())),
            Err(compensation_error) => {
                error!(entity_id, %compensation_error, "compensation step failed");
                self.emit(
                    TelemetryEvent::new("CompensationFailed", entity_id, self.clock.now())
                        .with("step", event_type)
                        .with("error", compensation_error.to_string()),
                );
            }
        }
    }

    fn emit(&self, event: TelemetryEvent) {
        self.telemetry.record(event);
    }
}

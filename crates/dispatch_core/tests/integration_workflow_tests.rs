mod support;

use std::sync::Arc;

use async_trait::async_trait;
use dispatch_core::api::{CreateTripCommand, DriverStatusApi, TripApi, TripRequestApi};
use dispatch_core::domain::{CancelReason, Trip, TripRequestStatus, TripStatus};
use dispatch_core::error::{DomainError, DomainResult};
use dispatch_core::workflow::{CreateTripOrder, WorkflowStage};
use support::Harness;

fn order() -> CreateTripOrder {
    CreateTripOrder::new("p1", support::origin(), support::destination()).with_seed(42)
}

#[tokio::test]
async fn happy_path_commits_a_trip_and_walks_the_lifecycle() {
    let harness = Harness::new();
    harness.seed_drivers(5);
    let workflow = harness.workflow();

    let trip = workflow.create_trip(order()).await.expect("trip");
    assert_eq!(trip.status, TripStatus::Accepted);
    assert_eq!(trip.driver_id, "driver_1");
    assert_eq!(trip.version, 1);

    // The matched driver is reserved and the request fulfilled.
    let driver = harness.drivers.get_driver_status("driver_1").await.expect("driver");
    assert!(!driver.available);
    let request = harness
        .trip_requests
        .get_trip_request(&trip.trip_request_id)
        .await
        .expect("request");
    assert_eq!(request.status, TripRequestStatus::Fulfilled);

    // ACCEPTED -> EN_ROUTE (v2) -> COMPLETED (v3).
    let en_route = harness
        .trips
        .update_trip_status(&trip.id, TripStatus::EnRoute, 1)
        .await
        .expect("en route");
    assert_eq!(en_route.version, 2);
    let completed = harness
        .trips
        .update_trip_status(&trip.id, TripStatus::Completed, 2)
        .await
        .expect("completed");
    assert_eq!(completed.version, 3);

    // One telemetry event per forward step.
    for event_type in [
        "TripRequestCreated",
        "DriverCandidatesFetched",
        "PriceCalculated",
        "DriverReserved",
        "TripCreated",
    ] {
        assert_eq!(harness.telemetry.count_of(event_type), 1, "{event_type}");
    }
}

#[tokio::test]
async fn duplicate_idempotency_key_replays_the_committed_trip() {
    let harness = Harness::new();
    harness.seed_drivers(5);
    let workflow = harness.workflow();

    let key_order = order().with_idempotency_key("wf-key-1");
    let first = workflow.create_trip(key_order.clone()).await.expect("trip");
    let requests_after_first = harness.trip_requests.request_count();

    let second = workflow.create_trip(key_order).await.expect("replay");
    assert_eq!(second.id, first.id);
    assert_eq!(harness.trip_requests.request_count(), requests_after_first);
    assert_eq!(harness.trips.trip_count(), 1);
    assert_eq!(harness.telemetry.count_of("WorkflowReplayed"), 1);
}

#[tokio::test]
async fn derived_keys_deduplicate_identical_orders() {
    let harness = Harness::new();
    harness.seed_drivers(5);
    let workflow = harness.workflow();

    let first = workflow.create_trip(order()).await.expect("trip");
    let second = workflow.create_trip(order()).await.expect("replay");
    assert_eq!(first.id, second.id);
    assert_eq!(harness.trips.trip_count(), 1);
}

/// Trip service stub that always fails at the commit point.
struct FailingTripService;

#[async_trait]
impl TripApi for FailingTripService {
    async fn create_trip(&self, _command: CreateTripCommand) -> DomainResult<Trip> {
        Err(DomainError::PricingRejected("injected commit failure".into()))
    }

    async fn update_trip_status(
        &self,
        trip_id: &str,
        _new_status: TripStatus,
        _expected_version: u64,
    ) -> DomainResult<Trip> {
        Err(DomainError::not_found("trip", trip_id))
    }

    async fn cancel_trip(
        &self,
        trip_id: &str,
        _reason: CancelReason,
        _expected_version: u64,
    ) -> DomainResult<Trip> {
        Err(DomainError::not_found("trip", trip_id))
    }

    async fn get_trip_by_id(&self, trip_id: &str) -> DomainResult<Trip> {
        Err(DomainError::not_found("trip", trip_id))
    }

    async fn get_trip_by_request_id(&self, trip_request_id: &str) -> DomainResult<Trip> {
        Err(DomainError::not_found("trip for request", trip_request_id))
    }
}

#[tokio::test]
async fn commit_failure_releases_the_driver_and_cancels_the_request() {
    let harness = Harness::new();
    harness.seed_drivers(5);
    let workflow = harness.workflow_with_trips(Arc::new(FailingTripService));

    let failure = workflow.create_trip(order()).await.expect_err("workflow fails");
    assert_eq!(failure.stage, WorkflowStage::CreateTrip);
    assert!(matches!(failure.source, DomainError::PricingRejected(_)));

    // Compensation ran in reverse: driver released, request cancelled.
    let driver = harness.drivers.get_driver_status("driver_1").await.expect("driver");
    assert!(driver.available);
    assert_eq!(driver.version, 3); // reserve bumped to 2, release to 3

    let requests = harness.trip_requests.request_count();
    assert_eq!(requests, 1);
    let events = harness.telemetry.events();
    let request_id = events
        .iter()
        .find(|event| event.event_type == "TripRequestCreated")
        .map(|event| event.entity_id.clone())
        .expect("request event");
    let request = harness.trip_requests.get_trip_request(&request_id).await.expect("request");
    assert_eq!(request.status, TripRequestStatus::Cancelled);

    assert_eq!(harness.telemetry.count_of("DriverReleased"), 1);
    assert_eq!(harness.telemetry.count_of("TripRequestCancelled"), 1);
    assert_eq!(harness.telemetry.count_of("CompensationFailed"), 0);

    // A failed workflow records nothing for its key: the next attempt
    // executes again instead of replaying the failure.
    assert_eq!(harness.telemetry.count_of("WorkflowReplayed"), 0);
}

#[tokio::test]
async fn empty_pool_fails_the_match_stage_and_cancels_the_request() {
    let harness = Harness::new(); // no drivers registered
    let workflow = harness.workflow();

    let failure = workflow.create_trip(order()).await.expect_err("workflow fails");
    assert_eq!(failure.stage, WorkflowStage::Match);
    assert!(matches!(failure.source, DomainError::Unavailable(_)));

    assert_eq!(harness.telemetry.count_of("TripRequestCancelled"), 1);
    assert_eq!(harness.telemetry.count_of("DriverReleased"), 0);
}

#[tokio::test]
async fn guardrail_violations_fail_the_price_stage_before_any_reservation() {
    let mut config = support::sample_config();
    config.default.commission_percent = 0.0;
    let harness = Harness::with_config(config);
    harness.seed_drivers(5);
    let workflow = harness.workflow();

    let failure = workflow.create_trip(order()).await.expect_err("workflow fails");
    assert_eq!(failure.stage, WorkflowStage::Price);
    assert!(matches!(failure.source, DomainError::EconomicGuardrail(_)));

    // The driver was never reserved.
    let driver = harness.drivers.get_driver_status("driver_1").await.expect("driver");
    assert!(driver.available);
    assert_eq!(driver.version, 1);
    assert_eq!(harness.telemetry.count_of("TripRequestCancelled"), 1);
}

#[tokio::test]
async fn rejected_config_reload_leaves_trip_creation_working() {
    // Scenario: an invalid reload was rejected, the prior config remains,
    // and trips keep pricing with the old rates.
    let harness = Harness::new();
    harness.seed_drivers(5);

    let mut broken = support::sample_config();
    broken.default.per_km_rate = 9.9;
    assert!(broken.validate().is_err());
    // The store never sees the broken config; the engine still serves v-test.

    let workflow = harness.workflow();
    let trip = workflow.create_trip(order()).await.expect("trip");
    assert_eq!(trip.status, TripStatus::Accepted);
}

//! Trip ownership: the state machine and pricing-gated creation.
//!
//! `create_trip` prices the trip synchronously before anything is persisted;
//! a pricing failure of any kind rejects the creation and leaves no trace.
//! Status changes run lock -> version check -> FSM check -> write, so an
//! observer can never see a version move without a legal transition.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::api::{CreateTripCommand, PricingApi, TripApi};
use crate::clock::Clock;
use crate::domain::{CancelReason, Trip, TripStatus};
use crate::error::{DomainError, DomainResult};
use crate::store::VersionedStore;

pub struct TripService {
    trips: VersionedStore<Trip>,
    by_request: DashMap<String, String>,
    pricing: Arc<dyn PricingApi>,
    clock: Arc<dyn Clock>,
}

impl TripService {
    pub fn new(pricing: Arc<dyn PricingApi>, clock: Arc<dyn Clock>) -> Self {
        Self {
            trips: VersionedStore::new(),
            by_request: DashMap::new(),
            pricing,
            clock,
        }
    }

    /// Number of trips ever created (for tests and diagnostics).
    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    fn transition(
        &self,
        trip_id: &str,
        target: TripStatus,
        expected_version: u64,
    ) -> DomainResult<Trip> {
        self.trips.update(trip_id, "trip", |trip| {
            if trip.version != expected_version {
                return Err(DomainError::version_conflict(
                    trip_id,
                    expected_version,
                    trip.version,
                ));
            }
            if !trip.status.can_transition_to(target) {
                return Err(DomainError::illegal_transition(
                    trip_id,
                    trip.status.as_str(),
                    target.as_str(),
                ));
            }
            trip.status = target;
            trip.version += 1;
            trip.updated_at = self.clock.now();
            Ok(trip.clone())
        })
    }
}

#[async_trait]
impl TripApi for TripService {
    async fn create_trip(&self, command: CreateTripCommand) -> DomainResult<Trip> {
        command.origin.validate()?;
        command.destination.validate()?;

        // Idempotency on the trip request: a second creation returns the
        // existing trip without re-pricing.
        let existing_id = self
            .by_request
            .get(&command.trip_request_id)
            .map(|entry| entry.value().clone());
        if let Some(trip_id) = existing_id {
            return self.get_trip_by_id(&trip_id).await;
        }

        // Price before taking any lock; rejection must leave no trip behind.
        self.pricing
            .calculate_price(command.price_request())
            .await
            .map_err(|error| DomainError::PricingRejected(error.to_string()))?;

        let now = self.clock.now();
        let trip = Trip {
            id: Uuid::new_v4().to_string(),
            trip_request_id: command.trip_request_id.clone(),
            passenger_id: command.passenger_id.clone(),
            driver_id: command.driver_id.clone(),
            origin: command.origin,
            destination: command.destination,
            status: TripStatus::Accepted,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        // A concurrent creation may have won the race while pricing ran; in
        // that case its trip is the one.
        let raced_id = match self.by_request.entry(command.trip_request_id.clone()) {
            Entry::Occupied(occupied) => Some(occupied.get().clone()),
            Entry::Vacant(vacant) => {
                self.trips.insert(&trip.id, trip.clone());
                vacant.insert(trip.id.clone());
                None
            }
        };
        match raced_id {
            Some(trip_id) => self.get_trip_by_id(&trip_id).await,
            None => Ok(trip),
        }
    }

    async fn update_trip_status(
        &self,
        trip_id: &str,
        new_status: TripStatus,
        expected_version: u64,
    ) -> DomainResult<Trip> {
        self.transition(trip_id, new_status, expected_version)
    }

    async fn cancel_trip(
        &self,
        trip_id: &str,
        reason: CancelReason,
        expected_version: u64,
    ) -> DomainResult<Trip> {
        self.transition(trip_id, reason.into(), expected_version)
    }

    async fn get_trip_by_id(&self, trip_id: &str) -> DomainResult<Trip> {
        self.trips
            .get(trip_id)
            .ok_or_else(|| DomainError::not_found("trip", trip_id))
    }

    async fn get_trip_by_request_id(&self, trip_request_id: &str) -> DomainResult<Trip> {
        let trip_id = self
            .by_request
            .get(trip_request_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DomainError::not_found("trip for request", trip_request_id))?;
        self.get_trip_by_id(&trip_id).await
    }
}

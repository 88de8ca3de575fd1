//! Trip request ownership: at most one OPEN request per passenger.
//!
//! The uniqueness invariant is enforced through a per-passenger entry lock
//! (the open-request index), taken before the record's own stripe lock on the
//! create path. Record mutations never wait on the index, so the two lock
//! levels cannot deadlock.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::api::{CreateTripRequestCommand, TripRequestApi};
use crate::clock::Clock;
use crate::domain::{TripRequest, TripRequestStatus};
use crate::error::{DomainError, DomainResult};
use crate::store::VersionedStore;

pub struct TripRequestService {
    requests: VersionedStore<TripRequest>,
    open_by_passenger: DashMap<String, String>,
    clock: Arc<dyn Clock>,
}

impl TripRequestService {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            requests: VersionedStore::new(),
            open_by_passenger: DashMap::new(),
            clock,
        }
    }

    /// Number of requests ever created (for tests and diagnostics).
    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    fn build_request(&self, command: &CreateTripRequestCommand) -> TripRequest {
        let now = self.clock.now();
        TripRequest {
            id: Uuid::new_v4().to_string(),
            passenger_id: command.passenger_id.clone(),
            origin: command.origin,
            destination: command.destination,
            status: TripRequestStatus::Open,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn close(
        &self,
        request_id: &str,
        expected_version: u64,
        target: TripRequestStatus,
    ) -> DomainResult<TripRequest> {
        let closed = self.requests.update(request_id, "trip request", |request| {
            if request.version != expected_version {
                return Err(DomainError::version_conflict(
                    request_id,
                    expected_version,
                    request.version,
                ));
            }
            if request.status != TripRequestStatus::Open {
                return Err(DomainError::illegal_transition(
                    request_id,
                    request.status.as_str(),
                    target.as_str(),
                ));
            }
            request.status = target;
            request.version += 1;
            request.updated_at = self.clock.now();
            Ok(request.clone())
        })?;

        // The record is closed; drop the open-index entry if it still points
        // here. A concurrent create for the same passenger re-checks the
        // record status, so a stale entry is harmless.
        self.open_by_passenger
            .remove_if(&closed.passenger_id, |_, id| id == request_id);
        Ok(closed)
    }
}

#[async_trait]
impl TripRequestApi for TripRequestService {
    async fn create_trip_request(
        &self,
        command: CreateTripRequestCommand,
    ) -> DomainResult<TripRequest> {
        command.origin.validate()?;
        command.destination.validate()?;
        if command.passenger_id.is_empty() {
            return Err(DomainError::InvalidArgument("passenger_id must be non-empty".into()));
        }

        let mut entry = self
            .open_by_passenger
            .entry(command.passenger_id.clone())
            .or_default();
        if let Some(existing) = self.requests.get(entry.value()) {
            if existing.status == TripRequestStatus::Open {
                return Ok(existing);
            }
        }
        let request = self.build_request(&command);
        self.requests.insert(&request.id, request.clone());
        *entry.value_mut() = request.id.clone();
        Ok(request)
    }

    async fn cancel_trip_request(
        &self,
        request_id: &str,
        expected_version: u64,
    ) -> DomainResult<TripRequest> {
        self.close(request_id, expected_version, TripRequestStatus::Cancelled)
    }

    async fn get_trip_request(&self, request_id: &str) -> DomainResult<TripRequest> {
        self.requests
            .get(request_id)
            .ok_or_else(|| DomainError::not_found("trip request", request_id))
    }

    async fn mark_fulfilled(
        &self,
        request_id: &str,
        expected_version: u64,
    ) -> DomainResult<TripRequest> {
        self.close(request_id, expected_version, TripRequestStatus::Fulfilled)
    }
}

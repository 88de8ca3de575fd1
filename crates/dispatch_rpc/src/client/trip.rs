use async_trait::async_trait;

use dispatch_core::api::{CreateTripCommand, TripApi};
use dispatch_core::domain::{CancelReason, Trip, TripStatus};
use dispatch_core::error::DomainResult;

use super::RpcClient;
use crate::endpoints::paths;
use crate::messages::{
    CancelTripBody, GetTripByIdBody, GetTripByRequestIdBody, UpdateTripStatusBody,
};

#[derive(Debug, Clone)]
pub struct TripClient {
    rpc: RpcClient,
}

impl TripClient {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl TripApi for TripClient {
    async fn create_trip(&self, command: CreateTripCommand) -> DomainResult<Trip> {
        self.rpc.post(paths::CREATE_TRIP, &command).await
    }

    async fn update_trip_status(
        &self,
        trip_id: &str,
        new_status: TripStatus,
        expected_version: u64,
    ) -> DomainResult<Trip> {
        let body = UpdateTripStatusBody {
            trip_id: trip_id.to_string(),
            new_status,
            expected_version,
        };
        self.rpc.post(paths::UPDATE_TRIP_STATUS, &body).await
    }

    async fn cancel_trip(
        &self,
        trip_id: &str,
        reason: CancelReason,
        expected_version: u64,
    ) -> DomainResult<Trip> {
        let body = CancelTripBody {
            trip_id: trip_id.to_string(),
            reason,
            expected_version,
        };
        self.rpc.post(paths::CANCEL_TRIP, &body).await
    }

    async fn get_trip_by_id(&self, trip_id: &str) -> DomainResult<Trip> {
        let body = GetTripByIdBody {
            trip_id: trip_id.to_string(),
        };
        self.rpc.post(paths::GET_TRIP_BY_ID, &body).await
    }

    async fn get_trip_by_request_id(&self, trip_request_id: &str) -> DomainResult<Trip> {
        let body = GetTripByRequestIdBody {
            trip_request_id: trip_request_id.to_string(),
        };
        self.rpc.post(paths::GET_TRIP_BY_REQUEST_ID, &body).await
    }
}

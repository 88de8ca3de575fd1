use async_trait::async_trait;

use dispatch_core::api::{CreateTripRequestCommand, TripRequestApi};
use dispatch_core::domain::TripRequest;
use dispatch_core::error::DomainResult;

use super::RpcClient;
use crate::endpoints::paths;
use crate::messages::{CancelTripRequestBody, GetTripRequestBody, MarkFulfilledBody};

#[derive(Debug, Clone)]
pub struct TripRequestClient {
    rpc: RpcClient,
}

impl TripRequestClient {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl TripRequestApi for TripRequestClient {
    async fn create_trip_request(
        &self,
        command: CreateTripRequestCommand,
    ) -> DomainResult<TripRequest> {
        self.rpc.post(paths::CREATE_TRIP_REQUEST, &command).await
    }

    async fn cancel_trip_request(
        &self,
        request_id: &str,
        expected_version: u64,
    ) -> DomainResult<TripRequest> {
        let body = CancelTripRequestBody {
            request_id: request_id.to_string(),
            expected_version,
        };
        self.rpc.post(paths::CANCEL_TRIP_REQUEST, &body).await
    }

    async fn get_trip_request(&self, request_id: &str) -> DomainResult<TripRequest> {
        let body = GetTripRequestBody {
            request_id: request_id.to_string(),
        };
        self.rpc.post(paths::GET_TRIP_REQUEST, &body).await
    }

    async fn mark_fulfilled(
        &self,
        request_id: &str,
        expected_version: u64,
    ) -> DomainResult<TripRequest> {
        let body = MarkFulfilledBody {
            request_id: request_id.to_string(),
            expected_version,
        };
        self.rpc.post(paths::MARK_FULFILLED, &body).await
    }
}

//! Wire messages that are not already defined by `dispatch_core::api`.
//!
//! Command structs from the core cross the wire as-is; the bodies here cover
//! operations whose trait signature takes loose arguments, plus the error
//! envelope and the workflow order.

use serde::{Deserialize, Serialize};

use dispatch_core::domain::{CancelReason, Location, TripStatus};
use dispatch_core::error::DomainError;
use dispatch_core::workflow::CreateTripOrder;

use crate::codes::transport_code;

/// Error envelope: the stable domain code, the transport code and a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub status: String,
    pub message: String,
}

impl ErrorBody {
    pub fn from_error(error: &DomainError) -> Self {
        Self {
            code: error.code().to_string(),
            status: transport_code(error).to_string(),
            message: error.to_string(),
        }
    }

    pub fn into_error(self) -> DomainError {
        DomainError::from_code(&self.code, self.message)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelTripRequestBody {
    pub request_id: String,
    pub expected_version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTripRequestBody {
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkFulfilledBody {
    pub request_id: String,
    pub expected_version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTripStatusBody {
    pub trip_id: String,
    pub new_status: TripStatus,
    pub expected_version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelTripBody {
    pub trip_id: String,
    pub reason: CancelReason,
    pub expected_version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTripByIdBody {
    pub trip_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTripByRequestIdBody {
    pub trip_request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDriverStatusBody {
    pub driver_id: String,
}

fn default_distance_meters() -> f64 {
    1000.0
}

fn default_duration_seconds() -> f64 {
    600.0
}

fn default_demand_multiplier() -> f64 {
    1.0
}

fn default_max_candidates() -> u32 {
    5
}

/// Workflow order as submitted by the gateway. Estimates default to the
/// reference values when the caller has no routing figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTripOrderBody {
    pub passenger_id: String,
    pub origin: Location,
    pub destination: Location,
    #[serde(default = "default_distance_meters")]
    pub estimated_distance_meters: f64,
    #[serde(default = "default_duration_seconds")]
    pub estimated_duration_seconds: f64,
    #[serde(default = "default_demand_multiplier")]
    pub demand_multiplier: f64,
    #[serde(default = "default_max_candidates")]
    pub max_candidates: u32,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub idempotency_key: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl From<CreateTripOrderBody> for CreateTripOrder {
    fn from(body: CreateTripOrderBody) -> Self {
        let mut order = CreateTripOrder::new(&body.passenger_id, body.origin, body.destination)
            .with_estimates(body.estimated_distance_meters, body.estimated_duration_seconds)
            .with_demand_multiplier(body.demand_multiplier);
        order.max_candidates = body.max_candidates;
        order.zone = body.zone;
        order.idempotency_key = body.idempotency_key;
        order.seed = body.seed;
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_round_trips_domain_errors() {
        let error = DomainError::version_conflict("trip-1", 1, 2);
        let body = ErrorBody::from_error(&error);
        assert_eq!(body.code, "VERSION_CONFLICT");
        assert_eq!(body.status, "aborted");
        assert_eq!(body.into_error(), error);
    }

    #[test]
    fn order_body_defaults_match_the_reference_estimates() {
        let body: CreateTripOrderBody = serde_json::from_str(
            r#"{"passenger_id":"p1","origin":{"lat":39.6,"lon":67.8},"destination":{"lat":39.65,"lon":67.85}}"#,
        )
        .expect("parse");
        let order = CreateTripOrder::from(body);
        assert_eq!(order.estimated_distance_meters, 1000.0);
        assert_eq!(order.estimated_duration_seconds, 600.0);
        assert_eq!(order.max_candidates, 5);
        assert_eq!(order.seed, None);
    }
}

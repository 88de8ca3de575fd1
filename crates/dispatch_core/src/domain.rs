//! Domain entities: locations, trip requests, trips and driver status.
//!
//! All entities carry a `version` starting at 1 that increments on every
//! successful mutation; state-changing operations require the caller's
//! `expected_version` to match. Status enums serialize in proto style
//! (`EN_ROUTE`, `CANCELLED_BY_DRIVER`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A geographic coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Reject non-finite or out-of-range coordinates at the boundary.
    pub fn validate(&self) -> DomainResult<()> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(DomainError::InvalidArgument(
                "location coordinates must be finite".into(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lon) {
            return Err(DomainError::InvalidArgument(format!(
                "location ({}, {}) outside valid coordinate range",
                self.lat, self.lon
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripRequestStatus {
    Open,
    Cancelled,
    Fulfilled,
}

impl TripRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripRequestStatus::Open => "OPEN",
            TripRequestStatus::Cancelled => "CANCELLED",
            TripRequestStatus::Fulfilled => "FULFILLED",
        }
    }
}

/// A passenger's declaration of intent prior to driver assignment.
///
/// At most one `OPEN` request exists per passenger at any time. Once a trip
/// references the request it becomes `FULFILLED` and immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub id: String,
    pub passenger_id: String,
    pub origin: Location,
    pub destination: Location,
    pub status: TripRequestStatus,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    Accepted,
    EnRoute,
    Completed,
    Cancelled,
    CancelledByDriver,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Accepted => "ACCEPTED",
            TripStatus::EnRoute => "EN_ROUTE",
            TripStatus::Completed => "COMPLETED",
            TripStatus::Cancelled => "CANCELLED",
            TripStatus::CancelledByDriver => "CANCELLED_BY_DRIVER",
        }
    }

    /// Terminal states are sinks: no transition leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TripStatus::Completed | TripStatus::Cancelled | TripStatus::CancelledByDriver
        )
    }

    /// The trip state machine. `ACCEPTED -> CANCELLED_BY_DRIVER` is kept
    /// alongside the generic `CANCELLED` edge; the reason choice belongs to
    /// the caller and the matrix is never widened.
    pub fn can_transition_to(&self, next: TripStatus) -> bool {
        match self {
            TripStatus::Accepted => matches!(
                next,
                TripStatus::EnRoute | TripStatus::Cancelled | TripStatus::CancelledByDriver
            ),
            TripStatus::EnRoute => {
                matches!(next, TripStatus::Completed | TripStatus::CancelledByDriver)
            }
            TripStatus::Completed | TripStatus::Cancelled | TripStatus::CancelledByDriver => false,
        }
    }
}

/// Cancellation reason accepted by `CancelTrip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelReason {
    Cancelled,
    CancelledByDriver,
}

impl From<CancelReason> for TripStatus {
    fn from(reason: CancelReason) -> Self {
        match reason {
            CancelReason::Cancelled => TripStatus::Cancelled,
            CancelReason::CancelledByDriver => TripStatus::CancelledByDriver,
        }
    }
}

/// A committed, in-progress or terminal ride between a passenger and a driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    /// Unique: exactly one trip exists per trip request.
    pub trip_request_id: String,
    pub passenger_id: String,
    pub driver_id: String,
    pub origin: Location,
    pub destination: Location,
    pub status: TripStatus,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Driver availability record with per-record version discipline.
///
/// `last_idempotency_key` makes availability updates safely retryable: a
/// repeated update with the same key is a no-op returning the current state.
/// Location and quality stats ride along for the matching pool and pricing
/// inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStatusRecord {
    pub driver_id: String,
    pub available: bool,
    pub version: u64,
    pub last_idempotency_key: Option<String>,
    pub location: Location,
    pub acceptance_rate: f64,
    pub rating: f64,
}

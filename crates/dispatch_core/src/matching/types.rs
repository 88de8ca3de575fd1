use serde::{Deserialize, Serialize};

use crate::domain::Location;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingRequest {
    pub trip_request_id: String,
    pub origin: Location,
    pub destination: Location,
    pub max_candidates: u32,
    pub seed: u64,
}

/// A driver visible to matching: id plus last known position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolDriver {
    pub driver_id: String,
    pub location: Location,
}

/// One ranked candidate. Probabilities across a result are non-negative and
/// sum to at most 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverCandidate {
    pub driver_id: String,
    pub probability: f64,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    NoDriversAvailable,
    MaxCandidatesZero,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::NoDriversAvailable => "NO_DRIVERS_AVAILABLE",
            ReasonCode::MaxCandidatesZero => "MAX_CANDIDATES_ZERO",
        }
    }
}

/// Result of a matching call: an ordered candidate list, or empty with the
/// reason it is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub candidates: Vec<DriverCandidate>,
    #[serde(default)]
    pub reason_code: Option<ReasonCode>,
}

impl MatchOutcome {
    pub fn of(candidates: Vec<DriverCandidate>) -> Self {
        Self {
            candidates,
            reason_code: None,
        }
    }

    pub fn empty(reason: ReasonCode) -> Self {
        Self {
            candidates: Vec::new(),
            reason_code: Some(reason),
        }
    }
}

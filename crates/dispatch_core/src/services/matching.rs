//! Candidate selection over the live driver pool.
//!
//! The service pairs a pool source (the driver status service) with a
//! pluggable ranking policy. Determinism is the service's contract; the
//! policy only decides the ordering criteria.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::MatchingApi;
use crate::error::DomainResult;
use crate::matching::{MatchOutcome, MatchingPolicy, MatchingRequest, ReasonCode};
use crate::services::DriverStatusService;

pub struct MatchingService {
    drivers: Arc<DriverStatusService>,
    policy: Box<dyn MatchingPolicy>,
}

impl MatchingService {
    pub fn new(drivers: Arc<DriverStatusService>, policy: Box<dyn MatchingPolicy>) -> Self {
        Self { drivers, policy }
    }

    fn candidates(&self, request: &MatchingRequest) -> MatchOutcome {
        if request.max_candidates == 0 {
            return MatchOutcome::empty(ReasonCode::MaxCandidatesZero);
        }
        let pool = self.drivers.available_drivers();
        if pool.is_empty() {
            return MatchOutcome::empty(ReasonCode::NoDriversAvailable);
        }
        let candidates = self.policy.rank(request, &pool);
        if candidates.is_empty() {
            return MatchOutcome::empty(ReasonCode::NoDriversAvailable);
        }
        MatchOutcome::of(candidates)
    }
}

#[async_trait]
impl MatchingApi for MatchingService {
    async fn get_candidates(&self, request: MatchingRequest) -> DomainResult<MatchOutcome> {
        request.origin.validate()?;
        request.destination.validate()?;
        Ok(self.candidates(&request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;
    use crate::matching::NearestDriverPolicy;

    fn service_with_drivers(count: usize) -> MatchingService {
        let drivers = Arc::new(DriverStatusService::new());
        for i in 1..=count {
            drivers
                .register_driver(
                    &format!("d{i}"),
                    Location::new(39.60 + i as f64 * 0.01, 67.80 + i as f64 * 0.01),
                    0.9,
                    4.8,
                )
                .expect("register");
        }
        MatchingService::new(drivers, Box::new(NearestDriverPolicy))
    }

    fn request(max_candidates: u32) -> MatchingRequest {
        MatchingRequest {
            trip_request_id: "req-1".to_string(),
            origin: Location::new(39.60, 67.80),
            destination: Location::new(39.65, 67.85),
            max_candidates,
            seed: 42,
        }
    }

    #[tokio::test]
    async fn zero_max_candidates_is_empty_with_reason() {
        let service = service_with_drivers(3);
        let outcome = service.get_candidates(request(0)).await.expect("outcome");
        assert!(outcome.candidates.is_empty());
        assert_eq!(outcome.reason_code, Some(ReasonCode::MaxCandidatesZero));
    }

    #[tokio::test]
    async fn empty_pool_reports_no_drivers() {
        let service = service_with_drivers(0);
        let outcome = service.get_candidates(request(5)).await.expect("outcome");
        assert!(outcome.candidates.is_empty());
        assert_eq!(outcome.reason_code, Some(ReasonCode::NoDriversAvailable));
    }

    #[tokio::test]
    async fn repeated_calls_are_deterministic() {
        let service = service_with_drivers(5);
        let first = service.get_candidates(request(3)).await.expect("outcome");
        let second = service.get_candidates(request(3)).await.expect("outcome");
        assert_eq!(first, second);
        assert_eq!(first.candidates.len(), 3);
        assert_eq!(first.reason_code, None);
    }
}

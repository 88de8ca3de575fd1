use super::policy::MatchingPolicy;
use super::types::{DriverCandidate, MatchingRequest, PoolDriver};
use crate::spatial::distance_km;

/// Distance-ranked policy: closest driver to the pickup first, ties broken by
/// driver id ascending. Probabilities are inverse-distance weights normalized
/// over the returned candidates.
#[derive(Debug, Default)]
pub struct NearestDriverPolicy;

impl MatchingPolicy for NearestDriverPolicy {
    fn rank(&self, request: &MatchingRequest, pool: &[PoolDriver]) -> Vec<DriverCandidate> {
        let mut scored: Vec<(f64, &PoolDriver)> = pool
            .iter()
            .map(|driver| (distance_km(request.origin, driver.location), driver))
            .collect();
        scored.sort_by(|(a_dist, a), (b_dist, b)| {
            a_dist
                .total_cmp(b_dist)
                .then_with(|| a.driver_id.cmp(&b.driver_id))
        });
        scored.truncate(request.max_candidates as usize);

        let weights: Vec<f64> = scored
            .iter()
            .map(|(distance, _)| 1.0 / (1.0 + distance))
            .collect();
        let total: f64 = weights.iter().sum();

        scored
            .into_iter()
            .zip(weights)
            .map(|((_, driver), weight)| DriverCandidate {
                driver_id: driver.driver_id.clone(),
                probability: if total > 0.0 { weight / total } else { 0.0 },
                location: driver.location,
            })
            .collect()
    }
}

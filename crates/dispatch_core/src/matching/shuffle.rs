use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::policy::MatchingPolicy;
use super::types::{DriverCandidate, MatchingRequest, PoolDriver};

/// Seeded-shuffle policy: a uniform random draw from the pool, reproducible
/// from the request's seed. Probabilities are uniform at
/// `1 / max_candidates`, so a short pool sums below 1.
#[derive(Debug, Default)]
pub struct SeededShufflePolicy;

impl MatchingPolicy for SeededShufflePolicy {
    fn rank(&self, request: &MatchingRequest, pool: &[PoolDriver]) -> Vec<DriverCandidate> {
        if request.max_candidates == 0 {
            return Vec::new();
        }

        // Sort by id before shuffling so the outcome depends on the pool as
        // a set, not on the order the caller assembled it in.
        let mut drivers: Vec<&PoolDriver> = pool.iter().collect();
        drivers.sort_by(|a, b| a.driver_id.cmp(&b.driver_id));

        let mut rng = StdRng::seed_from_u64(request.seed);
        drivers.shuffle(&mut rng);
        drivers.truncate(request.max_candidates as usize);

        let probability = 1.0 / request.max_candidates as f64;
        drivers
            .into_iter()
            .map(|driver| DriverCandidate {
                driver_id: driver.driver_id.clone(),
                probability,
                location: driver.location,
            })
            .collect()
    }
}

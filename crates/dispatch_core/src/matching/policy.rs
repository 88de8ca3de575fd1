use super::types::{DriverCandidate, MatchingRequest, PoolDriver};

/// Trait for candidate-selection policies.
///
/// A policy ranks the visible driver pool for one request and assigns
/// selection probabilities. Two calls with identical `(request, seed, pool)`
/// must return identical ordered lists; any randomness is derived from the
/// request's seed, never from a global RNG.
///
/// # Arguments
///
/// * `request` - the matching request, including `max_candidates` and `seed`
/// * `pool` - the drivers currently available, in no particular order
///
/// # Returns
///
/// Up to `max_candidates` candidates, best first. An empty pool or a zero
/// `max_candidates` yields an empty list; the service attaches the reason.
pub trait MatchingPolicy: Send + Sync {
    fn rank(&self, request: &MatchingRequest, pool: &[PoolDriver]) -> Vec<DriverCandidate>;
}

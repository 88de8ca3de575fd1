//! Matching: pluggable strategies for selecting candidate drivers.
//!
//! This module provides a trait-based system for implementing different
//! candidate-selection policies. The invariants are determinism and the seed
//! contract, not the policy itself:
//!
//! - Identical `(request, seed, pool)` returns an identical ordered list
//! - Probabilities are non-negative and sum to at most 1
//! - An empty result carries a reason code
//!
//! ## Implementations
//!
//! - `NearestDriverPolicy`: distance-ranked, ties broken by driver id
//! - `SeededShufflePolicy`: uniform draw reproducible from the seed

pub mod nearest;
pub mod policy;
pub mod shuffle;
pub mod types;

pub use nearest::NearestDriverPolicy;
pub use policy::MatchingPolicy;
pub use shuffle::SeededShufflePolicy;
pub use types::{DriverCandidate, MatchOutcome, MatchingRequest, PoolDriver, ReasonCode};

//! The RPC service implementations.
//!
//! Each service owns its entities outright: all mutations to a single record
//! go through a per-entity lock and a compare-and-set on the version field,
//! which yields linearizable single-entity updates without any cross-entity
//! coordination.

pub mod driver_status;
pub mod matching;
pub mod trip;
pub mod trip_request;

pub use driver_status::DriverStatusService;
pub use matching::MatchingService;
pub use trip::TripService;
pub use trip_request::TripRequestService;

//! # Trip Orchestration Core
//!
//! The control plane of a ride-hailing platform: passengers submit trip
//! requests, the platform matches a driver, prices the trip, reserves the
//! driver and tracks the trip through its lifecycle.
//!
//! ## Overview
//!
//! This crate provides the domain logic, free of any transport concerns:
//!
//! - **Pricing**: hot-reloadable YAML configuration with zone overrides,
//!   time-of-day surge, A/B variants and cash-denomination rounding
//! - **Matching**: pluggable driver-selection policies, deterministic in a
//!   caller-supplied seed
//! - **Services**: trip requests, trips and driver availability, each with
//!   optimistic version control and per-entity locking
//! - **Workflow**: the saga orchestrator that turns a passenger request into
//!   a committed trip, with idempotency, retries, timeouts and compensation
//!
//! ## Key Concepts
//!
//! - **Optimistic concurrency**: every mutation carries an `expected_version`
//!   and fails cleanly with a version conflict instead of blocking
//! - **Deterministic**: anywhere randomness is user-visible (candidate order,
//!   A/B bucketing) the seed is an input, never an implicit global RNG
//! - **Compensation**: partial workflow progress is undone in reverse order;
//!   a compensation failure never stops the remaining rollback steps
//!
//! ## Example
//!
//! ```rust,no_run
//! use dispatch_core::workflow::{CreateTripOrder, TripWorkflow};
//! use dispatch_core::domain::Location;
//!
//! # async fn run(workflow: TripWorkflow) {
//! let order = CreateTripOrder::new(
//!     "passenger-1",
//!     Location::new(39.60, 67.80),
//!     Location::new(39.65, 67.85),
//! );
//! let _trip = workflow.create_trip(order).await;
//! # }
//! ```

pub mod api;
pub mod clock;
pub mod domain;
pub mod error;
pub mod matching;
pub mod pricing;
pub mod services;
pub mod spatial;
pub mod store;
pub mod telemetry;
pub mod workflow;

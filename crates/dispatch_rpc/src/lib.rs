//! JSON/HTTP transport for the trip orchestration services.
//!
//! Each service gets an axum router with one `POST` route per operation and
//! a reqwest client implementing the same trait as the in-process service,
//! so a deployment can place any service in-process or behind a wire without
//! touching the orchestrator. Domain errors travel as
//! `{code, status, message}` envelopes with the transport mapping of
//! [`codes`].

pub mod client;
pub mod codes;
pub mod endpoints;
pub mod messages;
pub mod server;

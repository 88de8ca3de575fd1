//! Thin HTTP clients for the services.
//!
//! Each client implements the same `dispatch_core::api` trait as the
//! in-process service it fronts. Transport failures map to the transient
//! error kinds (`UNAVAILABLE`, `DEADLINE_EXCEEDED`), so the orchestrator's
//! retry classification works identically across deployments.

pub mod driver_status;
pub mod matching;
pub mod pricing;
pub mod trip;
pub mod trip_request;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use dispatch_core::error::{DomainError, DomainResult};

use crate::messages::ErrorBody;

pub use driver_status::DriverStatusClient;
pub use matching::MatchingClient;
pub use pricing::PricingClient;
pub use trip::TripClient;
pub use trip_request::TripRequestClient;

/// Shared request plumbing: one base URL, one per-request deadline.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    base: String,
}

impl RpcClient {
    pub fn new(base: &str, timeout: Duration) -> DomainResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| DomainError::Unavailable(format!("failed to build client: {error}")))?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) async fn post<Req, Resp>(&self, path: &str, body: &Req) -> DomainResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|error| transport_error(&url, error))?;

        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|error| DomainError::Unavailable(format!("invalid response from {url}: {error}")));
        }

        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(envelope) => Err(envelope.into_error()),
            Err(_) => Err(DomainError::Unavailable(format!("{url} answered {status}"))),
        }
    }
}

fn transport_error(url: &str, error: reqwest::Error) -> DomainError {
    if error.is_timeout() {
        DomainError::DeadlineExceeded(format!("request to {url} timed out"))
    } else {
        DomainError::Unavailable(format!("request to {url} failed: {error}"))
    }
}

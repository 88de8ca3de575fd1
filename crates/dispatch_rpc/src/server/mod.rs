//! Axum routers, one per service.
//!
//! Handlers take the service trait object as state, so the same router can
//! front an in-process service or a proxy. Responses are the domain payload
//! on success and the [`ErrorBody`] envelope with the mapped HTTP status on
//! failure.

pub mod driver_status;
pub mod matching;
pub mod pricing;
pub mod trip;
pub mod trip_request;
pub mod workflow;

use std::net::SocketAddr;

use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;

use dispatch_core::error::{DomainError, DomainResult};

use crate::codes::http_status;
use crate::messages::ErrorBody;

pub use driver_status::driver_status_router;
pub use matching::matching_router;
pub use pricing::pricing_router;
pub use trip::trip_router;
pub use trip_request::trip_request_router;
pub use workflow::workflow_router;

pub(crate) fn respond<T: Serialize>(result: DomainResult<T>) -> Response {
    match result {
        Ok(value) => Json(value).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) fn error_response(error: &DomainError) -> Response {
    (http_status(error), Json(ErrorBody::from_error(error))).into_response()
}

pub(crate) async fn health() -> &'static str {
    "ok"
}

/// Bind a listener, reporting the actual address (port 0 picks one).
pub async fn bind(addr: SocketAddr) -> std::io::Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    Ok((listener, local_addr))
}

pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    axum::serve(listener, router).await
}

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use dispatch_core::workflow::TripWorkflow;

use super::health;
use crate::codes::http_status;
use crate::endpoints::paths;
use crate::messages::{CreateTripOrderBody, ErrorBody};

pub fn workflow_router(workflow: Arc<TripWorkflow>) -> Router {
    Router::new()
        .route(paths::HEALTH, get(health))
        .route(paths::CREATE_TRIP, post(create_trip))
        .with_state(workflow)
}

async fn create_trip(
    State(workflow): State<Arc<TripWorkflow>>,
    Json(body): Json<CreateTripOrderBody>,
) -> Response {
    match workflow.create_trip(body.into()).await {
        Ok(trip) => Json(trip).into_response(),
        Err(failure) => {
            // The envelope keeps the source code; the message names the
            // failed stage.
            let status = http_status(&failure.source);
            let mut envelope = ErrorBody::from_error(&failure.source);
            envelope.message = failure.to_string();
            (status, Json(envelope)).into_response()
        }
    }
}

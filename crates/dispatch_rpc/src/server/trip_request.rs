use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};

use dispatch_core::api::{CreateTripRequestCommand, TripRequestApi};

use super::{health, respond};
use crate::endpoints::paths;
use crate::messages::{CancelTripRequestBody, GetTripRequestBody, MarkFulfilledBody};

pub fn trip_request_router(api: Arc<dyn TripRequestApi>) -> Router {
    Router::new()
        .route(paths::HEALTH, get(health))
        .route(paths::CREATE_TRIP_REQUEST, post(create_trip_request))
        .route(paths::CANCEL_TRIP_REQUEST, post(cancel_trip_request))
        .route(paths::GET_TRIP_REQUEST, post(get_trip_request))
        .route(paths::MARK_FULFILLED, post(mark_fulfilled))
        .with_state(api)
}

async fn create_trip_request(
    State(api): State<Arc<dyn TripRequestApi>>,
    Json(command): Json<CreateTripRequestCommand>,
) -> Response {
    respond(api.create_trip_request(command).await)
}

async fn cancel_trip_request(
    State(api): State<Arc<dyn TripRequestApi>>,
    Json(body): Json<CancelTripRequestBody>,
) -> Response {
    respond(api.cancel_trip_request(&body.request_id, body.expected_version).await)
}

async fn get_trip_request(
    State(api): State<Arc<dyn TripRequestApi>>,
    Json(body): Json<GetTripRequestBody>,
) -> Response {
    respond(api.get_trip_request(&body.request_id).await)
}

async fn mark_fulfilled(
    State(api): State<Arc<dyn TripRequestApi>>,
    Json(body): Json<MarkFulfilledBody>,
) -> Response {
    respond(api.mark_fulfilled(&body.request_id, body.expected_version).await)
}

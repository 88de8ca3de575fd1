use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};

use dispatch_core::api::{CreateTripCommand, TripApi};

use super::{health, respond};
use crate::endpoints::paths;
use crate::messages::{
    CancelTripBody, GetTripByIdBody, GetTripByRequestIdBody, UpdateTripStatusBody,
};

pub fn trip_router(api: Arc<dyn TripApi>) -> Router {
    Router::new()
        .route(paths::HEALTH, get(health))
        .route(paths::CREATE_TRIP, post(create_trip))
        .route(paths::UPDATE_TRIP_STATUS, post(update_trip_status))
        .route(paths::CANCEL_TRIP, post(cancel_trip))
        .route(paths::GET_TRIP_BY_ID, post(get_trip_by_id))
        .route(paths::GET_TRIP_BY_REQUEST_ID, post(get_trip_by_request_id))
        .with_state(api)
}

async fn create_trip(
    State(api): State<Arc<dyn TripApi>>,
    Json(command): Json<CreateTripCommand>,
) -> Response {
    respond(api.create_trip(command).await)
}

async fn update_trip_status(
    State(api): State<Arc<dyn TripApi>>,
    Json(body): Json<UpdateTripStatusBody>,
) -> Response {
    respond(
        api.update_trip_status(&body.trip_id, body.new_status, body.expected_version)
            .await,
    )
}

async fn cancel_trip(
    State(api): State<Arc<dyn TripApi>>,
    Json(body): Json<CancelTripBody>,
) -> Response {
    respond(api.cancel_trip(&body.trip_id, body.reason, body.expected_version).await)
}

async fn get_trip_by_id(
    State(api): State<Arc<dyn TripApi>>,
    Json(body): Json<GetTripByIdBody>,
) -> Response {
    respond(api.get_trip_by_id(&body.trip_id).await)
}

async fn get_trip_by_request_id(
    State(api): State<Arc<dyn TripApi>>,
    Json(body): Json<GetTripByRequestIdBody>,
) -> Response {
    respond(api.get_trip_by_request_id(&body.trip_request_id).await)
}

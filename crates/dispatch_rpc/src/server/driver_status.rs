use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};

use dispatch_core::api::{DriverStatusApi, RegisterDriverCommand, UpdateDriverStatusCommand};

use super::{health, respond};
use crate::endpoints::paths;
use crate::messages::GetDriverStatusBody;

pub fn driver_status_router(api: Arc<dyn DriverStatusApi>) -> Router {
    Router::new()
        .route(paths::HEALTH, get(health))
        .route(paths::UPDATE_DRIVER_STATUS, post(update_driver_status))
        .route(paths::GET_DRIVER_STATUS, post(get_driver_status))
        .route(paths::REGISTER_DRIVER, post(register_driver))
        .with_state(api)
}

async fn update_driver_status(
    State(api): State<Arc<dyn DriverStatusApi>>,
    Json(command): Json<UpdateDriverStatusCommand>,
) -> Response {
    respond(api.update_driver_status(command).await)
}

async fn get_driver_status(
    State(api): State<Arc<dyn DriverStatusApi>>,
    Json(body): Json<GetDriverStatusBody>,
) -> Response {
    respond(api.get_driver_status(&body.driver_id).await)
}

async fn register_driver(
    State(api): State<Arc<dyn DriverStatusApi>>,
    Json(command): Json<RegisterDriverCommand>,
) -> Response {
    respond(api.register_driver(command).await)
}

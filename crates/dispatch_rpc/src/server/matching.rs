use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};

use dispatch_core::api::MatchingApi;
use dispatch_core::matching::MatchingRequest;

use super::{health, respond};
use crate::endpoints::paths;

pub fn matching_router(api: Arc<dyn MatchingApi>) -> Router {
    Router::new()
        .route(paths::HEALTH, get(health))
        .route(paths::GET_CANDIDATES, post(get_candidates))
        .with_state(api)
}

async fn get_candidates(
    State(api): State<Arc<dyn MatchingApi>>,
    Json(request): Json<MatchingRequest>,
) -> Response {
    respond(api.get_candidates(request).await)
}

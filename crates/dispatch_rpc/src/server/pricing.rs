use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};

use dispatch_core::api::PricingApi;
use dispatch_core::pricing::{PriceCalculationRequest, PricingConfig};

use super::{health, respond};
use crate::endpoints::paths;

pub fn pricing_router(api: Arc<dyn PricingApi>) -> Router {
    Router::new()
        .route(paths::HEALTH, get(health))
        .route(paths::CALCULATE_PRICE, post(calculate_price))
        .route(paths::GET_FALLBACK_CONFIG, post(get_fallback_config))
        .route(paths::UPDATE_FALLBACK_CONFIG, post(update_fallback_config))
        .with_state(api)
}

async fn calculate_price(
    State(api): State<Arc<dyn PricingApi>>,
    Json(request): Json<PriceCalculationRequest>,
) -> Response {
    respond(api.calculate_price(request).await)
}

async fn get_fallback_config(State(api): State<Arc<dyn PricingApi>>) -> Response {
    respond(api.get_fallback_config().await)
}

async fn update_fallback_config(
    State(api): State<Arc<dyn PricingApi>>,
    Json(config): Json<PricingConfig>,
) -> Response {
    respond(api.update_fallback_config(config).await)
}

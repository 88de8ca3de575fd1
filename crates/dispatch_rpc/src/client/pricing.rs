use async_trait::async_trait;

use dispatch_core::api::PricingApi;
use dispatch_core::error::DomainResult;
use dispatch_core::pricing::{PriceCalculationRequest, PriceQuote, PricingConfig};

use super::RpcClient;
use crate::endpoints::paths;

#[derive(Debug, Clone)]
pub struct PricingClient {
    rpc: RpcClient,
}

impl PricingClient {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl PricingApi for PricingClient {
    async fn calculate_price(&self, request: PriceCalculationRequest) -> DomainResult<PriceQuote> {
        self.rpc.post(paths::CALCULATE_PRICE, &request).await
    }

    async fn get_fallback_config(&self) -> DomainResult<Option<PricingConfig>> {
        self.rpc
            .post(paths::GET_FALLBACK_CONFIG, &serde_json::json!({}))
            .await
    }

    async fn update_fallback_config(&self, config: PricingConfig) -> DomainResult<()> {
        self.rpc.post(paths::UPDATE_FALLBACK_CONFIG, &config).await
    }
}

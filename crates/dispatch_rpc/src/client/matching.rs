use async_trait::async_trait;

use dispatch_core::api::MatchingApi;
use dispatch_core::error::DomainResult;
use dispatch_core::matching::{MatchOutcome, MatchingRequest};

use super::RpcClient;
use crate::endpoints::paths;

#[derive(Debug, Clone)]
pub struct MatchingClient {
    rpc: RpcClient,
}

impl MatchingClient {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl MatchingApi for MatchingClient {
    async fn get_candidates(&self, request: MatchingRequest) -> DomainResult<MatchOutcome> {
        self.rpc.post(paths::GET_CANDIDATES, &request).await
    }
}

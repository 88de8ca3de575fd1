use async_trait::async_trait;

use dispatch_core::api::{DriverStatusApi, RegisterDriverCommand, UpdateDriverStatusCommand};
use dispatch_core::domain::DriverStatusRecord;
use dispatch_core::error::DomainResult;

use super::RpcClient;
use crate::endpoints::paths;
use crate::messages::GetDriverStatusBody;

#[derive(Debug, Clone)]
pub struct DriverStatusClient {
    rpc: RpcClient,
}

impl DriverStatusClient {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl DriverStatusApi for DriverStatusClient {
    async fn update_driver_status(
        &self,
        command: UpdateDriverStatusCommand,
    ) -> DomainResult<DriverStatusRecord> {
        self.rpc.post(paths::UPDATE_DRIVER_STATUS, &command).await
    }

    async fn get_driver_status(&self, driver_id: &str) -> DomainResult<DriverStatusRecord> {
        let body = GetDriverStatusBody {
            driver_id: driver_id.to_string(),
        };
        self.rpc.post(paths::GET_DRIVER_STATUS, &body).await
    }

    async fn register_driver(
        &self,
        command: RegisterDriverCommand,
    ) -> DomainResult<DriverStatusRecord> {
        self.rpc.post(paths::REGISTER_DRIVER, &command).await
    }
}

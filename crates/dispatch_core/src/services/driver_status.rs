//! Driver availability with optimistic version control.
//!
//! Reserving a driver flips `available` to false under a compare-and-set on
//! the record version; an unavailable driver cannot be reserved again. Each
//! record remembers the last idempotency key applied, so a retried update is
//! a no-op returning the current state instead of a second mutation.

use async_trait::async_trait;

use crate::api::{DriverStatusApi, RegisterDriverCommand, UpdateDriverStatusCommand};
use crate::domain::{DriverStatusRecord, Location};
use crate::error::{DomainError, DomainResult};
use crate::matching::PoolDriver;
use crate::store::VersionedStore;

#[derive(Default)]
pub struct DriverStatusService {
    records: VersionedStore<DriverStatusRecord>,
}

impl DriverStatusService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a driver into the pool, available at version 1. Registering an
    /// existing driver returns the current record unchanged.
    pub fn register_driver(
        &self,
        driver_id: &str,
        location: Location,
        acceptance_rate: f64,
        rating: f64,
    ) -> DomainResult<DriverStatusRecord> {
        location.validate()?;
        let record = DriverStatusRecord {
            driver_id: driver_id.to_string(),
            available: true,
            version: 1,
            last_idempotency_key: None,
            location,
            acceptance_rate,
            rating,
        };
        if self.records.insert(driver_id, record.clone()) {
            return Ok(record);
        }
        self.records
            .get(driver_id)
            .ok_or_else(|| DomainError::not_found("driver", driver_id))
    }

    /// Snapshot of drivers currently visible to matching.
    pub fn available_drivers(&self) -> Vec<PoolDriver> {
        let mut pool: Vec<PoolDriver> = self
            .records
            .values()
            .into_iter()
            .filter(|record| record.available)
            .map(|record| PoolDriver {
                driver_id: record.driver_id,
                location: record.location,
            })
            .collect();
        pool.sort_by(|a, b| a.driver_id.cmp(&b.driver_id));
        pool
    }

    fn apply_update(&self, command: &UpdateDriverStatusCommand) -> DomainResult<DriverStatusRecord> {
        self.records.update(&command.driver_id, "driver", |record| {
            // Replay of a previously applied update: answer with the state
            // that first application produced.
            if record.last_idempotency_key.as_deref() == Some(command.idempotency_key.as_str()) {
                return Ok(record.clone());
            }
            if record.version != command.expected_version {
                return Err(DomainError::version_conflict(
                    &command.driver_id,
                    command.expected_version,
                    record.version,
                ));
            }
            if !command.available && !record.available {
                return Err(DomainError::illegal_transition(
                    &command.driver_id,
                    "UNAVAILABLE",
                    "UNAVAILABLE",
                ));
            }
            record.available = command.available;
            record.version += 1;
            record.last_idempotency_key = Some(command.idempotency_key.clone());
            Ok(record.clone())
        })
    }
}

#[async_trait]
impl DriverStatusApi for DriverStatusService {
    async fn update_driver_status(
        &self,
        command: UpdateDriverStatusCommand,
    ) -> DomainResult<DriverStatusRecord> {
        self.apply_update(&command)
    }

    async fn get_driver_status(&self, driver_id: &str) -> DomainResult<DriverStatusRecord> {
        self.records
            .get(driver_id)
            .ok_or_else(|| DomainError::not_found("driver", driver_id))
    }

    async fn register_driver(
        &self,
        command: RegisterDriverCommand,
    ) -> DomainResult<DriverStatusRecord> {
        DriverStatusService::register_driver(
            self,
            &command.driver_id,
            command.location,
            command.acceptance_rate,
            command.rating,
        )
    }
}

//! Telemetry: one event per workflow forward step and compensation outcome.
//!
//! Events are kept in memory for inspection and mirrored to `tracing` for
//! operators; durable sinks live outside this crate.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryEvent {
    pub event_type: String,
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: BTreeMap<String, String>,
}

impl TelemetryEvent {
    pub fn new(event_type: &str, entity_id: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_type: event_type.to_string(),
            entity_id: entity_id.to_string(),
            timestamp,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// Collects emitted events. Insert one per process and share it.
#[derive(Debug, Default)]
pub struct TelemetryRecorder {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: TelemetryEvent) {
        tracing::info!(
            target: "telemetry",
            event_type = %event.event_type,
            entity_id = %event.entity_id,
            metadata = ?event.metadata,
            "telemetry event"
        );
        self.events.lock().push(event);
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().clone()
    }

    pub fn count_of(&self, event_type: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| event.event_type == event_type)
            .count()
    }
}

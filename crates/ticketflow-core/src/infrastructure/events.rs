//! Event publisher adapters

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use crate::domain::events::DomainEvent;
use crate::ports::outbound::{EventPublisher, RepositoryError};

/// Emits every domain event as a structured `tracing` event.
#[derive(Default)]
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        for event in &events {
            info!(
                target: "ticketflow::events",
                event_type = event.event_type(),
                aggregate_id = %event.aggregate_id(),
                detail = ?event,
                "domain event"
            );
        }
        Ok(())
    }
}

/// No-op event publisher
#[derive(Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Keeps published events in memory so callers can inspect them.
#[derive(Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.events().iter().map(DomainEvent::event_type).collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        self.events
            .lock()
            .map_err(|_| RepositoryError::Storage("event log poisoned".to_string()))?
            .extend(events);
        Ok(())
    }
}

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::event::DomainEvent;

// ============================================================================
// Mediator - In-process Publish/Subscribe
// ============================================================================
//
// Maps an event name to an ordered list of handlers. Publishing calls every
// handler registered for the event's name, one after another, in subscription
// order. The first failing handler stops delivery for that publish call.
//
// Constructed explicitly at startup and shared (Arc) with every unit of work.
//
// ============================================================================

#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &dyn DomainEvent) -> anyhow::Result<()>;
}

#[derive(Debug, thiserror::Error)]
#[error("handler #{handler_index} for '{event_name}' (event {event_id}) failed: {source}")]
pub struct PublishError {
    pub event_name: &'static str,
    pub event_id: Uuid,
    pub handler_index: usize,
    #[source]
    pub source: anyhow::Error,
}

#[derive(Default)]
pub struct Mediator {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
}

impl Mediator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for each of `event_names`.
    pub async fn subscribe(&self, handler: Arc<dyn EventHandler>, event_names: &[&str]) {
        let mut handlers = self.handlers.write().await;

        for name in event_names {
            handlers
                .entry((*name).to_string())
                .or_default()
                .push(handler.clone());

            tracing::debug!(event_name = %name, "Subscribed event handler");
        }
    }

    pub async fn publish(&self, event: &dyn DomainEvent) -> Result<(), PublishError> {
        // Snapshot the handler list so no lock is held while handlers run.
        let handlers = {
            let registry = self.handlers.read().await;
            registry.get(event.event_name()).cloned().unwrap_or_default()
        };

        if handlers.is_empty() {
            tracing::debug!(
                event_name = event.event_name(),
                event_id = %event.event_id(),
                "No handlers subscribed for event"
            );
            return Ok(());
        }

        for (index, handler) in handlers.iter().enumerate() {
            handler.handle(event).await.map_err(|source| PublishError {
                event_name: event.event_name(),
                event_id: event.event_id(),
                handler_index: index,
                source,
            })?;
        }

        tracing::debug!(
            event_name = event.event_name(),
            event_id = %event.event_id(),
            handler_count = handlers.len(),
            "Published domain event"
        );

        Ok(())
    }

    pub async fn handler_count(&self, event_name: &str) -> usize {
        self.handlers
            .read()
            .await
            .get(event_name)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

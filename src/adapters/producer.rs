use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ddd::serialize_event;
use crate::domain::order::{OrderStatus, OrderStatusChanged};
use crate::ports::OrderStatusProducer;

// ============================================================================
// Order Status Producer
// ============================================================================
//
// Maps the domain event to the integration event published for other
// services: only the order id and its new status leave the process, keyed by
// order id so every change of one order lands on the same partition.
//
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusChangedIntegrationEvent {
    pub order_id: String,
    pub order_status: OrderStatus,
}

impl From<&OrderStatusChanged> for OrderStatusChangedIntegrationEvent {
    fn from(event: &OrderStatusChanged) -> Self {
        Self {
            order_id: event.order_id.to_string(),
            order_status: event.status,
        }
    }
}

pub struct TracingOrderProducer {
    topic: String,
}

impl TracingOrderProducer {
    pub fn new(topic: impl Into<String>) -> anyhow::Result<Self> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            anyhow::bail!("producer topic is required");
        }
        Ok(Self { topic })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Record key and JSON payload for `event`.
    pub fn encode(event: &OrderStatusChanged) -> anyhow::Result<(String, String)> {
        let payload = serialize_event(&OrderStatusChangedIntegrationEvent::from(event))?;
        Ok((event.order_id.to_string(), payload))
    }
}

#[async_trait]
impl OrderStatusProducer for TracingOrderProducer {
    async fn publish(&self, event: &OrderStatusChanged) -> anyhow::Result<()> {
        let (key, payload) = Self::encode(event)?;

        tracing::info!(
            topic = %self.topic,
            key = %key,
            payload = %payload,
            "📤 Published order status change"
        );
        Ok(())
    }
}

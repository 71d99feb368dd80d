use async_trait::async_trait;

use crate::domain::order::OrderStatusChanged;

/// Forwards order status changes to an external messaging system.
#[async_trait]
pub trait OrderStatusProducer: Send + Sync {
    async fn publish(&self, event: &OrderStatusChanged) -> anyhow::Result<()>;
}

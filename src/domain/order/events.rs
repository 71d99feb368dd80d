use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use uuid::Uuid;

use crate::ddd::DomainEvent;
use super::value_objects::OrderStatus;

// ============================================================================
// Order Events
// ============================================================================

/// Order status changed - raised when an order reaches a new status.
/// Integration point for external notification.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderStatusChanged {
    pub event_id: Uuid,
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

impl OrderStatusChanged {
    pub const NAME: &'static str = "order.status.changed";

    pub fn new(order_id: Uuid, status: OrderStatus) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            order_id,
            status,
            occurred_at: Utc::now(),
        }
    }
}

impl DomainEvent for OrderStatusChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn event_name(&self) -> &'static str { Self::NAME }
    fn aggregate_id(&self) -> Uuid { self.order_id }
    fn as_any(&self) -> &(dyn Any + Send + Sync) { self }
}

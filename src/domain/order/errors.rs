use uuid::Uuid;

use super::value_objects::OrderStatus;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("Order id must not be empty")]
    InvalidOrderId,

    #[error("Order volume must be greater than zero, got {0}")]
    InvalidVolume(i32),

    #[error("Courier id must not be empty")]
    InvalidCourierId,

    #[error("Order {0} cannot be completed: no courier assigned")]
    CourierNotAssigned(Uuid),

    #[error("Order cannot move from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },
}

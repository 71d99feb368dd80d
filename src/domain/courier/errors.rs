use uuid::Uuid;

use crate::domain::kernel::LocationError;
use crate::domain::order::OrderError;

// ============================================================================
// Courier Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CourierError {
    #[error("Courier name cannot be empty")]
    EmptyName,

    #[error("Courier speed must be greater than zero, got {0}")]
    InvalidSpeed(i32),

    #[error("Storage place name cannot be empty")]
    EmptyStoragePlaceName,

    #[error("Storage place volume must be greater than zero, got {0}")]
    InvalidStorageVolume(i32),

    #[error("Order id must not be empty")]
    InvalidOrderId,

    #[error("Storage place {storage_place_id} cannot store an order of volume {volume}")]
    CannotStore { storage_place_id: Uuid, volume: i32 },

    #[error("Order {order_id} is not stored in storage place {storage_place_id}")]
    WrongOrder { storage_place_id: Uuid, order_id: Uuid },

    #[error("Courier {courier_id} has no free storage place for volume {volume}")]
    NoCapacity { courier_id: Uuid, volume: i32 },

    #[error("Order {0} is not stored by this courier")]
    OrderNotFound(Uuid),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Location(#[from] LocationError),
}

// ============================================================================
// Application Layer - use cases
// ============================================================================
//
// Commands (create order, create courier, add storage place, assign order,
// move couriers) each run inside their own UnitOfWork. Queries read committed
// state and return flat views. Event handlers react to domain events after
// commit.
//
// Every use case returns DeliveryError.
//
// ============================================================================

pub mod commands;
pub mod queries;
pub mod event_handlers;

pub use commands::*;
pub use queries::*;
pub use event_handlers::OrderStatusChangedHandler;

// ============================================================================
// Order Domain
// ============================================================================
//
// - Value objects (OrderStatus)
// - Events (OrderStatusChanged)
// - Errors (OrderError)
// - Aggregate (Order)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod errors;
pub mod aggregate;

pub use value_objects::*;
pub use events::*;
pub use errors::*;
pub use aggregate::*;

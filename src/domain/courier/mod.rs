// ============================================================================
// Courier Domain
// ============================================================================
//
// - StoragePlace (slot entity owned by a courier)
// - Errors (CourierError)
// - Aggregate (Courier: capacity, order hand-off, movement)
//
// ============================================================================

pub mod errors;
pub mod storage_place;
pub mod aggregate;

pub use errors::*;
pub use storage_place::*;
pub use aggregate::*;

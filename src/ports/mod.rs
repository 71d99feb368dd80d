// ============================================================================
// Ports - trait boundaries between the core and its collaborators
// ============================================================================
//
// - OrderRepository / CourierRepository: aggregate stores, implemented by the
//   unit-of-work repository views in persistence
// - GeoClient: street name -> Location
// - OrderStatusProducer: forwards OrderStatusChanged to external messaging
//
// Implementations are injected; nothing here is a global.
//
// ============================================================================

pub mod repositories;
pub mod geo;
pub mod producer;

pub use repositories::{CourierRepository, OrderRepository};
pub use geo::GeoClient;
pub use producer::OrderStatusProducer;

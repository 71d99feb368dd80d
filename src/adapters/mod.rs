// ============================================================================
// Adapters - bundled implementations of the outbound ports
// ============================================================================
//
// - RandomGeoClient: GeoClient that places every street on a random grid cell
// - TracingOrderProducer: OrderStatusProducer that emits the integration
//   event as a structured log record on the configured topic
//
// ============================================================================

pub mod geo;
pub mod producer;

pub use geo::RandomGeoClient;
pub use producer::{OrderStatusChangedIntegrationEvent, TracingOrderProducer};

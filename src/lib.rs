// ============================================================================
// Delivery - order dispatch and courier tracking core
// ============================================================================
//
// Layers, innermost first:
// - ddd:         events, aggregate root, mediator
// - domain:      Location, Order, Courier, DispatchService
// - ports:       repository / geolocation / producer traits
// - persistence: storage backend, unit of work, repository views
// - application: command, query and event handlers
// - adapters:    bundled port implementations
// - actors:      periodic job scheduler
// - api:         HTTP routes over the use cases
//
// ============================================================================

pub mod actors;
pub mod adapters;
pub mod api;
pub mod application;
pub mod config;
pub mod ddd;
pub mod domain;
pub mod errors;
pub mod metrics;
pub mod persistence;
pub mod ports;
pub mod utils;

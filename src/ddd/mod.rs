// ============================================================================
// DDD Building Blocks
// ============================================================================
//
// Generic, reusable pieces shared by every aggregate:
// - DomainEvent trait and serialization helpers
// - EventQueue (embeddable raised-events list) and AggregateRoot
// - Mediator (in-process publish/subscribe keyed by event name)
//
// No Order/Courier-specific code lives here.
//
// ============================================================================

pub mod aggregate;
pub mod event;
pub mod mediator;

pub use aggregate::{AggregateRoot, EventQueue, EventQueueHandle};
pub use event::{deserialize_event, serialize_event, DomainEvent, SharedEvent};
pub use mediator::{EventHandler, Mediator, PublishError};

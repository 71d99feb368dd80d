use uuid::Uuid;

use crate::ddd::{AggregateRoot, EventQueue};
use crate::domain::kernel::Location;
use super::errors::OrderError;
use super::events::OrderStatusChanged;
use super::value_objects::OrderStatus;

// ============================================================================
// Order Aggregate
// ============================================================================
//
// Invariants:
// - id is never nil and never changes
// - volume > 0
// - status only moves Created -> Assigned -> Completed
// - completion requires an assigned courier
//
// The courier is referenced by id only; the order never owns it.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct Order {
    id: Uuid,
    courier_id: Option<Uuid>,
    location: Location,
    volume: i32,
    status: OrderStatus,
    version: i64,
    events: EventQueue,
}

impl Order {
    pub fn new(id: Uuid, location: Location, volume: i32) -> Result<Self, OrderError> {
        if id.is_nil() {
            return Err(OrderError::InvalidOrderId);
        }
        if volume <= 0 {
            return Err(OrderError::InvalidVolume(volume));
        }

        Ok(Self {
            id,
            courier_id: None,
            location,
            volume,
            status: OrderStatus::Created,
            version: 0,
            events: EventQueue::new(),
        })
    }

    /// Rebuild a persisted order at its stored row version. Raises no events.
    pub fn restore(
        id: Uuid,
        courier_id: Option<Uuid>,
        location: Location,
        volume: i32,
        status: OrderStatus,
        version: i64,
    ) -> Self {
        Self {
            id,
            courier_id,
            location,
            volume,
            status,
            version,
            events: EventQueue::new(),
        }
    }

    /// Attach a courier and move to Assigned.
    ///
    /// Re-assigning an Assigned order overwrites the courier reference; keeping
    /// that from happening is up to the caller.
    pub fn assign(&mut self, courier_id: Uuid) -> Result<(), OrderError> {
        if courier_id.is_nil() {
            return Err(OrderError::InvalidCourierId);
        }
        if self.status.is_terminal() {
            return Err(OrderError::InvalidStatusTransition {
                from: self.status,
                to: OrderStatus::Assigned,
            });
        }

        self.courier_id = Some(courier_id);
        self.status = OrderStatus::Assigned;
        Ok(())
    }

    pub fn complete(&mut self) -> Result<(), OrderError> {
        if self.courier_id.is_none() {
            return Err(OrderError::CourierNotAssigned(self.id));
        }
        if self.status == OrderStatus::Completed {
            return Ok(());
        }

        self.status = OrderStatus::Completed;
        self.events.raise(OrderStatusChanged::new(self.id, self.status));
        Ok(())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn courier_id(&self) -> Option<Uuid> {
        self.courier_id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn volume(&self) -> i32 {
        self.volume
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }
}

impl AggregateRoot for Order {
    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn events(&self) -> &EventQueue {
        &self.events
    }

    fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

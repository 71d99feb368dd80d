use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use super::event::{DomainEvent, SharedEvent};

// ============================================================================
// Aggregate Root - Identity + Version + Raised Events
// ============================================================================
//
// Aggregates embed an EventQueue and expose it through AggregateRoot.
// Tracking an aggregate hands the unit of work an EventQueueHandle onto the
// same queue. The queue is drained only after a successful commit, so events
// raised after tracking are still published with that commit.
//
// Cloning an aggregate deep-copies its queue; the copy never shares events
// with the original.
//
// version() is the storage row version the aggregate was loaded at or last
// written as; 0 means never stored.
//
// ============================================================================

type Events = Arc<Mutex<Vec<SharedEvent>>>;

fn lock(events: &Events) -> MutexGuard<'_, Vec<SharedEvent>> {
    events.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ordered list of events raised by an aggregate and not yet published.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Events,
}

impl Clone for EventQueue {
    fn clone(&self) -> Self {
        Self {
            events: Arc::new(Mutex::new(lock(&self.events).clone())),
        }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise<E: DomainEvent>(&mut self, event: E) {
        lock(&self.events).push(Arc::new(event));
    }

    /// Remove and return every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<SharedEvent> {
        std::mem::take(&mut *lock(&self.events))
    }

    pub fn len(&self) -> usize {
        lock(&self.events).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.events).is_empty()
    }

    /// A handle onto this queue, seeing every event raised from now on.
    pub fn handle(&self) -> EventQueueHandle {
        EventQueueHandle {
            events: self.events.clone(),
        }
    }
}

/// Shared view of one aggregate's queue, held by the unit of work.
#[derive(Debug, Clone)]
pub struct EventQueueHandle {
    events: Events,
}

impl EventQueueHandle {
    pub fn drain(&self) -> Vec<SharedEvent> {
        std::mem::take(&mut *lock(&self.events))
    }

    pub fn len(&self) -> usize {
        lock(&self.events).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.events).is_empty()
    }

    pub fn is_same_queue(&self, other: &EventQueueHandle) -> bool {
        Arc::ptr_eq(&self.events, &other.events)
    }
}

pub trait AggregateRoot {
    fn id(&self) -> Uuid;

    fn version(&self) -> i64;

    /// Record the row version a storage write produced.
    fn set_version(&mut self, version: i64);

    fn events(&self) -> &EventQueue;

    fn events_mut(&mut self) -> &mut EventQueue;

    fn has_events(&self) -> bool {
        !self.events().is_empty()
    }

    fn take_events(&mut self) -> Vec<SharedEvent> {
        self.events_mut().drain()
    }
}

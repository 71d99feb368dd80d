use uuid::Uuid;

use crate::ddd::{AggregateRoot, EventQueue};
use crate::domain::kernel::Location;
use crate::domain::order::Order;
use super::errors::CourierError;
use super::storage_place::StoragePlace;

// ============================================================================
// Courier Aggregate
// ============================================================================
//
// Owns its storage places exclusively; nothing outside this type mutates them.
// A courier without storage places can never take an order.
//
// Speed is the number of grid units covered per movement step.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct Courier {
    id: Uuid,
    name: String,
    speed: i32,
    location: Location,
    storage_places: Vec<StoragePlace>,
    version: i64,
    events: EventQueue,
}

impl Courier {
    pub fn new(name: impl Into<String>, speed: i32, location: Location) -> Result<Self, CourierError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CourierError::EmptyName);
        }
        if speed <= 0 {
            return Err(CourierError::InvalidSpeed(speed));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            speed,
            location,
            storage_places: Vec::new(),
            version: 0,
            events: EventQueue::new(),
        })
    }

    /// Rebuild a persisted courier at its stored row version.
    pub fn restore(
        id: Uuid,
        name: String,
        speed: i32,
        location: Location,
        storage_places: Vec<StoragePlace>,
        version: i64,
    ) -> Self {
        Self {
            id,
            name,
            speed,
            location,
            storage_places,
            version,
            events: EventQueue::new(),
        }
    }

    pub fn add_storage_place(&mut self, name: impl Into<String>, volume: i32) -> Result<Uuid, CourierError> {
        let place = StoragePlace::new(name, volume)?;
        let id = place.id();
        self.storage_places.push(place);
        Ok(id)
    }

    /// True iff some free slot is large enough for the order.
    pub fn can_take_order(&self, order: &Order) -> bool {
        self.storage_places
            .iter()
            .any(|place| place.can_store(order.volume()))
    }

    /// Store the order in the first slot (declaration order) that fits.
    pub fn take_order(&mut self, order: &Order) -> Result<(), CourierError> {
        let courier_id = self.id;
        let place = self
            .storage_places
            .iter_mut()
            .find(|place| place.can_store(order.volume()))
            .ok_or(CourierError::NoCapacity {
                courier_id,
                volume: order.volume(),
            })?;

        place.store(order.id(), order.volume())
    }

    /// Complete the order, then free the slot holding it.
    pub fn complete_order(&mut self, order: &mut Order) -> Result<(), CourierError> {
        order.complete()?;

        let order_id = order.id();
        let place = self
            .storage_places
            .iter_mut()
            .find(|place| place.order_id() == Some(order_id))
            .ok_or(CourierError::OrderNotFound(order_id))?;

        place.clear(order_id)
    }

    /// Steps needed to reach `target`; only meaningful as a ranking key.
    pub fn calculate_time_to_location(&self, target: Location) -> f64 {
        f64::from(self.location.distance_to(&target)) / f64::from(self.speed)
    }

    /// Advance towards `target` by at most `speed` units, spending the budget
    /// on the X axis first and whatever remains on the Y axis.
    pub fn move_towards(&mut self, target: Location) -> Result<(), CourierError> {
        let mut budget = self.speed;

        let dx = (target.x() - self.location.x()).clamp(-budget, budget);
        budget -= dx.abs();
        let dy = (target.y() - self.location.y()).clamp(-budget, budget);

        self.location = Location::new(self.location.x() + dx, self.location.y() + dy)?;
        Ok(())
    }

    /// At least one free slot.
    pub fn is_available(&self) -> bool {
        self.storage_places.iter().any(|place| !place.is_occupied())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn storage_places(&self) -> &[StoragePlace] {
        &self.storage_places
    }
}

impl AggregateRoot for Courier {
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

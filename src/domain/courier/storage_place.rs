use uuid::Uuid;

use super::errors::CourierError;

// ============================================================================
// Storage Place - a single courier slot
// ============================================================================
//
// Capacity is a fits-or-not gate: a slot holds at most one order, and only if
// its total volume covers that order's volume. Leftover room is never shared.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePlace {
    id: Uuid,
    name: String,
    total_volume: i32,
    order_id: Option<Uuid>,
}

impl StoragePlace {
    pub fn new(name: impl Into<String>, total_volume: i32) -> Result<Self, CourierError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CourierError::EmptyStoragePlaceName);
        }
        if total_volume <= 0 {
            return Err(CourierError::InvalidStorageVolume(total_volume));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            total_volume,
            order_id: None,
        })
    }

    /// Rebuild a persisted slot as stored, occupant included.
    pub fn restore(id: Uuid, name: String, total_volume: i32, order_id: Option<Uuid>) -> Self {
        Self { id, name, total_volume, order_id }
    }

    pub fn can_store(&self, volume: i32) -> bool {
        volume > 0 && volume <= self.total_volume && !self.is_occupied()
    }

    pub fn store(&mut self, order_id: Uuid, volume: i32) -> Result<(), CourierError> {
        if order_id.is_nil() {
            return Err(CourierError::InvalidOrderId);
        }
        if !self.can_store(volume) {
            return Err(CourierError::CannotStore {
                storage_place_id: self.id,
                volume,
            });
        }

        self.order_id = Some(order_id);
        Ok(())
    }

    /// Free the slot. Only the order currently stored may release it.
    pub fn clear(&mut self, order_id: Uuid) -> Result<(), CourierError> {
        if order_id.is_nil() {
            return Err(CourierError::InvalidOrderId);
        }
        if self.order_id != Some(order_id) {
            return Err(CourierError::WrongOrder {
                storage_place_id: self.id,
                order_id,
            });
        }

        self.order_id = None;
        Ok(())
    }

    pub fn is_occupied(&self) -> bool {
        self.order_id.is_some()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_volume(&self) -> i32 {
        self.total_volume
    }

    pub fn order_id(&self) -> Option<Uuid> {
        self.order_id
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ddd::AggregateRoot;
use crate::domain::courier::{Courier, StoragePlace};
use crate::domain::kernel::Location;
use crate::domain::order::{Order, OrderStatus};
use super::storage::StorageError;

// ============================================================================
// Stored Rows
// ============================================================================
//
// Storage backends keep these flat rows, never live aggregates. Writes map an
// aggregate to its row; reads rebuild the aggregate through its restore
// constructor, so a loaded aggregate starts with an empty event queue.
//
// `version` is the optimistic-concurrency token: a save must carry the
// version currently stored, and every write bumps it by one.
//
// ============================================================================

/// Identity and version shared by every stored row.
pub trait Row: Clone + Send + Sync {
    const ENTITY: &'static str;

    fn id(&self) -> Uuid;

    fn version(&self) -> i64;

    fn with_version(self, version: i64) -> Self;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: Uuid,
    pub courier_id: Option<Uuid>,
    pub x: i32,
    pub y: i32,
    pub volume: i32,
    pub status: OrderStatus,
    pub version: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragePlaceRecord {
    pub id: Uuid,
    pub name: String,
    pub total_volume: i32,
    pub order_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierRecord {
    pub id: Uuid,
    pub name: String,
    pub speed: i32,
    pub x: i32,
    pub y: i32,
    pub storage_places: Vec<StoragePlaceRecord>,
    pub version: i64,
}

impl Row for OrderRecord {
    const ENTITY: &'static str = "order";

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn with_version(self, version: i64) -> Self {
        Self { version, ..self }
    }
}

impl Row for CourierRecord {
    const ENTITY: &'static str = "courier";

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn with_version(self, version: i64) -> Self {
        Self { version, ..self }
    }
}

// ============================================================================
// Aggregate -> Row
// ============================================================================

impl From<&Order> for OrderRecord {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            courier_id: order.courier_id(),
            x: order.location().x(),
            y: order.location().y(),
            volume: order.volume(),
            status: order.status(),
            version: order.version(),
        }
    }
}

impl From<&StoragePlace> for StoragePlaceRecord {
    fn from(place: &StoragePlace) -> Self {
        Self {
            id: place.id(),
            name: place.name().to_string(),
            total_volume: place.total_volume(),
            order_id: place.order_id(),
        }
    }
}

impl From<&Courier> for CourierRecord {
    fn from(courier: &Courier) -> Self {
        Self {
            id: courier.id(),
            name: courier.name().to_string(),
            speed: courier.speed(),
            x: courier.location().x(),
            y: courier.location().y(),
            storage_places: courier.storage_places().iter().map(StoragePlaceRecord::from).collect(),
            version: courier.version(),
        }
    }
}

// ============================================================================
// Row -> Aggregate
// ============================================================================

fn location_of(entity: &'static str, id: Uuid, x: i32, y: i32) -> Result<Location, StorageError> {
    Location::new(x, y).map_err(|e| StorageError::Corrupt {
        entity,
        id,
        reason: e.to_string(),
    })
}

impl TryFrom<OrderRecord> for Order {
    type Error = StorageError;

    fn try_from(row: OrderRecord) -> Result<Self, Self::Error> {
        let location = location_of(OrderRecord::ENTITY, row.id, row.x, row.y)?;
        Ok(Order::restore(row.id, row.courier_id, location, row.volume, row.status, row.version))
    }
}

impl TryFrom<CourierRecord> for Courier {
    type Error = StorageError;

    fn try_from(row: CourierRecord) -> Result<Self, Self::Error> {
        let location = location_of(CourierRecord::ENTITY, row.id, row.x, row.y)?;
        let places = row
            .storage_places
            .into_iter()
            .map(|place| StoragePlace::restore(place.id, place.name, place.total_volume, place.order_id))
            .collect();

        Ok(Courier::restore(row.id, row.name, row.speed, location, places, row.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_courier_row_restores_slots_and_version() {
        let mut courier = Courier::new("Bike", 2, Location::new(3, 7).unwrap()).unwrap();
        courier.add_storage_place("bag", 10).unwrap();
        courier.add_storage_place("trunk", 5).unwrap();
        let mut order = Order::new(Uuid::new_v4(), Location::max(), 4).unwrap();
        order.assign(courier.id()).unwrap();
        courier.take_order(&order).unwrap();
        courier.set_version(4);

        let restored = Courier::try_from(CourierRecord::from(&courier)).unwrap();

        assert_eq!(restored.id(), courier.id());
        assert_eq!(restored.name(), "Bike");
        assert_eq!(restored.speed(), 2);
        assert_eq!(restored.location(), courier.location());
        assert_eq!(restored.storage_places(), courier.storage_places());
        assert_eq!(restored.version(), 4);
    }

    #[test]
    fn test_order_row_restores_without_events() {
        let mut order = Order::new(Uuid::new_v4(), Location::new(2, 9).unwrap(), 3).unwrap();
        order.assign(Uuid::new_v4()).unwrap();
        order.complete().unwrap();

        let row = OrderRecord::from(&order);
        let restored = Order::try_from(row.clone()).unwrap();

        assert_eq!(OrderRecord::from(&restored), row);
        assert!(order.has_events());
        assert!(!restored.has_events());
    }

    #[test]
    fn test_off_grid_row_is_corrupt() {
        let row = OrderRecord {
            id: Uuid::new_v4(),
            courier_id: None,
            x: 11,
            y: 1,
            volume: 1,
            status: OrderStatus::Created,
            version: 1,
        };

        let err = Order::try_from(row.clone()).unwrap_err();

        assert!(matches!(err, StorageError::Corrupt { entity: "order", id, .. } if id == row.id));
    }
}

// ============================================================================
// Persistence - transactional storage and the unit of work
// ============================================================================
//
// - Storage: backend contract (transactions, staged writes, reads)
// - OrderRecord / CourierRecord: versioned rows the backend stores
// - InMemoryStorage: the bundled backend
// - UnitOfWork / UnitOfWorkFactory: transaction boundary + event publication
// - Orders / Couriers: repository views implementing the ports
//
// ============================================================================

pub mod storage;
pub mod records;
pub mod in_memory;
pub mod unit_of_work;
pub mod repositories;

pub use storage::{Storage, StorageError, TxId};
pub use records::{CourierRecord, OrderRecord, Row, StoragePlaceRecord};
pub use in_memory::InMemoryStorage;
pub use unit_of_work::{UnitOfWork, UnitOfWorkFactory};
pub use repositories::{Couriers, Orders};

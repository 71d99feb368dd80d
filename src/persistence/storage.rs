use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::order::OrderStatus;
use super::records::{CourierRecord, OrderRecord};

// ============================================================================
// Storage Backend Contract
// ============================================================================
//
// Transactional row store for the two aggregates. Writes are staged against
// an open transaction and become visible to other readers only on commit.
// Reads given a transaction id see that transaction's staged writes on top of
// committed state; reads without one see committed state only.
//
// Rows are versioned. insert stores version 1; save must carry the version
// currently visible to the transaction and stores it plus one. A save against
// a row another transaction has since committed fails with Conflict, checked
// both when the write is staged and again at commit.
//
// ============================================================================

pub type TxId = Uuid;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    #[error("Unknown transaction {0}")]
    UnknownTransaction(TxId),

    #[error("{entity} {id} already exists")]
    Duplicate { entity: &'static str, id: Uuid },

    #[error("{entity} {id} does not exist")]
    Missing { entity: &'static str, id: Uuid },

    #[error("{entity} {id} was modified concurrently: expected version {expected}, found {found}")]
    Conflict {
        entity: &'static str,
        id: Uuid,
        expected: i64,
        found: i64,
    },

    #[error("{entity} {id} is stored in an unreadable state: {reason}")]
    Corrupt {
        entity: &'static str,
        id: Uuid,
        reason: String,
    },

    #[error("Commit failed: {0}")]
    CommitFailed(String),

    #[error("Rollback failed: {0}")]
    RollbackFailed(String),
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn begin(&self) -> Result<TxId, StorageError>;

    async fn commit(&self, tx: TxId) -> Result<(), StorageError>;

    async fn rollback(&self, tx: TxId) -> Result<(), StorageError>;

    /// Stage a new order row. Returns the version it will be stored at.
    async fn insert_order(&self, tx: TxId, order: OrderRecord) -> Result<i64, StorageError>;

    /// Stage an update of an existing row. Returns the new version.
    async fn save_order(&self, tx: TxId, order: OrderRecord) -> Result<i64, StorageError>;

    async fn find_order(&self, tx: Option<TxId>, id: Uuid) -> Result<Option<OrderRecord>, StorageError>;

    /// Orders whose status is one of `statuses`, in insertion order.
    async fn find_orders(
        &self,
        tx: Option<TxId>,
        statuses: &[OrderStatus],
    ) -> Result<Vec<OrderRecord>, StorageError>;

    async fn insert_courier(&self, tx: TxId, courier: CourierRecord) -> Result<i64, StorageError>;

    async fn save_courier(&self, tx: TxId, courier: CourierRecord) -> Result<i64, StorageError>;

    async fn find_courier(&self, tx: Option<TxId>, id: Uuid) -> Result<Option<CourierRecord>, StorageError>;

    /// Every courier, in insertion order.
    async fn find_couriers(&self, tx: Option<TxId>) -> Result<Vec<CourierRecord>, StorageError>;
}

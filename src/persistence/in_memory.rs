use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::order::OrderStatus;
use super::records::{CourierRecord, OrderRecord, Row};
use super::storage::{Storage, StorageError, TxId};

// ============================================================================
// In-Memory Transactional Storage
// ============================================================================
//
// Committed rows live in insertion-ordered tables. Each open transaction keeps
// its own list of staged writes; commit replays the whole list against the
// committed tables under the state lock, so either every write lands or none
// does. Replaying re-checks row versions, which turns a save based on a row
// another transaction committed in the meantime into a Conflict.
//
// A failed commit leaves the transaction open; the caller must roll it back.
//
// fail_next_commit / fail_next_rollback inject a single failure for tests.
//
// ============================================================================

#[derive(Debug, Clone)]
enum Write<T> {
    Insert(T),
    Save(T),
}

#[derive(Debug, Default)]
struct Staged {
    orders: Vec<Write<OrderRecord>>,
    couriers: Vec<Write<CourierRecord>>,
}

#[derive(Debug, Default)]
struct State {
    orders: Vec<OrderRecord>,
    couriers: Vec<CourierRecord>,
    transactions: HashMap<TxId, Staged>,
}

#[derive(Debug, Default)]
pub struct InMemoryStorage {
    state: Mutex<State>,
    fail_next_commit: AtomicBool,
    fail_next_rollback: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next commit fail with CommitFailed.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Make the next rollback fail with RollbackFailed.
    pub fn fail_next_rollback(&self) {
        self.fail_next_rollback.store(true, Ordering::SeqCst);
    }

    pub async fn open_transactions(&self) -> usize {
        self.state.lock().await.transactions.len()
    }
}

/// Apply one write to `rows` and return the version it produced.
fn apply_one<T: Row>(rows: &mut Vec<T>, write: &Write<T>) -> Result<i64, StorageError> {
    let entity = T::ENTITY;
    match write {
        Write::Insert(row) => {
            if rows.iter().any(|existing| existing.id() == row.id()) {
                return Err(StorageError::Duplicate { entity, id: row.id() });
            }
            rows.push(row.clone().with_version(1));
            Ok(1)
        }
        Write::Save(row) => {
            let slot = rows
                .iter_mut()
                .find(|existing| existing.id() == row.id())
                .ok_or(StorageError::Missing { entity, id: row.id() })?;
            if slot.version() != row.version() {
                return Err(StorageError::Conflict {
                    entity,
                    id: row.id(),
                    expected: row.version(),
                    found: slot.version(),
                });
            }
            let version = row.version() + 1;
            *slot = row.clone().with_version(version);
            Ok(version)
        }
    }
}

fn apply<T: Row>(rows: &mut Vec<T>, writes: &[Write<T>]) -> Result<(), StorageError> {
    for write in writes {
        apply_one(rows, write)?;
    }
    Ok(())
}

impl State {
    fn staged(&self, tx: TxId) -> Result<&Staged, StorageError> {
        self.transactions
            .get(&tx)
            .ok_or(StorageError::UnknownTransaction(tx))
    }

    fn staged_mut(&mut self, tx: TxId) -> Result<&mut Staged, StorageError> {
        self.transactions
            .get_mut(&tx)
            .ok_or(StorageError::UnknownTransaction(tx))
    }

    fn orders_view(&self, tx: Option<TxId>) -> Result<Vec<OrderRecord>, StorageError> {
        let mut rows = self.orders.clone();
        if let Some(tx) = tx {
            apply(&mut rows, &self.staged(tx)?.orders)?;
        }
        Ok(rows)
    }

    fn couriers_view(&self, tx: Option<TxId>) -> Result<Vec<CourierRecord>, StorageError> {
        let mut rows = self.couriers.clone();
        if let Some(tx) = tx {
            apply(&mut rows, &self.staged(tx)?.couriers)?;
        }
        Ok(rows)
    }

    /// Stage a write after checking it against what the transaction sees.
    fn stage_order(&mut self, tx: TxId, write: Write<OrderRecord>) -> Result<i64, StorageError> {
        let mut view = self.orders_view(Some(tx))?;
        let version = apply_one(&mut view, &write)?;
        self.staged_mut(tx)?.orders.push(write);
        Ok(version)
    }

    fn stage_courier(&mut self, tx: TxId, write: Write<CourierRecord>) -> Result<i64, StorageError> {
        let mut view = self.couriers_view(Some(tx))?;
        let version = apply_one(&mut view, &write)?;
        self.staged_mut(tx)?.couriers.push(write);
        Ok(version)
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn begin(&self) -> Result<TxId, StorageError> {
        let tx = Uuid::now_v7();
        self.state.lock().await.transactions.insert(tx, Staged::default());
        tracing::trace!(tx = %tx, "Transaction opened");
        Ok(tx)
    }

    async fn commit(&self, tx: TxId) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        let staged = state.staged(tx)?;

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(StorageError::CommitFailed("injected failure".to_string()));
        }

        let mut orders = state.orders.clone();
        apply(&mut orders, &staged.orders)?;
        let mut couriers = state.couriers.clone();
        apply(&mut couriers, &staged.couriers)?;

        state.orders = orders;
        state.couriers = couriers;
        state.transactions.remove(&tx);

        tracing::trace!(tx = %tx, "Transaction committed");
        Ok(())
    }

    async fn rollback(&self, tx: TxId) -> Result<(), StorageError> {
        if self.fail_next_rollback.swap(false, Ordering::SeqCst) {
            return Err(StorageError::RollbackFailed("injected failure".to_string()));
        }

        let mut state = self.state.lock().await;
        state
            .transactions
            .remove(&tx)
            .ok_or(StorageError::UnknownTransaction(tx))?;

        tracing::trace!(tx = %tx, "Transaction rolled back");
        Ok(())
    }

    async fn insert_order(&self, tx: TxId, order: OrderRecord) -> Result<i64, StorageError> {
        self.state.lock().await.stage_order(tx, Write::Insert(order))
    }

    async fn save_order(&self, tx: TxId, order: OrderRecord) -> Result<i64, StorageError> {
        self.state.lock().await.stage_order(tx, Write::Save(order))
    }

    async fn find_order(&self, tx: Option<TxId>, id: Uuid) -> Result<Option<OrderRecord>, StorageError> {
        let state = self.state.lock().await;
        Ok(state.orders_view(tx)?.into_iter().find(|order| order.id == id))
    }

    async fn find_orders(
        &self,
        tx: Option<TxId>,
        statuses: &[OrderStatus],
    ) -> Result<Vec<OrderRecord>, StorageError> {
        let state = self.state.lock().await;
        Ok(state
            .orders_view(tx)?
            .into_iter()
            .filter(|order| statuses.contains(&order.status))
            .collect())
    }

    async fn insert_courier(&self, tx: TxId, courier: CourierRecord) -> Result<i64, StorageError> {
        self.state.lock().await.stage_courier(tx, Write::Insert(courier))
    }

    async fn save_courier(&self, tx: TxId, courier: CourierRecord) -> Result<i64, StorageError> {
        self.state.lock().await.stage_courier(tx, Write::Save(courier))
    }

    async fn find_courier(&self, tx: Option<TxId>, id: Uuid) -> Result<Option<CourierRecord>, StorageError> {
        let state = self.state.lock().await;
        Ok(state.couriers_view(tx)?.into_iter().find(|courier| courier.id == id))
    }

    async fn find_couriers(&self, tx: Option<TxId>) -> Result<Vec<CourierRecord>, StorageError> {
        self.state.lock().await.couriers_view(tx)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

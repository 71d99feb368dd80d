use std::sync::Arc;

use crate::ddd::{AggregateRoot, EventQueueHandle, Mediator, SharedEvent};
use crate::errors::DeliveryError;
use crate::metrics::Metrics;
use super::repositories::{Couriers, Orders};
use super::storage::{Storage, StorageError, TxId};

// ============================================================================
// Unit of Work - one transaction, events published only after commit
// ============================================================================
//
// Lifecycle per use case:
//   begin -> repository writes (staged in the transaction) -> commit | rollback
//
// Every repository write tracks the written aggregate. Tracking keeps a handle
// on the aggregate's event queue, not a copy of its events, so anything the
// aggregate raises before commit goes out with that commit. Commit persists
// first; only when storage accepts it are the tracked queues drained and
// published through the mediator, aggregate by aggregate in tracking order.
// A failed commit publishes nothing and forgets the tracked aggregates; their
// events stay queued on the aggregates themselves.
//
// A repository write with no open transaction opens one, stages the write and
// commits it immediately, publishing that aggregate's events.
//
// Event delivery is best-effort: a failing handler is logged and counted,
// never unwinding the committed transaction. A rollback failure aborts the
// process since storage and published events may no longer agree.
//
// ============================================================================

pub struct UnitOfWork {
    storage: Arc<dyn Storage>,
    mediator: Arc<Mediator>,
    metrics: Arc<Metrics>,
    tx: Option<TxId>,
    tracked: Vec<EventQueueHandle>,
}

impl UnitOfWork {
    pub fn new(storage: Arc<dyn Storage>, mediator: Arc<Mediator>, metrics: Arc<Metrics>) -> Self {
        Self {
            storage,
            mediator,
            metrics,
            tx: None,
            tracked: Vec::new(),
        }
    }

    pub fn orders(&mut self) -> Orders<'_> {
        Orders::new(self)
    }

    pub fn couriers(&mut self) -> Couriers<'_> {
        Couriers::new(self)
    }

    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    pub(crate) fn transaction(&self) -> Option<TxId> {
        self.tx
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Number of events the tracked aggregates would publish on commit.
    pub fn pending_events(&self) -> usize {
        self.tracked.iter().map(EventQueueHandle::len).sum()
    }

    pub async fn begin(&mut self) -> Result<(), DeliveryError> {
        if self.tx.is_some() {
            return Err(DeliveryError::Business {
                operation: "begin transaction",
                reason: "a transaction is already open".to_string(),
            });
        }

        let tx = self
            .storage
            .begin()
            .await
            .map_err(|e| DeliveryError::storage("begin", "transaction", e))?;
        self.tx = Some(tx);
        Ok(())
    }

    /// Register the aggregate so its queued events are published on commit.
    /// Tracking the same aggregate twice is a no-op.
    pub fn track<A: AggregateRoot>(&mut self, aggregate: &A) {
        let handle = aggregate.events().handle();
        if !self.tracked.iter().any(|tracked| tracked.is_same_queue(&handle)) {
            self.tracked.push(handle);
        }
    }

    pub async fn commit(&mut self) -> Result<(), DeliveryError> {
        let tx = self.tx.take().ok_or_else(|| DeliveryError::Business {
            operation: "commit",
            reason: "no open transaction".to_string(),
        })?;

        if let Err(e) = self.storage.commit(tx).await {
            self.metrics.commit_failures.inc();
            tracing::error!(
                tx = %tx,
                error = %e,
                unpublished_events = self.pending_events(),
                "Commit failed, rolling back"
            );
            self.tracked.clear();
            self.abort(tx).await;
            return Err(DeliveryError::storage("commit", "transaction", e));
        }

        let events: Vec<SharedEvent> = std::mem::take(&mut self.tracked)
            .iter()
            .flat_map(EventQueueHandle::drain)
            .collect();
        tracing::debug!(tx = %tx, events = events.len(), "Transaction committed");

        self.publish(events).await;
        Ok(())
    }

    /// Discard the open transaction (if any) and forget the tracked aggregates.
    pub async fn rollback(&mut self) {
        self.tracked.clear();
        if let Some(tx) = self.tx.take() {
            self.abort(tx).await;
        }
    }

    /// Commit on Ok, roll back on Err.
    pub async fn finish<T>(&mut self, result: Result<T, DeliveryError>) -> Result<T, DeliveryError> {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(e) => {
                self.rollback().await;
                Err(e)
            }
        }
    }

    /// Transaction for a repository write, opening one if none is open.
    /// The flag says whether the caller must settle it with `settle_write`.
    pub(crate) async fn write_transaction(&mut self) -> Result<(TxId, bool), DeliveryError> {
        match self.tx {
            Some(tx) => Ok((tx, false)),
            None => {
                self.begin().await?;
                let tx = self.tx.ok_or_else(|| DeliveryError::Business {
                    operation: "begin transaction",
                    reason: "transaction vanished after begin".to_string(),
                })?;
                Ok((tx, true))
            }
        }
    }

    pub(crate) async fn settle_write<T>(
        &mut self,
        auto_commit: bool,
        result: Result<T, DeliveryError>,
    ) -> Result<T, DeliveryError> {
        if auto_commit {
            self.finish(result).await
        } else {
            result
        }
    }

    async fn publish(&self, events: Vec<SharedEvent>) {
        for event in events {
            match self.mediator.publish(event.as_ref()).await {
                Ok(()) => self.metrics.record_event_delivery(event.event_name(), true),
                Err(e) => {
                    self.metrics.record_event_delivery(event.event_name(), false);
                    tracing::error!(
                        event_name = e.event_name,
                        event_id = %e.event_id,
                        aggregate_id = %event.aggregate_id(),
                        error = %e,
                        "Event handler failed after commit"
                    );
                }
            }
        }
    }

    async fn abort(&self, tx: TxId) {
        match self.storage.rollback(tx).await {
            Ok(()) | Err(StorageError::UnknownTransaction(_)) => {}
            Err(e) => panic!("rollback of transaction {tx} failed, storage state is unknown: {e}"),
        }
    }
}

// ============================================================================
// Factory - one UnitOfWork per use case
// ============================================================================

#[derive(Clone)]
pub struct UnitOfWorkFactory {
    storage: Arc<dyn Storage>,
    mediator: Arc<Mediator>,
    metrics: Arc<Metrics>,
}

impl UnitOfWorkFactory {
    pub fn new(storage: Arc<dyn Storage>, mediator: Arc<Mediator>, metrics: Arc<Metrics>) -> Self {
        Self { storage, mediator, metrics }
    }

    pub fn create(&self) -> UnitOfWork {
        UnitOfWork::new(self.storage.clone(), self.mediator.clone(), self.metrics.clone())
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddd::{DomainEvent, EventHandler};
    use crate::domain::kernel::Location;
    use crate::domain::order::{Order, OrderStatus, OrderStatusChanged};
    use crate::persistence::InMemoryStorage;
    use crate::ports::OrderRepository;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct Received {
        orders: Mutex<Vec<Uuid>>,
    }

    struct Recording(Arc<Received>);

    #[async_trait]
    impl EventHandler for Recording {
        async fn handle(&self, event: &dyn DomainEvent) -> anyhow::Result<()> {
            self.0.orders.lock().unwrap().push(event.aggregate_id());
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl EventHandler for Failing {
        async fn handle(&self, _event: &dyn DomainEvent) -> anyhow::Result<()> {
            anyhow::bail!("sink unavailable")
        }
    }

    struct Fixture {
        storage: Arc<InMemoryStorage>,
        metrics: Arc<Metrics>,
        factory: UnitOfWorkFactory,
    }

    async fn fixture(handlers: Vec<Arc<dyn EventHandler>>) -> Fixture {
        let storage = Arc::new(InMemoryStorage::new());
        let mediator = Arc::new(Mediator::new());
        for handler in handlers {
            mediator.subscribe(handler, &[OrderStatusChanged::NAME]).await;
        }
        let metrics = Arc::new(Metrics::new().unwrap());
        let factory = UnitOfWorkFactory::new(storage.clone(), mediator, metrics.clone());
        Fixture { storage, metrics, factory }
    }

    /// Stored Assigned order and a copy ready to be completed.
    async fn assigned_order(fixture: &Fixture) -> Order {
        let mut order = Order::new(Uuid::new_v4(), Location::min(), 1).unwrap();
        order.assign(Uuid::new_v4()).unwrap();
        fixture.factory.create().orders().add(&mut order).await.unwrap();
        order
    }

    #[tokio::test]
    async fn test_commit_publishes_each_event_once_per_subscriber() {
        let first = Arc::new(Received::default());
        let second = Arc::new(Received::default());
        let fixture = fixture(vec![
            Arc::new(Recording(first.clone())),
            Arc::new(Recording(second.clone())),
        ])
        .await;
        let mut a = assigned_order(&fixture).await;
        let mut b = assigned_order(&fixture).await;

        let mut uow = fixture.factory.create();
        uow.begin().await.unwrap();
        a.complete().unwrap();
        b.complete().unwrap();
        uow.orders().update(&mut a).await.unwrap();
        uow.orders().update(&mut b).await.unwrap();

        assert!(first.orders.lock().unwrap().is_empty(), "nothing before commit");
        uow.commit().await.unwrap();

        assert_eq!(*first.orders.lock().unwrap(), vec![a.id(), b.id()]);
        assert_eq!(*second.orders.lock().unwrap(), vec![a.id(), b.id()]);
        assert_eq!(uow.pending_events(), 0);
        assert_eq!(
            fixture
                .metrics
                .events_published
                .with_label_values(&[OrderStatusChanged::NAME])
                .get(),
            2
        );
    }

    #[tokio::test]
    async fn test_commit_failure_publishes_nothing() {
        let received = Arc::new(Received::default());
        let fixture = fixture(vec![Arc::new(Recording(received.clone()))]).await;
        let mut order = assigned_order(&fixture).await;

        let mut uow = fixture.factory.create();
        uow.begin().await.unwrap();
        order.complete().unwrap();
        uow.orders().update(&mut order).await.unwrap();
        fixture.storage.fail_next_commit();

        let err = uow.commit().await.unwrap_err();

        assert_eq!(err.kind(), crate::errors::ErrorKind::Storage);
        assert!(received.orders.lock().unwrap().is_empty());
        assert_eq!(uow.pending_events(), 0);
        assert!(order.has_events(), "events stay on the aggregate");
        assert!(!uow.in_transaction());
        assert_eq!(fixture.storage.open_transactions().await, 0);
        assert_eq!(fixture.metrics.commit_failures.get(), 1);

        let stored = fixture.factory.create().orders().get(order.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Assigned);
    }

    #[tokio::test]
    async fn test_events_raised_after_tracking_are_published() {
        let received = Arc::new(Received::default());
        let fixture = fixture(vec![Arc::new(Recording(received.clone()))]).await;
        let mut order = assigned_order(&fixture).await;

        let mut uow = fixture.factory.create();
        uow.begin().await.unwrap();
        uow.track(&order);
        order.complete().unwrap();
        uow.track(&order);
        assert_eq!(uow.pending_events(), 1);

        uow.commit().await.unwrap();

        assert_eq!(*received.orders.lock().unwrap(), vec![order.id()]);
        assert!(!order.has_events());
    }

    #[tokio::test]
    async fn test_write_without_transaction_commits_and_publishes() {
        let received = Arc::new(Received::default());
        let fixture = fixture(vec![Arc::new(Recording(received.clone()))]).await;
        let mut order = assigned_order(&fixture).await;

        let mut uow = fixture.factory.create();
        order.complete().unwrap();
        uow.orders().update(&mut order).await.unwrap();

        assert!(!uow.in_transaction());
        assert_eq!(*received.orders.lock().unwrap(), vec![order.id()]);
        let stored = fixture.factory.create().orders().get(order.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_handler_failure_does_not_fail_commit() {
        let received = Arc::new(Received::default());
        let fixture = fixture(vec![Arc::new(Failing), Arc::new(Recording(received.clone()))]).await;
        let mut order = assigned_order(&fixture).await;

        let mut uow = fixture.factory.create();
        uow.begin().await.unwrap();
        order.complete().unwrap();
        uow.orders().update(&mut order).await.unwrap();

        uow.commit().await.unwrap();

        assert!(received.orders.lock().unwrap().is_empty(), "delivery stops at the failing handler");
        let stored = fixture.factory.create().orders().get(order.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Completed);
        assert_eq!(
            fixture
                .metrics
                .event_handler_failures
                .with_label_values(&[OrderStatusChanged::NAME])
                .get(),
            1
        );
    }

    #[tokio::test]
    async fn test_finish_rolls_back_on_error() {
        let received = Arc::new(Received::default());
        let fixture = fixture(vec![Arc::new(Recording(received.clone()))]).await;
        let mut order = assigned_order(&fixture).await;

        let mut uow = fixture.factory.create();
        uow.begin().await.unwrap();
        order.complete().unwrap();
        uow.orders().update(&mut order).await.unwrap();

        let result: Result<(), _> = uow
            .finish(Err(DeliveryError::validation("order", "rejected late")))
            .await;

        assert!(result.is_err());
        assert!(received.orders.lock().unwrap().is_empty());
        assert_eq!(fixture.storage.open_transactions().await, 0);
    }

    #[tokio::test]
    async fn test_begin_twice_rejected() {
        let fixture = fixture(vec![]).await;
        let mut uow = fixture.factory.create();

        uow.begin().await.unwrap();
        let err = uow.begin().await.unwrap_err();

        assert_eq!(err.kind(), crate::errors::ErrorKind::Business);
        assert!(uow.in_transaction());
    }

    #[tokio::test]
    async fn test_commit_without_transaction_rejected() {
        let fixture = fixture(vec![]).await;
        let mut uow = fixture.factory.create();

        assert!(uow.commit().await.is_err());
    }

    #[tokio::test]
    #[should_panic(expected = "rollback of transaction")]
    async fn test_rollback_failure_aborts() {
        let fixture = fixture(vec![]).await;
        let mut uow = fixture.factory.create();
        uow.begin().await.unwrap();

        fixture.storage.fail_next_rollback();
        uow.rollback().await;
    }
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::ddd::AggregateRoot;
use crate::domain::courier::Courier;
use crate::domain::order::{Order, OrderStatus};
use crate::errors::DeliveryError;
use crate::ports::{CourierRepository, OrderRepository};
use super::records::{CourierRecord, OrderRecord};
use super::storage::StorageError;
use super::unit_of_work::UnitOfWork;

// ============================================================================
// Repository Views over a Unit of Work
// ============================================================================
//
// Short-lived borrows of a UnitOfWork implementing the repository ports.
// Writes map the aggregate to its row and go through the open transaction (or
// an auto-commit one); a successful write stamps the new row version back on
// the aggregate. Reads see the open transaction's staged writes and rebuild
// aggregates from their rows.
//
// ============================================================================

fn restore_all<R, A>(rows: Vec<R>) -> Result<Vec<A>, StorageError>
where
    A: TryFrom<R, Error = StorageError>,
{
    rows.into_iter().map(A::try_from).collect()
}

pub struct Orders<'a> {
    uow: &'a mut UnitOfWork,
}

impl<'a> Orders<'a> {
    pub(crate) fn new(uow: &'a mut UnitOfWork) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl OrderRepository for Orders<'_> {
    async fn add(&mut self, order: &mut Order) -> Result<(), DeliveryError> {
        let (tx, auto_commit) = self.uow.write_transaction().await?;
        self.uow.track(&*order);

        let result = self
            .uow
            .storage()
            .insert_order(tx, OrderRecord::from(&*order))
            .await
            .map_err(|e| DeliveryError::storage("add", "order", e));
        let version = self.uow.settle_write(auto_commit, result).await?;
        order.set_version(version);
        Ok(())
    }

    async fn update(&mut self, order: &mut Order) -> Result<(), DeliveryError> {
        let (tx, auto_commit) = self.uow.write_transaction().await?;
        self.uow.track(&*order);

        let result = self
            .uow
            .storage()
            .save_order(tx, OrderRecord::from(&*order))
            .await
            .map_err(|e| DeliveryError::storage("update", "order", e));
        let version = self.uow.settle_write(auto_commit, result).await?;
        order.set_version(version);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, DeliveryError> {
        self.uow
            .storage()
            .find_order(self.uow.transaction(), id)
            .await
            .and_then(|row| row.map(Order::try_from).transpose())
            .map_err(|e| DeliveryError::storage("get", "order", e))
    }

    async fn get_first_in_status(&self, status: OrderStatus) -> Result<Option<Order>, DeliveryError> {
        Ok(self.get_all_in_status(status).await?.into_iter().next())
    }

    async fn get_all_in_status(&self, status: OrderStatus) -> Result<Vec<Order>, DeliveryError> {
        self.uow
            .storage()
            .find_orders(self.uow.transaction(), &[status])
            .await
            .and_then(restore_all)
            .map_err(|e| DeliveryError::storage("get_all_in_status", "order", e))
    }
}

impl Orders<'_> {
    /// Orders in any of `statuses`, insertion order.
    pub async fn get_all_in_statuses(&self, statuses: &[OrderStatus]) -> Result<Vec<Order>, DeliveryError> {
        self.uow
            .storage()
            .find_orders(self.uow.transaction(), statuses)
            .await
            .and_then(restore_all)
            .map_err(|e| DeliveryError::storage("get_all_in_statuses", "order", e))
    }
}

pub struct Couriers<'a> {
    uow: &'a mut UnitOfWork,
}

impl<'a> Couriers<'a> {
    pub(crate) fn new(uow: &'a mut UnitOfWork) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl CourierRepository for Couriers<'_> {
    async fn add(&mut self, courier: &mut Courier) -> Result<(), DeliveryError> {
        let (tx, auto_commit) = self.uow.write_transaction().await?;
        self.uow.track(&*courier);

        let result = self
            .uow
            .storage()
            .insert_courier(tx, CourierRecord::from(&*courier))
            .await
            .map_err(|e| DeliveryError::storage("add", "courier", e));
        let version = self.uow.settle_write(auto_commit, result).await?;
        courier.set_version(version);
        Ok(())
    }

    async fn update(&mut self, courier: &mut Courier) -> Result<(), DeliveryError> {
        let (tx, auto_commit) = self.uow.write_transaction().await?;
        self.uow.track(&*courier);

        let result = self
            .uow
            .storage()
            .save_courier(tx, CourierRecord::from(&*courier))
            .await
            .map_err(|e| DeliveryError::storage("update", "courier", e));
        let version = self.uow.settle_write(auto_commit, result).await?;
        courier.set_version(version);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Courier>, DeliveryError> {
        self.uow
            .storage()
            .find_courier(self.uow.transaction(), id)
            .await
            .and_then(|row| row.map(Courier::try_from).transpose())
            .map_err(|e| DeliveryError::storage("get", "courier", e))
    }

    async fn get_all_available(&self) -> Result<Vec<Courier>, DeliveryError> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(Courier::is_available)
            .collect())
    }

    async fn get_all(&self) -> Result<Vec<Courier>, DeliveryError> {
        self.uow
            .storage()
            .find_couriers(self.uow.transaction())
            .await
            .and_then(restore_all)
            .map_err(|e| DeliveryError::storage("get_all", "courier", e))
    }
}

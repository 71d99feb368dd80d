use serde::Serialize;
use uuid::Uuid;

use crate::domain::order::OrderStatus;
use crate::errors::DeliveryError;
use crate::persistence::UnitOfWorkFactory;
use crate::ports::CourierRepository;

// ============================================================================
// Queries - read-only views over committed state
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourierView {
    pub id: Uuid,
    pub name: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    pub id: Uuid,
    pub x: i32,
    pub y: i32,
}

pub struct GetAllCouriersHandler {
    uow_factory: UnitOfWorkFactory,
}

impl GetAllCouriersHandler {
    pub fn new(uow_factory: UnitOfWorkFactory) -> Self {
        Self { uow_factory }
    }

    pub async fn handle(&self) -> Result<Vec<CourierView>, DeliveryError> {
        let mut uow = self.uow_factory.create();
        let couriers = uow.couriers().get_all().await?;

        Ok(couriers
            .iter()
            .map(|courier| CourierView {
                id: courier.id(),
                name: courier.name().to_string(),
                x: courier.location().x(),
                y: courier.location().y(),
            })
            .collect())
    }
}

/// Orders still in Created or Assigned.
pub struct GetUncompletedOrdersHandler {
    uow_factory: UnitOfWorkFactory,
}

impl GetUncompletedOrdersHandler {
    pub fn new(uow_factory: UnitOfWorkFactory) -> Self {
        Self { uow_factory }
    }

    pub async fn handle(&self) -> Result<Vec<OrderView>, DeliveryError> {
        let mut uow = self.uow_factory.create();
        let orders = uow
            .orders()
            .get_all_in_statuses(&[OrderStatus::Created, OrderStatus::Assigned])
            .await?;

        Ok(orders
            .iter()
            .map(|order| OrderView {
                id: order.id(),
                x: order.location().x(),
                y: order.location().y(),
            })
            .collect())
    }
}

use uuid::Uuid;

use crate::domain::courier::Courier;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::services::DispatchService;
use crate::errors::DeliveryError;
use crate::persistence::{UnitOfWork, UnitOfWorkFactory};
use crate::ports::{CourierRepository, OrderRepository};

// ============================================================================
// Assign Order
// ============================================================================
//
// Takes the oldest Created order, dispatches it among the couriers with a
// free slot, and persists the assigned order together with the courier that
// now holds it in a single transaction.
//
// The order and couriers are read before the transaction opens. If a move
// cycle changes one of them first, the save fails with Conflict and the
// order stays Created for the next cycle.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub order_id: Uuid,
    pub courier_id: Uuid,
}

pub struct AssignOrderHandler {
    uow_factory: UnitOfWorkFactory,
    dispatch: DispatchService,
}

impl AssignOrderHandler {
    pub fn new(uow_factory: UnitOfWorkFactory) -> Self {
        Self {
            uow_factory,
            dispatch: DispatchService::new(),
        }
    }

    pub async fn handle(&self) -> Result<Assignment, DeliveryError> {
        let mut uow = self.uow_factory.create();

        let mut order = uow
            .orders()
            .get_first_in_status(OrderStatus::Created)
            .await?
            .ok_or_else(|| DeliveryError::not_found("order in status Created", None))?;

        let mut couriers = uow.couriers().get_all_available().await?;
        if couriers.is_empty() {
            return Err(DeliveryError::not_found("available courier", None));
        }

        let courier = match self.dispatch.dispatch(&mut order, &mut couriers) {
            Ok(courier) => courier,
            Err(e) => {
                self.uow_factory.metrics().dispatch_failures.inc();
                tracing::warn!(order_id = %order.id(), error = %e, "Dispatch failed");
                return Err(e.into());
            }
        };

        uow.begin().await?;
        let result = save_assignment(&mut uow, &mut order, courier).await;
        uow.finish(result).await?;

        let assignment = Assignment {
            order_id: order.id(),
            courier_id: courier.id(),
        };

        self.uow_factory.metrics().orders_assigned.inc();
        tracing::info!(
            order_id = %assignment.order_id,
            courier_id = %assignment.courier_id,
            courier = %courier.name(),
            "🎯 Order assigned"
        );

        Ok(assignment)
    }
}

async fn save_assignment(
    uow: &mut UnitOfWork,
    order: &mut Order,
    courier: &mut Courier,
) -> Result<(), DeliveryError> {
    uow.orders().update(order).await?;
    uow.couriers().update(courier).await?;
    Ok(())
}

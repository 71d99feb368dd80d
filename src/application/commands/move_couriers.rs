use crate::domain::order::{Order, OrderStatus};
use crate::errors::DeliveryError;
use crate::persistence::{UnitOfWork, UnitOfWorkFactory};
use crate::ports::{CourierRepository, OrderRepository};

// ============================================================================
// Move Couriers
// ============================================================================
//
// One step for every Assigned order, all in a single transaction:
// - courier exactly on the order's location: complete the order and free
//   the slot (raises OrderStatusChanged, published after commit)
// - otherwise: move the courier one step towards the order
//
// Couriers are re-read inside the transaction, so a courier carrying several
// orders sees its own earlier step from the same cycle.
//
// Any failure aborts the whole cycle; nothing from it is persisted. A courier
// changed by a concurrent assignment fails the cycle with Conflict rather
// than overwriting the slot that assignment filled.
//
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveReport {
    pub moved: usize,
    pub completed: usize,
}

pub struct MoveCouriersHandler {
    uow_factory: UnitOfWorkFactory,
}

impl MoveCouriersHandler {
    pub fn new(uow_factory: UnitOfWorkFactory) -> Self {
        Self { uow_factory }
    }

    pub async fn handle(&self) -> Result<MoveReport, DeliveryError> {
        let mut uow = self.uow_factory.create();

        let orders = uow.orders().get_all_in_status(OrderStatus::Assigned).await?;
        if orders.is_empty() {
            return Ok(MoveReport::default());
        }

        uow.begin().await?;
        let result = step_all(&mut uow, orders).await;
        let report = uow.finish(result).await?;

        let metrics = self.uow_factory.metrics();
        metrics.courier_moves.inc_by(report.moved as u64);
        metrics.orders_completed.inc_by(report.completed as u64);

        tracing::debug!(moved = report.moved, completed = report.completed, "Move cycle done");
        Ok(report)
    }
}

async fn step_all(uow: &mut UnitOfWork, orders: Vec<Order>) -> Result<MoveReport, DeliveryError> {
    let mut report = MoveReport::default();

    for mut order in orders {
        let courier_id = order.courier_id().ok_or_else(|| DeliveryError::Business {
            operation: "move courier",
            reason: format!("assigned order {} has no courier", order.id()),
        })?;

        let mut courier = uow
            .couriers()
            .get(courier_id)
            .await?
            .ok_or_else(|| DeliveryError::not_found("courier", Some(courier_id)))?;

        if courier.location() == order.location() {
            courier.complete_order(&mut order)?;
            report.completed += 1;
            tracing::info!(
                order_id = %order.id(),
                courier_id = %courier_id,
                "✅ Order delivered"
            );
        } else {
            courier.move_towards(order.location())?;
            report.moved += 1;
            tracing::debug!(
                courier_id = %courier_id,
                order_id = %order.id(),
                x = courier.location().x(),
                y = courier.location().y(),
                "Courier moved"
            );
        }

        uow.couriers().update(&mut courier).await?;
        uow.orders().update(&mut order).await?;
    }

    Ok(report)
}

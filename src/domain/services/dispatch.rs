use uuid::Uuid;

use crate::domain::courier::{Courier, CourierError};
use crate::domain::order::{Order, OrderError, OrderStatus};

// ============================================================================
// Dispatch Service
// ============================================================================
//
// Matches one Created order to the courier that can reach it soonest among
// those with a free slot large enough for it.
//
// Ranking key is Courier::calculate_time_to_location. The first courier with
// the smallest time wins; there is no secondary tie-break.
//
// On success both aggregates are mutated in memory (order assigned, slot
// filled). Nothing is undone if the second step fails; persistence happens
// only when the caller commits its unit of work.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("Order {order_id} cannot be dispatched in status {status}")]
    InvalidOrder { order_id: Uuid, status: OrderStatus },

    #[error("No couriers supplied for dispatch")]
    NoCouriers,

    #[error("No courier can take order {order_id}")]
    NoSuitableCourier { order_id: Uuid },

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Courier(#[from] CourierError),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DispatchService;

impl DispatchService {
    pub fn new() -> Self {
        Self
    }

    /// Assign `order` to the best courier in `couriers` and return that courier.
    pub fn dispatch<'a>(
        &self,
        order: &mut Order,
        couriers: &'a mut [Courier],
    ) -> Result<&'a mut Courier, DispatchError> {
        if order.status() != OrderStatus::Created {
            return Err(DispatchError::InvalidOrder {
                order_id: order.id(),
                status: order.status(),
            });
        }
        if couriers.is_empty() {
            return Err(DispatchError::NoCouriers);
        }

        let mut best: Option<(usize, f64)> = None;
        for (index, courier) in couriers.iter().enumerate() {
            if !courier.can_take_order(order) {
                continue;
            }

            let time = courier.calculate_time_to_location(order.location());
            match best {
                Some((_, best_time)) if time >= best_time => {}
                _ => best = Some((index, time)),
            }
        }

        let (index, time) = best.ok_or(DispatchError::NoSuitableCourier {
            order_id: order.id(),
        })?;

        let winner = &mut couriers[index];
        order.assign(winner.id())?;
        winner.take_order(order)?;

        tracing::debug!(
            order_id = %order.id(),
            courier_id = %winner.id(),
            time_to_location = time,
            "Order dispatched to courier"
        );

        Ok(winner)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kernel::Location;

    fn location(x: i32, y: i32) -> Location {
        Location::new(x, y).unwrap()
    }

    fn courier(name: &str, x: i32, y: i32, slot_volume: i32) -> Courier {
        let mut courier = Courier::new(name, 1, location(x, y)).unwrap();
        courier.add_storage_place("bag", slot_volume).unwrap();
        courier
    }

    fn order_at(x: i32, y: i32, volume: i32) -> Order {
        Order::new(Uuid::new_v4(), location(x, y), volume).unwrap()
    }

    #[test]
    fn test_dispatch_picks_fastest_courier() {
        let mut order = order_at(5, 5, 1);
        // times 2.0, 1.0, 3.0 at speed 1
        let mut couriers = vec![
            courier("two", 3, 5, 10),
            courier("one", 5, 4, 10),
            courier("three", 8, 5, 10),
        ];
        let expected = couriers[1].id();

        let winner = DispatchService::new().dispatch(&mut order, &mut couriers).unwrap();

        assert_eq!(winner.id(), expected);
        assert_eq!(order.status(), OrderStatus::Assigned);
        assert_eq!(order.courier_id(), Some(expected));
        assert_eq!(couriers[1].storage_places()[0].order_id(), Some(order.id()));
        assert!(!couriers[0].storage_places()[0].is_occupied());
    }

    #[test]
    fn test_dispatch_equal_times_first_wins() {
        let mut order = order_at(5, 5, 1);
        let mut couriers = vec![
            courier("left", 4, 5, 10),
            courier("right", 6, 5, 10),
            courier("above", 5, 6, 10),
        ];
        let expected = couriers[0].id();

        let winner = DispatchService::new().dispatch(&mut order, &mut couriers).unwrap();

        assert_eq!(winner.id(), expected);
    }

    #[test]
    fn test_dispatch_courier_on_target_is_eligible() {
        let mut order = order_at(5, 5, 1);
        let mut couriers = vec![courier("far", 1, 1, 10), courier("here", 5, 5, 10)];
        let expected = couriers[1].id();

        let winner = DispatchService::new().dispatch(&mut order, &mut couriers).unwrap();

        assert_eq!(winner.id(), expected);
    }

    #[test]
    fn test_dispatch_single_courier_at_target() {
        let mut order = order_at(5, 5, 1);
        let mut couriers = vec![courier("here", 5, 5, 10)];

        let winner = DispatchService::new().dispatch(&mut order, &mut couriers).unwrap();

        assert_eq!(winner.calculate_time_to_location(order.location()), 0.0);
        assert_eq!(order.status(), OrderStatus::Assigned);
    }

    #[test]
    fn test_dispatch_skips_couriers_without_room() {
        let mut order = order_at(5, 5, 6);
        let mut couriers = vec![courier("close_but_small", 5, 5, 2), courier("far", 1, 1, 10)];
        let expected = couriers[1].id();

        let winner = DispatchService::new().dispatch(&mut order, &mut couriers).unwrap();

        assert_eq!(winner.id(), expected);
    }

    #[test]
    fn test_dispatch_rejects_order_not_created() {
        let mut order = order_at(5, 5, 1);
        order.assign(Uuid::new_v4()).unwrap();
        let mut couriers = vec![courier("a", 1, 1, 10)];

        let err = DispatchService::new().dispatch(&mut order, &mut couriers).unwrap_err();

        assert_eq!(
            err,
            DispatchError::InvalidOrder { order_id: order.id(), status: OrderStatus::Assigned }
        );
        assert!(!couriers[0].storage_places()[0].is_occupied());
    }

    #[test]
    fn test_dispatch_rejects_empty_courier_list() {
        let mut order = order_at(5, 5, 1);

        let err = DispatchService::new().dispatch(&mut order, &mut []).unwrap_err();

        assert_eq!(err, DispatchError::NoCouriers);
        assert_eq!(order.status(), OrderStatus::Created);
    }

    #[test]
    fn test_dispatch_fails_when_nobody_fits() {
        let mut order = order_at(5, 5, 20);
        let mut couriers = vec![courier("a", 1, 1, 10), courier("b", 2, 2, 5)];

        let err = DispatchService::new().dispatch(&mut order, &mut couriers).unwrap_err();

        assert_eq!(err, DispatchError::NoSuitableCourier { order_id: order.id() });
        assert_eq!(order.status(), OrderStatus::Created);
        assert_eq!(order.courier_id(), None);
    }
}

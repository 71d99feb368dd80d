use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::courier::Courier;
use crate::domain::order::{Order, OrderStatus};
use crate::errors::DeliveryError;

/// Order store.
///
/// `add` and `update` take the aggregate mutably so its raised events can be
/// handed to the enclosing unit of work.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn add(&mut self, order: &mut Order) -> Result<(), DeliveryError>;

    async fn update(&mut self, order: &mut Order) -> Result<(), DeliveryError>;

    async fn get(&self, id: Uuid) -> Result<Option<Order>, DeliveryError>;

    /// Oldest order (insertion order) in `status`.
    async fn get_first_in_status(&self, status: OrderStatus) -> Result<Option<Order>, DeliveryError>;

    async fn get_all_in_status(&self, status: OrderStatus) -> Result<Vec<Order>, DeliveryError>;
}

/// Courier store.
#[async_trait]
pub trait CourierRepository: Send + Sync {
    async fn add(&mut self, courier: &mut Courier) -> Result<(), DeliveryError>;

    async fn update(&mut self, courier: &mut Courier) -> Result<(), DeliveryError>;

    async fn get(&self, id: Uuid) -> Result<Option<Courier>, DeliveryError>;

    /// Couriers with at least one free storage place.
    async fn get_all_available(&self) -> Result<Vec<Courier>, DeliveryError>;

    async fn get_all(&self) -> Result<Vec<Courier>, DeliveryError>;
}

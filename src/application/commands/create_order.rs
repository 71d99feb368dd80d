use std::sync::Arc;
use uuid::Uuid;

use crate::domain::order::Order;
use crate::errors::DeliveryError;
use crate::persistence::UnitOfWorkFactory;
use crate::ports::{GeoClient, OrderRepository};
use crate::utils::{retry_with_backoff, RetryConfig};

// ============================================================================
// Create Order
// ============================================================================
//
// Orders arrive with a street address. The street is resolved to a grid
// Location through the geolocation collaborator (retried with backoff) before
// the order is built and stored.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    order_id: Uuid,
    street: String,
    volume: i32,
}

impl CreateOrderCommand {
    pub fn new(order_id: Uuid, street: impl Into<String>, volume: i32) -> Result<Self, DeliveryError> {
        let street = street.into();
        if order_id.is_nil() {
            return Err(DeliveryError::validation("order_id", "must not be nil"));
        }
        if street.trim().is_empty() {
            return Err(DeliveryError::validation("street", "must not be empty"));
        }
        if volume <= 0 {
            return Err(DeliveryError::validation("volume", "must be greater than zero"));
        }

        Ok(Self { order_id, street, volume })
    }

    pub fn order_id(&self) -> Uuid {
        self.order_id
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn volume(&self) -> i32 {
        self.volume
    }
}

pub struct CreateOrderHandler {
    uow_factory: UnitOfWorkFactory,
    geo: Arc<dyn GeoClient>,
    retry: RetryConfig,
}

impl CreateOrderHandler {
    pub fn new(uow_factory: UnitOfWorkFactory, geo: Arc<dyn GeoClient>) -> Self {
        Self {
            uow_factory,
            geo,
            retry: RetryConfig::lookup(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the new order's id. An id that already exists is a Conflict.
    pub async fn handle(&self, command: CreateOrderCommand) -> Result<Uuid, DeliveryError> {
        let mut uow = self.uow_factory.create();

        if uow.orders().get(command.order_id()).await?.is_some() {
            return Err(DeliveryError::Conflict {
                resource: "order",
                id: command.order_id().to_string(),
                reason: "already exists".to_string(),
            });
        }

        let geo = self.geo.as_ref();
        let street = command.street();
        let location = retry_with_backoff(self.retry.clone(), move |_attempt| geo.get_location(street))
            .await
            .into_result()
            .map_err(|source| DeliveryError::Collaborator {
                operation: "geolocation lookup",
                source,
            })?;

        let mut order = Order::new(command.order_id(), location, command.volume())?;
        uow.orders().add(&mut order).await?;

        self.uow_factory.metrics().orders_created.inc();
        tracing::info!(
            order_id = %order.id(),
            x = location.x(),
            y = location.y(),
            volume = order.volume(),
            "📦 Order created"
        );

        Ok(order.id())
    }
}

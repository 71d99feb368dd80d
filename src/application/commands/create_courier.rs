use uuid::Uuid;

use crate::domain::courier::Courier;
use crate::domain::kernel::Location;
use crate::errors::DeliveryError;
use crate::persistence::UnitOfWorkFactory;
use crate::ports::CourierRepository;

#[derive(Debug, Clone)]
pub struct CreateCourierCommand {
    name: String,
    speed: i32,
}

impl CreateCourierCommand {
    pub fn new(name: impl Into<String>, speed: i32) -> Result<Self, DeliveryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DeliveryError::validation("name", "must not be empty"));
        }
        if speed <= 0 {
            return Err(DeliveryError::validation("speed", "must be greater than zero"));
        }

        Ok(Self { name, speed })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }
}

/// Creates a courier at a random grid location, without storage places.
pub struct CreateCourierHandler {
    uow_factory: UnitOfWorkFactory,
}

impl CreateCourierHandler {
    pub fn new(uow_factory: UnitOfWorkFactory) -> Self {
        Self { uow_factory }
    }

    pub async fn handle(&self, command: CreateCourierCommand) -> Result<Uuid, DeliveryError> {
        let mut courier = Courier::new(command.name, command.speed, Location::random())?;

        let mut uow = self.uow_factory.create();
        uow.couriers().add(&mut courier).await?;

        tracing::info!(
            courier_id = %courier.id(),
            name = %courier.name(),
            speed = courier.speed(),
            x = courier.location().x(),
            y = courier.location().y(),
            "🚴 Courier created"
        );

        Ok(courier.id())
    }
}

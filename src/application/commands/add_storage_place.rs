use uuid::Uuid;

use crate::errors::DeliveryError;
use crate::persistence::UnitOfWorkFactory;
use crate::ports::CourierRepository;

#[derive(Debug, Clone)]
pub struct AddStoragePlaceCommand {
    courier_id: Uuid,
    name: String,
    volume: i32,
}

impl AddStoragePlaceCommand {
    pub fn new(courier_id: Uuid, name: impl Into<String>, volume: i32) -> Result<Self, DeliveryError> {
        let name = name.into();
        if courier_id.is_nil() {
            return Err(DeliveryError::validation("courier_id", "must not be nil"));
        }
        if name.trim().is_empty() {
            return Err(DeliveryError::validation("name", "must not be empty"));
        }
        if volume <= 0 {
            return Err(DeliveryError::validation("volume", "must be greater than zero"));
        }

        Ok(Self { courier_id, name, volume })
    }
}

pub struct AddStoragePlaceHandler {
    uow_factory: UnitOfWorkFactory,
}

impl AddStoragePlaceHandler {
    pub fn new(uow_factory: UnitOfWorkFactory) -> Self {
        Self { uow_factory }
    }

    /// Returns the id of the new storage place.
    pub async fn handle(&self, command: AddStoragePlaceCommand) -> Result<Uuid, DeliveryError> {
        let mut uow = self.uow_factory.create();

        let mut courier = uow
            .couriers()
            .get(command.courier_id)
            .await?
            .ok_or_else(|| DeliveryError::not_found("courier", Some(command.courier_id)))?;

        let place_id = courier.add_storage_place(command.name, command.volume)?;
        uow.couriers().update(&mut courier).await?;

        tracing::debug!(
            courier_id = %courier.id(),
            storage_place_id = %place_id,
            volume = command.volume,
            "Storage place added"
        );

        Ok(place_id)
    }
}

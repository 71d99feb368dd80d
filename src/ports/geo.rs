use async_trait::async_trait;

use crate::domain::kernel::Location;

/// Geolocation lookup used when an order arrives with a street address.
#[async_trait]
pub trait GeoClient: Send + Sync {
    async fn get_location(&self, street: &str) -> anyhow::Result<Location>;
}

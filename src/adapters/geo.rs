use async_trait::async_trait;

use crate::domain::kernel::Location;
use crate::ports::GeoClient;

/// Stand-in geolocation service: any non-blank street maps to a random cell.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomGeoClient;

#[async_trait]
impl GeoClient for RandomGeoClient {
    async fn get_location(&self, street: &str) -> anyhow::Result<Location> {
        if street.trim().is_empty() {
            anyhow::bail!("street is required for a geolocation lookup");
        }

        let location = Location::random();
        tracing::debug!(street = %street, x = location.x(), y = location.y(), "Resolved street");
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_stays_on_grid() {
        let client = RandomGeoClient;
        for _ in 0..50 {
            let location = client.get_location("Tverskaya").await.unwrap();
            assert!(Location::new(location.x(), location.y()).is_ok());
        }
    }

    #[tokio::test]
    async fn test_blank_street_rejected() {
        assert!(RandomGeoClient.get_location("  ").await.is_err());
    }
}

use uuid::Uuid;

use crate::domain::courier::CourierError;
use crate::domain::kernel::LocationError;
use crate::domain::order::OrderError;
use crate::domain::services::DispatchError;
use crate::persistence::StorageError;

// ============================================================================
// Application Error Taxonomy
// ============================================================================
//
// Domain errors are precise but numerous. Use cases return DeliveryError,
// whose kind() tells a caller how to map a failure to a user-facing status:
//
// - Validation: malformed input or a broken value-object invariant
// - NotFound:   nothing to work on (no such courier, no Created order)
// - Business:   a rule refused the operation (no room, wrong status)
// - Conflict:   the entity already exists, or another use case changed it
//               first (retrying on fresh state may succeed)
// - Storage:    the backing store failed; cause kept as source
// - External:   a collaborator (geolocation, event sink) failed
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Business,
    Conflict,
    Storage,
    External,
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("{resource} not found{}", display_id(.id))]
    NotFound { resource: &'static str, id: Option<Uuid> },

    #[error("Cannot {operation}: {reason}")]
    Business { operation: &'static str, reason: String },

    #[error("{resource} {id} conflicts: {reason}")]
    Conflict { resource: &'static str, id: String, reason: String },

    #[error("Storage failure during {operation} on {entity}: {source}")]
    Storage {
        operation: &'static str,
        entity: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("Collaborator failure during {operation}: {source}")]
    Collaborator {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

fn display_id(id: &Option<Uuid>) -> String {
    id.map(|id| format!(" ({id})")).unwrap_or_default()
}

impl DeliveryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeliveryError::Validation { .. } => ErrorKind::Validation,
            DeliveryError::NotFound { .. } => ErrorKind::NotFound,
            DeliveryError::Business { .. } => ErrorKind::Business,
            DeliveryError::Conflict { .. } => ErrorKind::Conflict,
            DeliveryError::Storage { .. } => ErrorKind::Storage,
            DeliveryError::Collaborator { .. } => ErrorKind::External,
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        DeliveryError::Validation { field, message: message.into() }
    }

    pub fn not_found(resource: &'static str, id: Option<Uuid>) -> Self {
        DeliveryError::NotFound { resource, id }
    }

    /// Wrap a storage failure. Duplicate rows and version conflicts keep their
    /// meaning as Conflict, missing rows as NotFound; everything else stays
    /// opaque.
    pub fn storage(operation: &'static str, entity: &'static str, source: StorageError) -> Self {
        match source {
            StorageError::Duplicate { entity, id } => DeliveryError::Conflict {
                resource: entity,
                id: id.to_string(),
                reason: "already exists".to_string(),
            },
            StorageError::Conflict { entity, id, expected, found } => DeliveryError::Conflict {
                resource: entity,
                id: id.to_string(),
                reason: format!("modified concurrently (expected version {expected}, found {found})"),
            },
            StorageError::Missing { entity, id } => DeliveryError::NotFound {
                resource: entity,
                id: Some(id),
            },
            source => DeliveryError::Storage { operation, entity, source },
        }
    }
}

impl From<LocationError> for DeliveryError {
    fn from(err: LocationError) -> Self {
        DeliveryError::validation("location", err.to_string())
    }
}

impl From<OrderError> for DeliveryError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::InvalidOrderId => DeliveryError::validation("order_id", err.to_string()),
            OrderError::InvalidVolume(_) => DeliveryError::validation("volume", err.to_string()),
            OrderError::InvalidCourierId => DeliveryError::validation("courier_id", err.to_string()),
            OrderError::CourierNotAssigned(_) => DeliveryError::Business {
                operation: "complete order",
                reason: err.to_string(),
            },
            OrderError::InvalidStatusTransition { .. } => DeliveryError::Business {
                operation: "change order status",
                reason: err.to_string(),
            },
        }
    }
}

impl From<CourierError> for DeliveryError {
    fn from(err: CourierError) -> Self {
        match err {
            CourierError::Order(inner) => inner.into(),
            CourierError::Location(inner) => inner.into(),
            CourierError::EmptyName => DeliveryError::validation("name", err.to_string()),
            CourierError::InvalidSpeed(_) => DeliveryError::validation("speed", err.to_string()),
            CourierError::EmptyStoragePlaceName => {
                DeliveryError::validation("storage_place.name", err.to_string())
            }
            CourierError::InvalidStorageVolume(_) => {
                DeliveryError::validation("storage_place.volume", err.to_string())
            }
            CourierError::InvalidOrderId => DeliveryError::validation("order_id", err.to_string()),
            CourierError::OrderNotFound(order_id) => {
                DeliveryError::not_found("stored order", Some(order_id))
            }
            CourierError::CannotStore { .. }
            | CourierError::WrongOrder { .. }
            | CourierError::NoCapacity { .. } => DeliveryError::Business {
                operation: "store order",
                reason: err.to_string(),
            },
        }
    }
}

impl From<DispatchError> for DeliveryError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Order(inner) => inner.into(),
            DispatchError::Courier(inner) => inner.into(),
            DispatchError::InvalidOrder { .. } => DeliveryError::validation("order", err.to_string()),
            DispatchError::NoCouriers => DeliveryError::validation("couriers", err.to_string()),
            DispatchError::NoSuitableCourier { order_id } => {
                DeliveryError::not_found("suitable courier for order", Some(order_id))
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderStatus;

    #[test]
    fn test_domain_errors_are_classified() {
        let cases: Vec<(DeliveryError, ErrorKind)> = vec![
            (LocationError::OutOfRange { x: 0, y: 3 }.into(), ErrorKind::Validation),
            (OrderError::InvalidVolume(0).into(), ErrorKind::Validation),
            (OrderError::CourierNotAssigned(Uuid::new_v4()).into(), ErrorKind::Business),
            (CourierError::EmptyName.into(), ErrorKind::Validation),
            (
                CourierError::NoCapacity { courier_id: Uuid::new_v4(), volume: 3 }.into(),
                ErrorKind::Business,
            ),
            (CourierError::OrderNotFound(Uuid::new_v4()).into(), ErrorKind::NotFound),
            (DispatchError::NoCouriers.into(), ErrorKind::Validation),
            (
                DispatchError::NoSuitableCourier { order_id: Uuid::new_v4() }.into(),
                ErrorKind::NotFound,
            ),
        ];

        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }

    #[test]
    fn test_wrapped_errors_keep_inner_classification() {
        let err: DeliveryError =
            CourierError::Location(LocationError::OutOfRange { x: 11, y: 1 }).into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: DeliveryError = DispatchError::Order(OrderError::InvalidStatusTransition {
            from: OrderStatus::Completed,
            to: OrderStatus::Assigned,
        })
        .into();
        assert_eq!(err.kind(), ErrorKind::Business);
    }

    #[test]
    fn test_storage_errors_keep_meaning_where_possible() {
        let id = Uuid::new_v4();

        let duplicate = DeliveryError::storage("add", "order", StorageError::Duplicate { entity: "order", id });
        assert_eq!(duplicate.kind(), ErrorKind::Conflict);

        let missing = DeliveryError::storage("update", "courier", StorageError::Missing { entity: "courier", id });
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        let stale = DeliveryError::storage(
            "update",
            "courier",
            StorageError::Conflict { entity: "courier", id, expected: 3, found: 4 },
        );
        assert_eq!(stale.kind(), ErrorKind::Conflict);
        assert!(stale.to_string().contains("expected version 3"));

        let corrupt = DeliveryError::storage(
            "get",
            "order",
            StorageError::Corrupt { entity: "order", id, reason: "off grid".into() },
        );
        assert_eq!(corrupt.kind(), ErrorKind::Storage);

        let failed = DeliveryError::storage("commit", "transaction", StorageError::CommitFailed("disk full".into()));
        assert_eq!(failed.kind(), ErrorKind::Storage);
        assert!(std::error::Error::source(&failed).is_some());
    }

    #[test]
    fn test_not_found_message() {
        let id = Uuid::new_v4();
        assert_eq!(
            DeliveryError::not_found("courier", Some(id)).to_string(),
            format!("courier not found ({id})")
        );
        assert_eq!(
            DeliveryError::not_found("order in status Created", None).to_string(),
            "order in status Created not found"
        );
    }
}

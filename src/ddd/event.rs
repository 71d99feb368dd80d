use serde::{de::DeserializeOwned, Serialize};
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;
use uuid::Uuid;
use anyhow::Result;

// ============================================================================
// Domain Event Trait
// ============================================================================

/// A fact raised by an aggregate after a successful state change.
///
/// Events travel through the unit of work and the mediator as trait objects,
/// so handlers recover the concrete type through [`DomainEvent::as_any`].
pub trait DomainEvent: Debug + Send + Sync + 'static {
    fn event_id(&self) -> Uuid;

    /// Routing key used by the mediator.
    fn event_name(&self) -> &'static str;

    fn aggregate_id(&self) -> Uuid;

    fn as_any(&self) -> &(dyn Any + Send + Sync);
}

pub type SharedEvent = Arc<dyn DomainEvent>;

// ============================================================================
// Event Serialization Helpers
// ============================================================================

pub fn serialize_event<E: Serialize>(event: &E) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}

pub fn deserialize_event<E: DeserializeOwned>(json: &str) -> Result<E> {
    Ok(serde_json::from_str(json)?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    struct TestEvent {
        id: Uuid,
        data: String,
    }

    impl DomainEvent for TestEvent {
        fn event_id(&self) -> Uuid { self.id }
        fn event_name(&self) -> &'static str { "test.event" }
        fn aggregate_id(&self) -> Uuid { Uuid::nil() }
        fn as_any(&self) -> &(dyn Any + Send + Sync) { self }
    }

    #[test]
    fn test_event_serialization() {
        let event = TestEvent {
            id: Uuid::new_v4(),
            data: "test data".to_string(),
        };

        let json = serialize_event(&event).unwrap();
        let deserialized: TestEvent = deserialize_event(&json).unwrap();

        assert_eq!(event, deserialized);
    }

    #[test]
    fn test_shared_event_downcast() {
        let id = Uuid::new_v4();
        let shared: SharedEvent = Arc::new(TestEvent {
            id,
            data: "payload".to_string(),
        });

        assert_eq!(shared.event_name(), "test.event");
        let concrete = shared.as_any().downcast_ref::<TestEvent>().unwrap();
        assert_eq!(concrete.id, id);
        assert_eq!(concrete.data, "payload");
    }
}

use async_trait::async_trait;
use std::sync::Arc;

use crate::ddd::{DomainEvent, EventHandler};
use crate::domain::order::OrderStatusChanged;
use crate::ports::OrderStatusProducer;
use crate::utils::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError};

// ============================================================================
// OrderStatusChanged -> external messaging
// ============================================================================
//
// Subscribed to OrderStatusChanged::NAME. Forwards each event to the producer
// through a circuit breaker so a dead sink is not hammered on every commit.
// Failures go back to the mediator, which the unit of work only logs.
//
// ============================================================================

pub struct OrderStatusChangedHandler {
    producer: Arc<dyn OrderStatusProducer>,
    circuit_breaker: CircuitBreaker,
}

impl OrderStatusChangedHandler {
    pub fn new(producer: Arc<dyn OrderStatusProducer>) -> Self {
        Self::with_circuit_breaker(producer, CircuitBreakerConfig::default())
    }

    pub fn with_circuit_breaker(producer: Arc<dyn OrderStatusProducer>, config: CircuitBreakerConfig) -> Self {
        Self {
            producer,
            circuit_breaker: CircuitBreaker::new("order-status-producer", config),
        }
    }
}

#[async_trait]
impl EventHandler for OrderStatusChangedHandler {
    async fn handle(&self, event: &dyn DomainEvent) -> anyhow::Result<()> {
        let Some(changed) = event.as_any().downcast_ref::<OrderStatusChanged>() else {
            anyhow::bail!(
                "unexpected event '{}' ({}), expected {}",
                event.event_name(),
                event.event_id(),
                OrderStatusChanged::NAME
            );
        };

        match self.circuit_breaker.call(self.producer.publish(changed)).await {
            Ok(()) => Ok(()),
            Err(CircuitBreakerError::CircuitOpen(name)) => {
                tracing::warn!(
                    order_id = %changed.order_id,
                    circuit = name,
                    "Circuit open, order status change not forwarded"
                );
                anyhow::bail!("circuit '{name}' is open")
            }
            Err(CircuitBreakerError::OperationFailed(e)) => Err(e.context(format!(
                "failed to forward status change of order {}",
                changed.order_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderStatus;
    use std::any::Any;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingProducer {
        published: Mutex<Vec<OrderStatusChanged>>,
    }

    #[async_trait]
    impl OrderStatusProducer for RecordingProducer {
        async fn publish(&self, event: &OrderStatusChanged) -> anyhow::Result<()> {
            self.published.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct BrokenProducer {
        calls: AtomicU32,
    }

    #[async_trait]
    impl OrderStatusProducer for BrokenProducer {
        async fn publish(&self, _event: &OrderStatusChanged) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("broker unreachable")
        }
    }

    #[derive(Debug)]
    struct Unrelated;

    impl DomainEvent for Unrelated {
        fn event_id(&self) -> Uuid { Uuid::nil() }
        fn event_name(&self) -> &'static str { "unrelated" }
        fn aggregate_id(&self) -> Uuid { Uuid::nil() }
        fn as_any(&self) -> &(dyn Any + Send + Sync) { self }
    }

    #[tokio::test]
    async fn test_forwards_status_change() {
        let producer = Arc::new(RecordingProducer::default());
        let handler = OrderStatusChangedHandler::new(producer.clone());
        let event = OrderStatusChanged::new(Uuid::new_v4(), OrderStatus::Completed);

        handler.handle(&event).await.unwrap();

        assert_eq!(*producer.published.lock().unwrap(), vec![event]);
    }

    #[tokio::test]
    async fn test_rejects_other_events() {
        let producer = Arc::new(RecordingProducer::default());
        let handler = OrderStatusChangedHandler::new(producer.clone());

        assert!(handler.handle(&Unrelated).await.is_err());
        assert!(producer.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_circuit_stops_calling_producer() {
        let producer = Arc::new(BrokenProducer::default());
        let config = CircuitBreakerConfig {
            failure_threshold: 2,
            timeout: Duration::from_secs(60),
            success_threshold: 1,
        };
        let handler = OrderStatusChangedHandler::with_circuit_breaker(producer.clone(), config);
        let event = OrderStatusChanged::new(Uuid::new_v4(), OrderStatus::Completed);

        for _ in 0..4 {
            assert!(handler.handle(&event).await.is_err());
        }

        assert_eq!(producer.calls.load(Ordering::SeqCst), 2);
    }
}

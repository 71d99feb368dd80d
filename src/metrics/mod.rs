// Private module declaration
mod server;

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for the delivery core
// ============================================================================
//
// Counters for:
// - Order lifecycle (created, assigned, completed)
// - Courier movement steps
// - Dispatch attempts that found no courier
// - Domain event delivery (published, handler failures) per event name
// - Unit-of-work commits that failed
//
// Every unit of work and use case shares one Metrics (Arc). Each instance owns
// its own Registry, so tests can create as many as they like.
// ============================================================================

pub struct Metrics {
    registry: Registry,

    // Order lifecycle
    pub orders_created: IntCounter,
    pub orders_assigned: IntCounter,
    pub orders_completed: IntCounter,

    // Couriers
    pub courier_moves: IntCounter,
    pub dispatch_failures: IntCounter,

    // Domain events
    pub events_published: IntCounterVec,
    pub event_handler_failures: IntCounterVec,

    // Unit of work
    pub commit_failures: IntCounter,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_created = IntCounter::new("delivery_orders_created_total", "Total orders created")?;
        registry.register(Box::new(orders_created.clone()))?;

        let orders_assigned = IntCounter::new(
            "delivery_orders_assigned_total",
            "Total orders assigned to a courier",
        )?;
        registry.register(Box::new(orders_assigned.clone()))?;

        let orders_completed = IntCounter::new(
            "delivery_orders_completed_total",
            "Total orders delivered and completed",
        )?;
        registry.register(Box::new(orders_completed.clone()))?;

        let courier_moves = IntCounter::new(
            "delivery_courier_moves_total",
            "Total courier movement steps",
        )?;
        registry.register(Box::new(courier_moves.clone()))?;

        let dispatch_failures = IntCounter::new(
            "delivery_dispatch_failures_total",
            "Dispatch attempts that could not assign the order",
        )?;
        registry.register(Box::new(dispatch_failures.clone()))?;

        let events_published = IntCounterVec::new(
            Opts::new("delivery_events_published_total", "Domain events delivered to all handlers"),
            &["event_name"],
        )?;
        registry.register(Box::new(events_published.clone()))?;

        let event_handler_failures = IntCounterVec::new(
            Opts::new(
                "delivery_event_handler_failures_total",
                "Domain events whose delivery stopped at a failing handler",
            ),
            &["event_name"],
        )?;
        registry.register(Box::new(event_handler_failures.clone()))?;

        let commit_failures = IntCounter::new(
            "delivery_commit_failures_total",
            "Unit of work commits rejected by storage",
        )?;
        registry.register(Box::new(commit_failures.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            orders_assigned,
            orders_completed,
            courier_moves,
            dispatch_failures,
            events_published,
            event_handler_failures,
            commit_failures,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record the outcome of delivering one domain event
    pub fn record_event_delivery(&self, event_name: &str, success: bool) {
        if success {
            self.events_published.with_label_values(&[event_name]).inc();
        } else {
            self.event_handler_failures.with_label_values(&[event_name]).inc();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        metrics.orders_created.inc();
        assert!(!metrics.registry.gather().is_empty());
    }

    #[test]
    fn test_independent_registries() {
        let first = Metrics::new().unwrap();
        let second = Metrics::new().unwrap();

        first.orders_assigned.inc();

        assert_eq!(first.orders_assigned.get(), 1);
        assert_eq!(second.orders_assigned.get(), 0);
    }

    #[test]
    fn test_record_event_delivery() {
        let metrics = Metrics::new().unwrap();
        metrics.record_event_delivery("order.status.changed", true);
        metrics.record_event_delivery("order.status.changed", true);
        metrics.record_event_delivery("order.status.changed", false);

        let gathered = metrics.registry.gather();
        let published = gathered
            .iter()
            .find(|m| m.name() == "delivery_events_published_total")
            .unwrap();
        assert_eq!(published.metric[0].counter.value, Some(2.0));
        assert_eq!(
            metrics
                .event_handler_failures
                .with_label_values(&["order.status.changed"])
                .get(),
            1
        );
    }
}

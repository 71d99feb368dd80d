use anyhow::{Context, Result};
use serde::Serialize;
use std::str::FromStr;
use std::time::Duration;

// ============================================================================
// Configuration - environment driven, every value optional
// ============================================================================
//
// DELIVERY_ASSIGN_INTERVAL_MS   assign trigger period      (1000)
// DELIVERY_MOVE_INTERVAL_MS     move trigger period        (2000)
// DELIVERY_METRICS_PORT         /metrics and /health port  (9090)
// DELIVERY_HTTP_PORT            /api/v1 port               (8080)
// DELIVERY_ORDER_CHANGED_TOPIC  status change topic        ("order.status.changed")
// DELIVERY_SEED_COURIERS        couriers created at start  (3)
// DELIVERY_SEED_ORDERS          orders created at start    (5)
//
// A set but unparseable value is an error, not a silent default.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub assign_interval_ms: u64,
    pub move_interval_ms: u64,
    pub metrics_port: u16,
    pub http_port: u16,
    pub order_changed_topic: String,
    pub seed_couriers: usize,
    pub seed_orders: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assign_interval_ms: 1000,
            move_interval_ms: 2000,
            metrics_port: 9090,
            http_port: 8080,
            order_changed_topic: "order.status.changed".to_string(),
            seed_couriers: 3,
            seed_orders: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            assign_interval_ms: parse_or(&lookup, "DELIVERY_ASSIGN_INTERVAL_MS", defaults.assign_interval_ms)?,
            move_interval_ms: parse_or(&lookup, "DELIVERY_MOVE_INTERVAL_MS", defaults.move_interval_ms)?,
            metrics_port: parse_or(&lookup, "DELIVERY_METRICS_PORT", defaults.metrics_port)?,
            http_port: parse_or(&lookup, "DELIVERY_HTTP_PORT", defaults.http_port)?,
            order_changed_topic: lookup("DELIVERY_ORDER_CHANGED_TOPIC")
                .filter(|topic| !topic.trim().is_empty())
                .unwrap_or(defaults.order_changed_topic),
            seed_couriers: parse_or(&lookup, "DELIVERY_SEED_COURIERS", defaults.seed_couriers)?,
            seed_orders: parse_or(&lookup, "DELIVERY_SEED_ORDERS", defaults.seed_orders)?,
        };

        if config.assign_interval_ms == 0 || config.move_interval_ms == 0 {
            anyhow::bail!("scheduler intervals must be greater than zero");
        }

        Ok(config)
    }

    pub fn assign_interval(&self) -> Duration {
        Duration::from_millis(self.assign_interval_ms)
    }

    pub fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has invalid value '{raw}'")),
        None => Ok(default),
    }
}

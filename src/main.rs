use actix::prelude::*;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use delivery::actors::{JobScheduler, Shutdown};
use delivery::adapters::{RandomGeoClient, TracingOrderProducer};
use delivery::api::{self, ApiState};
use delivery::application::{
    AddStoragePlaceCommand, AddStoragePlaceHandler, AssignOrderHandler, CreateCourierCommand,
    CreateCourierHandler, CreateOrderCommand, CreateOrderHandler, GetAllCouriersHandler,
    GetUncompletedOrdersHandler, MoveCouriersHandler, OrderStatusChangedHandler,
};
use delivery::config::Config;
use delivery::ddd::Mediator;
use delivery::domain::order::OrderStatusChanged;
use delivery::metrics::{self, Metrics};
use delivery::persistence::{InMemoryStorage, UnitOfWorkFactory};

const COURIER_NAMES: [&str; 5] = ["Pedestrian", "Bicycle", "Scooter", "Car", "Van"];
const STREETS: [&str; 5] = ["Tverskaya", "Arbat", "Nevsky", "Lenina", "Sadovaya"];

#[actix::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,delivery=debug"))
        )
        .init();

    tracing::info!("🚀 Starting delivery service");

    let config = Config::from_env()?;
    tracing::info!(config = %serde_json::to_string(&config)?, "Configuration loaded");

    // === 1. Metrics ===
    let metrics = Arc::new(Metrics::new()?);
    let metrics_registry = Arc::new(metrics.registry().clone());
    let metrics_port = config.metrics_port;
    std::thread::spawn(move || {
        let system = actix_web::rt::System::new();
        if let Err(e) = system.block_on(metrics::start_metrics_server(metrics_registry, metrics_port)) {
            tracing::error!("Metrics server error: {}", e);
        }
    });

    // === 2. Event delivery ===
    let mediator = Arc::new(Mediator::new());
    let producer = Arc::new(TracingOrderProducer::new(config.order_changed_topic.clone())?);
    mediator
        .subscribe(
            Arc::new(OrderStatusChangedHandler::new(producer)),
            &[OrderStatusChanged::NAME],
        )
        .await;

    // === 3. Storage + unit of work ===
    let storage = Arc::new(InMemoryStorage::new());
    let uow_factory = UnitOfWorkFactory::new(storage, mediator, metrics.clone());

    // === 4. Seed data ===
    seed(&uow_factory, &config).await?;

    // === 5. HTTP API ===
    let api_state = ApiState::new(uow_factory.clone(), Arc::new(RandomGeoClient));
    let http_port = config.http_port;
    std::thread::spawn(move || {
        let system = actix_web::rt::System::new();
        if let Err(e) = system.block_on(api::start_api_server(api_state, http_port)) {
            tracing::error!("API server error: {}", e);
        }
    });

    // === 6. Scheduler ===
    let scheduler = JobScheduler::new(
        Arc::new(AssignOrderHandler::new(uow_factory.clone())),
        Arc::new(MoveCouriersHandler::new(uow_factory.clone())),
        config.assign_interval(),
        config.move_interval(),
    )
    .start();

    tracing::info!("⏳ Running, press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;

    scheduler.send(Shutdown).await?;

    let remaining = GetUncompletedOrdersHandler::new(uow_factory.clone()).handle().await?;
    tracing::info!(uncompleted_orders = remaining.len(), "🎉 Shutdown complete");

    Ok(())
}

async fn seed(uow_factory: &UnitOfWorkFactory, config: &Config) -> anyhow::Result<()> {
    let create_courier = CreateCourierHandler::new(uow_factory.clone());
    let add_storage_place = AddStoragePlaceHandler::new(uow_factory.clone());
    for (i, name) in COURIER_NAMES.iter().cycle().take(config.seed_couriers).enumerate() {
        let speed = i32::try_from(i % 3 + 1)?;
        let courier_id = create_courier.handle(CreateCourierCommand::new(*name, speed)?).await?;
        add_storage_place
            .handle(AddStoragePlaceCommand::new(courier_id, "bag", 10)?)
            .await?;
    }

    let create_order = CreateOrderHandler::new(uow_factory.clone(), Arc::new(RandomGeoClient));
    for (i, street) in STREETS.iter().cycle().take(config.seed_orders).enumerate() {
        let volume = i32::try_from(i % 5 + 1)?;
        create_order
            .handle(CreateOrderCommand::new(Uuid::new_v4(), *street, volume)?)
            .await?;
    }

    for courier in GetAllCouriersHandler::new(uow_factory.clone()).handle().await? {
        tracing::info!(courier_id = %courier.id, name = %courier.name, x = courier.x, y = courier.y, "Courier ready");
    }

    Ok(())
}

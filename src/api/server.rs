use actix_web::{web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    CourierView, CreateCourierCommand, CreateCourierHandler, CreateOrderCommand, CreateOrderHandler,
    GetAllCouriersHandler, GetUncompletedOrdersHandler, OrderView,
};
use crate::errors::DeliveryError;
use crate::persistence::UnitOfWorkFactory;
use crate::ports::GeoClient;
use super::problem::json_error;

// ============================================================================
// Delivery HTTP API
// ============================================================================
//
// POST /api/v1/couriers        {"name", "speed"}     -> 201 {"id"}
// GET  /api/v1/couriers                              -> 200 [courier]
// POST /api/v1/orders          {"street", "volume"}  -> 201 {"id"}
// GET  /api/v1/orders/active                         -> 200 [order]
//
// Order ids are generated here. Failures map through DeliveryError::kind().
//
// ============================================================================

/// Use cases reachable over HTTP.
pub struct ApiState {
    pub create_courier: CreateCourierHandler,
    pub create_order: CreateOrderHandler,
    pub get_couriers: GetAllCouriersHandler,
    pub get_orders: GetUncompletedOrdersHandler,
}

impl ApiState {
    pub fn new(uow_factory: UnitOfWorkFactory, geo: Arc<dyn GeoClient>) -> Self {
        Self {
            create_courier: CreateCourierHandler::new(uow_factory.clone()),
            create_order: CreateOrderHandler::new(uow_factory.clone(), geo),
            get_couriers: GetAllCouriersHandler::new(uow_factory.clone()),
            get_orders: GetUncompletedOrdersHandler::new(uow_factory),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewCourier {
    pub name: String,
    pub speed: i32,
}

#[derive(Debug, Deserialize)]
pub struct NewOrder {
    pub street: String,
    pub volume: i32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Created {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationDto {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourierDto {
    pub id: Uuid,
    pub name: String,
    pub location: LocationDto,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderDto {
    pub id: Uuid,
    pub location: LocationDto,
}

impl From<CourierView> for CourierDto {
    fn from(view: CourierView) -> Self {
        Self {
            id: view.id,
            name: view.name,
            location: LocationDto { x: view.x, y: view.y },
        }
    }
}

impl From<OrderView> for OrderDto {
    fn from(view: OrderView) -> Self {
        Self {
            id: view.id,
            location: LocationDto { x: view.x, y: view.y },
        }
    }
}

/// Start the delivery API server
/// Runs on its own actix system; call it from a dedicated thread.
pub async fn start_api_server(state: ApiState, port: u16) -> std::io::Result<()> {
    tracing::info!("🌐 Starting delivery API on http://0.0.0.0:{}/api/v1", port);

    let state = web::Data::new(state);
    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(("0.0.0.0", port))?
        .run()
        .await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .route("/couriers", web::get().to(get_couriers))
            .route("/couriers", web::post().to(create_courier))
            .route("/orders", web::post().to(create_order))
            .route("/orders/active", web::get().to(get_orders)),
    );
}

async fn create_courier(
    state: web::Data<ApiState>,
    body: web::Json<NewCourier>,
) -> Result<HttpResponse, DeliveryError> {
    let NewCourier { name, speed } = body.into_inner();
    let id = state.create_courier.handle(CreateCourierCommand::new(name, speed)?).await?;
    Ok(HttpResponse::Created().json(Created { id }))
}

async fn get_couriers(state: web::Data<ApiState>) -> Result<HttpResponse, DeliveryError> {
    let couriers: Vec<CourierDto> = state
        .get_couriers
        .handle()
        .await?
        .into_iter()
        .map(CourierDto::from)
        .collect();
    Ok(HttpResponse::Ok().json(couriers))
}

async fn create_order(
    state: web::Data<ApiState>,
    body: web::Json<NewOrder>,
) -> Result<HttpResponse, DeliveryError> {
    let NewOrder { street, volume } = body.into_inner();
    let command = CreateOrderCommand::new(Uuid::new_v4(), street, volume)?;
    let id = state.create_order.handle(command).await?;
    Ok(HttpResponse::Created().json(Created { id }))
}

async fn get_orders(state: web::Data<ApiState>) -> Result<HttpResponse, DeliveryError> {
    let orders: Vec<OrderDto> = state
        .get_orders
        .handle()
        .await?
        .into_iter()
        .map(OrderDto::from)
        .collect();
    Ok(HttpResponse::Ok().json(orders))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddd::Mediator;
    use crate::domain::kernel::Location;
    use crate::metrics::Metrics;
    use crate::persistence::InMemoryStorage;
    use crate::utils::RetryConfig;
    use actix_web::{http::StatusCode, test};
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedGeo(Location);

    #[async_trait]
    impl GeoClient for FixedGeo {
        async fn get_location(&self, _street: &str) -> anyhow::Result<Location> {
            Ok(self.0)
        }
    }

    struct DownGeo;

    #[async_trait]
    impl GeoClient for DownGeo {
        async fn get_location(&self, _street: &str) -> anyhow::Result<Location> {
            anyhow::bail!("geo service unavailable")
        }
    }

    fn factory() -> UnitOfWorkFactory {
        UnitOfWorkFactory::new(
            Arc::new(InMemoryStorage::new()),
            Arc::new(Mediator::new()),
            Arc::new(Metrics::new().unwrap()),
        )
    }

    fn state_with(geo: Arc<dyn GeoClient>) -> web::Data<ApiState> {
        let factory = factory();
        let quick = RetryConfig {
            max_attempts: 1,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
            multiplier: 1.0,
        };
        web::Data::new(ApiState {
            create_order: CreateOrderHandler::new(factory.clone(), geo).with_retry(quick),
            ..ApiState::new(factory, Arc::new(DownGeo))
        })
    }

    #[actix_web::test]
    async fn test_create_and_list_couriers() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(Arc::new(FixedGeo(Location::min()))))
                .configure(configure),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/v1/couriers")
            .set_json(serde_json::json!({ "name": "Bike", "speed": 2 }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Created = test::read_body_json(response).await;

        let couriers: Vec<CourierDto> =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/v1/couriers").to_request())
                .await;

        assert_eq!(couriers.len(), 1);
        assert_eq!(couriers[0].id, created.id);
        assert_eq!(couriers[0].name, "Bike");
        assert!((1..=10).contains(&couriers[0].location.x));
    }

    #[actix_web::test]
    async fn test_create_order_and_list_active() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(Arc::new(FixedGeo(Location::new(4, 7).unwrap()))))
                .configure(configure),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/v1/orders")
            .set_json(serde_json::json!({ "street": "Arbat", "volume": 2 }))
            .to_request();
        let created: Created = test::call_and_read_body_json(&app, request).await;

        let orders: Vec<OrderDto> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/v1/orders/active").to_request(),
        )
        .await;

        assert_eq!(
            orders,
            vec![OrderDto { id: created.id, location: LocationDto { x: 4, y: 7 } }]
        );
    }

    #[actix_web::test]
    async fn test_invalid_input_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(Arc::new(FixedGeo(Location::min()))))
                .configure(configure),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/v1/couriers")
            .set_json(serde_json::json!({ "name": "Bike", "speed": 0 }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let problem: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(problem["status"], 400);
        assert!(problem["detail"].as_str().unwrap().contains("speed"));

        let request = test::TestRequest::post()
            .uri("/api/v1/orders")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"street\":")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_geolocation_failure_is_bad_gateway() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(Arc::new(DownGeo)))
                .configure(configure),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/v1/orders")
            .set_json(serde_json::json!({ "street": "Arbat", "volume": 1 }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let orders: Vec<OrderDto> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/v1/orders/active").to_request(),
        )
        .await;
        assert!(orders.is_empty());
    }
}

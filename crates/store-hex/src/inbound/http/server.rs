use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
    serve, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::order_service::OrderService;
use crate::application::product_service::ProductService;
use crate::errors::AppError;
use store_types::domain::order::{Order, OrderItem, OrderStatus};
use store_types::domain::product::{Product, ProductUpdate};
use store_types::ports::order_repository::OrderRepository;
use store_types::ports::product_repository::ProductRepository;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

pub struct AppState<P, R>
where
    P: ProductRepository,
    R: OrderRepository,
{
    pub products: Arc<ProductService<P>>,
    pub orders: Arc<OrderService<R>>,
}

impl<P: ProductRepository, R: OrderRepository> Clone for AppState<P, R> {
    fn clone(&self) -> Self {
        Self {
            products: self.products.clone(),
            orders: self.orders.clone(),
        }
    }
}

pub struct HttpServer<P, R>
where
    P: ProductRepository,
    R: OrderRepository,
{
    pub state: AppState<P, R>,
    pub config: HttpServerConfig,
}

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
}

#[derive(Serialize)]
struct ListProductsResponse {
    data: Vec<Product>,
    page: u32,
    limit: u32,
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: i64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: f64,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Deserialize)]
pub struct ListOrdersQuery {
    pub user_id: i64,
}

#[derive(Serialize)]
struct ListOrdersResponse {
    data: Vec<Order>,
}

impl<P, R> HttpServer<P, R>
where
    P: ProductRepository,
    R: OrderRepository,
{
    pub async fn new(
        products: ProductService<P>,
        orders: OrderService<R>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            state: AppState {
                products: Arc::new(products),
                orders: Arc::new(orders),
            },
            config,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        let state = self.state.clone();
        let app = Router::new()
            .route("/health", get(health))
            .route("/products", post(create_product::<P, R>))
            .route("/products", get(list_products::<P, R>))
            .route("/products/{id}", get(get_product::<P, R>))
            .route("/products/{id}", patch(update_product::<P, R>))
            .route("/products/{id}", delete(delete_product::<P, R>))
            .route("/orders", post(create_order::<P, R>))
            .route("/orders", get(list_orders::<P, R>))
            .route("/orders/{id}", get(get_order::<P, R>))
            .route("/orders/{id}/status", patch(update_status::<P, R>))
            .layer(trace_layer)
            .with_state(state);

        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn health() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}

async fn create_product<P, R>(
    State(state): State<AppState<P, R>>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(axum::http::StatusCode, Json<Product>), AppError>
where
    P: ProductRepository,
    R: OrderRepository,
{
    let product = state
        .products
        .create_product(
            payload.name,
            payload.description,
            payload.category,
            payload.price,
            payload.stock,
        )
        .await?;
    Ok((axum::http::StatusCode::CREATED, Json(product)))
}

async fn get_product<P, R>(
    State(state): State<AppState<P, R>>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, AppError>
where
    P: ProductRepository,
    R: OrderRepository,
{
    let product = state.products.get_product(id).await?;
    Ok(Json(product))
}

async fn update_product<P, R>(
    State(state): State<AppState<P, R>>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> Result<Json<Product>, AppError>
where
    P: ProductRepository,
    R: OrderRepository,
{
    let product = state.products.update_product(id, payload).await?;
    Ok(Json(product))
}

async fn delete_product<P, R>(
    State(state): State<AppState<P, R>>,
    Path(id): Path<i64>,
) -> Result<axum::http::StatusCode, AppError>
where
    P: ProductRepository,
    R: OrderRepository,
{
    state.products.delete_product(id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// `page` and `limit` ride in the same query string as the filters; the
/// whole map goes to the service, which recognizes the filter keys and
/// ignores the rest.
async fn list_products<P, R>(
    State(state): State<AppState<P, R>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListProductsResponse>, AppError>
where
    P: ProductRepository,
    R: OrderRepository,
{
    let page = params
        .get("page")
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(1);
    let limit = params
        .get("limit")
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(10);
    let (data, page, limit) = state.products.list_products(page, limit, &params).await?;
    Ok(Json(ListProductsResponse { data, page, limit }))
}

async fn create_order<P, R>(
    State(state): State<AppState<P, R>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(axum::http::StatusCode, Json<Order>), AppError>
where
    P: ProductRepository,
    R: OrderRepository,
{
    let order = state
        .orders
        .create_order(payload.user_id, payload.items, payload.total)
        .await?;
    Ok((axum::http::StatusCode::CREATED, Json(order)))
}

async fn get_order<P, R>(
    State(state): State<AppState<P, R>>,
    Path(id): Path<i64>,
) -> Result<Json<Order>, AppError>
where
    P: ProductRepository,
    R: OrderRepository,
{
    let order = state.orders.get_order(id).await?;
    Ok(Json(order))
}

async fn list_orders<P, R>(
    State(state): State<AppState<P, R>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<ListOrdersResponse>, AppError>
where
    P: ProductRepository,
    R: OrderRepository,
{
    let data = state.orders.list_user_orders(query.user_id).await?;
    Ok(Json(ListOrdersResponse { data }))
}

async fn update_status<P, R>(
    State(state): State<AppState<P, R>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError>
where
    P: ProductRepository,
    R: OrderRepository,
{
    let order = state.orders.update_status(id, payload.status).await?;
    Ok(Json(order))
}

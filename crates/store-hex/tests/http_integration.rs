use serde::{Deserialize, Serialize};
use store_hex::application::order_service::OrderService;
use store_hex::application::product_service::ProductService;
use store_hex::inbound::http::{HttpServer, HttpServerConfig};
use store_repo::memory::MemoryStore;
use store_types::domain::order::{Order, OrderItem, OrderStatus};
use store_types::domain::product::Product;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

async fn spawn_server() -> (String, tokio::task::JoinHandle<()>) {
    let port = find_free_port();
    let config = HttpServerConfig {
        port: port.to_string(),
    };
    let repo = MemoryStore::new();
    let server = HttpServer::new(
        ProductService::new(repo.clone()),
        OrderService::new(repo),
        config,
    )
    .await
    .unwrap();

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });

    // Give the server a moment to start.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    (format!("http://127.0.0.1:{}", port), handle)
}

#[derive(Serialize)]
struct ProductInput {
    name: String,
    description: String,
    category: String,
    price: f64,
    stock: i64,
}

#[derive(Serialize)]
struct OrderInput {
    user_id: i64,
    items: Vec<OrderItem>,
    total: f64,
}

#[derive(Deserialize)]
struct ProductPage {
    data: Vec<Product>,
    page: u32,
    limit: u32,
}

#[derive(Deserialize)]
struct OrderList {
    data: Vec<Order>,
}

#[tokio::test]
async fn product_crud_over_http() {
    let (addr, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/products", addr))
        .json(&ProductInput {
            name: "Hammer".into(),
            description: "Claw".into(),
            category: "tools".into(),
            price: 9.99,
            stock: 5,
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let created: Product = res.json().await.unwrap();
    assert!(created.id > 0);

    let fetched: Product = client
        .get(format!("{}/products/{}", addr, created.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched.name, "Hammer");

    // Unrecognized query keys are ignored; limit 0 falls back to 10.
    let page: ProductPage = client
        .get(format!(
            "{}/products?category=tools&limit=0&color=red",
            addr
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 10);

    let updated: Product = client
        .patch(format!("{}/products/{}", addr, created.id))
        .json(&serde_json::json!({ "price": 12.5 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated.price, 12.5);
    assert_eq!(updated.stock, 5);

    let res = client
        .delete(format!("{}/products/{}", addr, created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/products/{}", addr, created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    handle.abort();
}

#[tokio::test]
async fn order_flow_over_http() {
    let (addr, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/orders", addr))
        .json(&OrderInput {
            user_id: 7,
            items: vec![
                OrderItem {
                    product_id: 3,
                    quantity: 2,
                    price: 9.99,
                },
                OrderItem {
                    product_id: 5,
                    quantity: 1,
                    price: 4.50,
                },
            ],
            total: 24.48,
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let created: Order = res.json().await.unwrap();
    assert_eq!(created.status, OrderStatus::Pending);
    assert_eq!(created.items.len(), 2);

    let fetched: Order = client
        .get(format!("{}/orders/{}", addr, created.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched.total, 24.48);

    let updated: Order = client
        .patch(format!("{}/orders/{}/status", addr, created.id))
        .json(&serde_json::json!({ "status": "completed" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Completed);

    let list: OrderList = client
        .get(format!("{}/orders?user_id=7", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.data.len(), 1);
    assert_eq!(list.data[0].id, created.id);

    handle.abort();
}

#[tokio::test]
async fn bad_request_and_not_found_paths() {
    let (addr, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/products", addr))
        .json(&ProductInput {
            name: "".into(),
            description: "".into(),
            category: "tools".into(),
            price: 0.0,
            stock: 0,
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}/orders/999", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    handle.abort();
}

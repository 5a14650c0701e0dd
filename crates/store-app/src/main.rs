use store_hex::application::order_service::OrderService;
use store_hex::application::product_service::ProductService;
use store_hex::config::Config;
use store_hex::inbound::http::{HttpServer, HttpServerConfig};
use store_repo::{build_repo, Repo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DATABASE_URL / SERVER_PORT when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    let repo: Repo = build_repo(config.database_url.as_deref()).await?;
    let products = ProductService::new(repo.clone());
    let orders = OrderService::new(repo);

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(products, orders, server_cfg).await?;
    http.run().await
}

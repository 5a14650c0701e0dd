#![cfg(feature = "memory")]

use std::collections::HashMap;

use store_repo::memory::MemoryStore;
use store_types::domain::order::{Order, OrderItem, OrderStatus};
use store_types::domain::product::Product;
use store_types::ports::order_repository::OrderRepository;
use store_types::ports::product_repository::ProductRepository;

fn filters(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn product_crud_flow() {
    let repo = MemoryStore::new();
    let product = Product::new("Hammer".into(), String::new(), "tools".into(), 9.99, 5).unwrap();

    let created = ProductRepository::create(&repo, product).await.unwrap();
    assert!(created.id > 0);

    let fetched = ProductRepository::get(&repo, created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.name, "Hammer");

    let mut changed = fetched.clone();
    changed.stock = 2;
    let updated = repo.update(changed).await.unwrap().unwrap();
    assert_eq!(updated.stock, 2);

    assert!(repo.delete(created.id).await.unwrap());
    assert!(ProductRepository::get(&repo, created.id)
        .await
        .unwrap()
        .is_none());
    assert!(!repo.delete(created.id).await.unwrap());
}

#[tokio::test]
async fn list_filters_and_paginates_like_sqlite() {
    let repo = MemoryStore::new();
    for (name, category, price) in [
        ("Hammer", "tools", 9.99),
        ("Wrench", "tools", 14.99),
        ("Rose seeds", "garden", 3.50),
    ] {
        let product =
            Product::new(name.into(), String::new(), category.into(), price, 1).unwrap();
        ProductRepository::create(&repo, product).await.unwrap();
    }

    let tools = repo.list(1, 10, &filters(&[("category", "tools")])).await.unwrap();
    assert_eq!(tools.len(), 2);

    let named = repo.list(1, 10, &filters(&[("name", "WREN")])).await.unwrap();
    assert_eq!(named.len(), 1);

    let page2 = repo.list(2, 2, &filters(&[])).await.unwrap();
    assert_eq!(page2.len(), 1);
}

#[tokio::test]
async fn order_flow_and_missing_rows() {
    let repo = MemoryStore::new();

    let o_old = OrderRepository::create(&repo, Order::new(7, vec![], 0.0).unwrap())
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let o_new = OrderRepository::create(
        &repo,
        Order::new(
            7,
            vec![OrderItem {
                product_id: 3,
                quantity: 2,
                price: 9.99,
            }],
            19.98,
        )
        .unwrap(),
    )
    .await
    .unwrap();

    let listed = repo.list_by_user(7).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, o_new.id);
    assert_eq!(listed[1].id, o_old.id);

    let updated = repo
        .update_status(o_new.id, OrderStatus::Cancelled)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Cancelled);

    assert!(OrderRepository::get(&repo, 999).await.unwrap().is_none());
    assert!(repo
        .update_status(999, OrderStatus::Completed)
        .await
        .unwrap()
        .is_none());
}

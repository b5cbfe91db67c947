//! End-to-end cart tests over HTTP and the file store.
//!
//! Each test starts its own [`CatalogServer`] and storage directory, drives
//! the real `CatalogClient` and `FileStore`, and inspects both the in-memory
//! cart and the snapshot on disk.

use axum::http::StatusCode;
use rocketshoes_cart::{
    CartConfig, CartStorage, CartStore, CatalogClient, FileStore, KeyValueStore, MemoryNotifier,
    Notice, StorageConfig,
};
use rocketshoes_core::{AmountUpdate, Cart, ProductId};
use rocketshoes_integration_tests::{CatalogServer, Mode, cleanup, temp_storage};
use serde_json::json;

type Store = CartStore<CatalogClient, FileStore, MemoryNotifier>;

fn config(server: &CatalogServer, storage: &StorageConfig) -> CartConfig {
    CartConfig {
        api: server.api_config(),
        storage: storage.clone(),
        sentry_dsn: None,
    }
}

fn open(server: &CatalogServer, storage: &StorageConfig, notifier: &MemoryNotifier) -> Store {
    CartStore::from_config(&config(server, storage), notifier.clone())
        .expect("Failed to open cart store")
}

fn on_disk(storage: &StorageConfig) -> Cart {
    CartStorage::new(FileStore::new(&storage.path), storage.key.as_str())
        .load()
        .expect("Failed to load snapshot")
}

fn lines(cart: &Cart) -> Vec<(i32, u32)> {
    cart.iter().map(|i| (i.id().as_i32(), i.amount)).collect()
}

async fn seeded(
    server: &CatalogServer,
    storage: &StorageConfig,
    notifier: &MemoryNotifier,
    amounts: &[(i32, i64)],
) -> Store {
    let mut store = open(server, storage, notifier);
    for &(id, amount) in amounts {
        assert!(store.add_product(ProductId::new(id)).await);
        if amount > 1 {
            assert!(
                store
                    .update_product_amount(AmountUpdate::new(ProductId::new(id), amount))
                    .await
            );
        }
    }
    notifier.drain();
    store
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_add_to_empty_cart() {
    let server = CatalogServer::start().await;
    server.add_product(1, "Tênis de Caminhada Leve Confortável", 179.9, 5);
    let storage = temp_storage();
    let notifier = MemoryNotifier::new();
    let mut store = open(&server, &storage, &notifier);

    assert!(store.add_product(ProductId::new(1)).await);

    assert_eq!(lines(store.cart()), vec![(1, 1)]);
    let item = store.cart().get(ProductId::new(1)).expect("item in cart");
    assert_eq!(item.product.title, "Tênis de Caminhada Leve Confortável");
    assert_eq!(item.line_total().to_string(), "$179.90");
    assert_eq!(server.stock_hits(), 1);
    assert_eq!(server.product_hits(), 1);
    assert!(notifier.messages().is_empty());
    assert_eq!(lines(&on_disk(&storage)), vec![(1, 1)]);

    cleanup(&storage);
}

#[tokio::test]
async fn test_add_at_stock_limit_is_rejected() {
    let server = CatalogServer::start().await;
    server.add_product(1, "Tênis VR Caminhada", 139.9, 5);
    let storage = temp_storage();
    let notifier = MemoryNotifier::new();
    let mut store = seeded(&server, &storage, &notifier, &[(1, 1)]).await;

    server.set_stock(1, 1);
    assert!(!store.add_product(ProductId::new(1)).await);

    assert_eq!(lines(store.cart()), vec![(1, 1)]);
    assert_eq!(notifier.messages(), vec![Notice::OutOfStock.to_string()]);
    assert_eq!(lines(&on_disk(&storage)), vec![(1, 1)]);

    cleanup(&storage);
}

#[tokio::test]
async fn test_update_within_stock() {
    let server = CatalogServer::start().await;
    server.add_product(2, "Tênis Adidas Duramo Lite 2.0", 219.9, 5);
    let storage = temp_storage();
    let notifier = MemoryNotifier::new();
    let mut store = seeded(&server, &storage, &notifier, &[(2, 3)]).await;

    assert!(
        store
            .update_product_amount(AmountUpdate::new(ProductId::new(2), 5))
            .await
    );

    assert_eq!(lines(store.cart()), vec![(2, 5)]);
    assert_eq!(lines(&on_disk(&storage)), vec![(2, 5)]);
    assert!(notifier.messages().is_empty());

    cleanup(&storage);
}

#[tokio::test]
async fn test_remove_last_item() {
    let server = CatalogServer::start().await;
    server.add_product(3, "Tênis de Caminhada Leve Confortável", 179.9, 2);
    let storage = temp_storage();
    let notifier = MemoryNotifier::new();
    let mut store = seeded(&server, &storage, &notifier, &[(3, 1)]).await;
    let hits_before = server.stock_hits();

    assert!(store.remove_product(ProductId::new(3)));

    assert!(store.cart().is_empty());
    assert!(on_disk(&storage).is_empty());
    assert_eq!(server.stock_hits(), hits_before);

    cleanup(&storage);
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_reopened_store_sees_same_ordered_cart() {
    let server = CatalogServer::start().await;
    server.add_product(1, "Tênis VR Caminhada", 139.9, 10);
    server.add_product(2, "Tênis Adidas Duramo Lite 2.0", 219.9, 10);
    server.add_product(3, "Tênis de Caminhada Leve Confortável", 179.9, 10);
    let storage = temp_storage();
    let notifier = MemoryNotifier::new();

    let store = seeded(&server, &storage, &notifier, &[(3, 2), (1, 1), (2, 4)]).await;
    let before = store.cart().clone();
    drop(store);

    let reopened = open(&server, &storage, &notifier);
    assert_eq!(reopened.cart(), &before);
    assert_eq!(lines(reopened.cart()), vec![(3, 2), (1, 1), (2, 4)]);

    cleanup(&storage);
}

#[tokio::test]
async fn test_snapshot_is_json_array_under_cart_key() {
    let server = CatalogServer::start().await;
    server.add_product(1, "Tênis VR Caminhada", 139.9, 3);
    let storage = temp_storage();
    let notifier = MemoryNotifier::new();
    let mut store = open(&server, &storage, &notifier);

    assert!(store.add_product(ProductId::new(1)).await);

    let raw = FileStore::new(&storage.path)
        .get_item("@RocketShoes:cart")
        .expect("readable storage")
        .expect("snapshot present");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    assert_eq!(
        value,
        json!([{
            "id": 1,
            "title": "Tênis VR Caminhada",
            "price": 139.9,
            "image": "https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis1.jpg",
            "amount": 1
        }])
    );

    cleanup(&storage);
}

#[tokio::test]
async fn test_unreadable_storage_file_is_replaced_on_next_commit() {
    let server = CatalogServer::start().await;
    server.add_product(1, "Tênis VR Caminhada", 139.9, 5);
    let storage = temp_storage();
    std::fs::create_dir_all(storage.path.parent().expect("temp dir")).expect("create temp dir");
    std::fs::write(&storage.path, "garbage").expect("write storage file");
    let notifier = MemoryNotifier::new();
    let mut store = open(&server, &storage, &notifier);
    assert!(store.cart().is_empty());

    assert!(store.add_product(ProductId::new(1)).await);
    assert!(store.add_product(ProductId::new(1)).await);

    assert_eq!(lines(store.cart()), vec![(1, 2)]);
    assert!(notifier.messages().is_empty());
    assert_eq!(lines(&on_disk(&storage)), vec![(1, 2)]);

    cleanup(&storage);
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_service_unavailable_on_add() {
    let server = CatalogServer::start().await;
    server.add_product(1, "Tênis VR Caminhada", 139.9, 3);
    server.set_mode(Mode::Failing(StatusCode::SERVICE_UNAVAILABLE));
    let storage = temp_storage();
    let notifier = MemoryNotifier::new();
    let mut store = open(&server, &storage, &notifier);

    assert!(!store.add_product(ProductId::new(1)).await);

    assert!(store.cart().is_empty());
    assert_eq!(notifier.messages(), vec![Notice::AddFailed.to_string()]);
    assert!(!storage.path.exists());

    cleanup(&storage);
}

#[tokio::test]
async fn test_malformed_stock_on_update() {
    let server = CatalogServer::start().await;
    server.add_product(1, "Tênis VR Caminhada", 139.9, 3);
    let storage = temp_storage();
    let notifier = MemoryNotifier::new();
    let mut store = seeded(&server, &storage, &notifier, &[(1, 1)]).await;

    server.set_mode(Mode::Malformed);
    assert!(
        !store
            .update_product_amount(AmountUpdate::new(ProductId::new(1), 2))
            .await
    );

    assert_eq!(lines(store.cart()), vec![(1, 1)]);
    assert_eq!(notifier.messages(), vec![Notice::UpdateFailed.to_string()]);

    cleanup(&storage);
}

#[tokio::test]
async fn test_unknown_product_on_add() {
    let server = CatalogServer::start().await;
    let storage = temp_storage();
    let notifier = MemoryNotifier::new();
    let mut store = open(&server, &storage, &notifier);

    assert!(!store.add_product(ProductId::new(42)).await);

    assert!(store.cart().is_empty());
    assert_eq!(notifier.messages(), vec![Notice::AddFailed.to_string()]);

    cleanup(&storage);
}

#[tokio::test]
async fn test_product_service_returning_other_id() {
    let server = CatalogServer::start().await;
    server.set_stock(5, 3);
    server.set_product_body(
        5,
        json!({"id": 6, "title": "Wrong", "price": 1.0, "image": "x.jpg"}),
    );
    let storage = temp_storage();
    let notifier = MemoryNotifier::new();
    let mut store = open(&server, &storage, &notifier);

    assert!(!store.add_product(ProductId::new(5)).await);

    assert!(store.cart().is_empty());
    assert_eq!(notifier.messages(), vec![Notice::AddFailed.to_string()]);

    cleanup(&storage);
}

#[tokio::test]
async fn test_non_positive_update_makes_no_request() {
    let server = CatalogServer::start().await;
    server.add_product(1, "Tênis VR Caminhada", 139.9, 3);
    let storage = temp_storage();
    let notifier = MemoryNotifier::new();
    let mut store = seeded(&server, &storage, &notifier, &[(1, 1)]).await;
    let hits_before = server.stock_hits();

    assert!(
        !store
            .update_product_amount(AmountUpdate::new(ProductId::new(1), 0))
            .await
    );

    assert_eq!(server.stock_hits(), hits_before);
    assert!(notifier.messages().is_empty());
    assert_eq!(lines(store.cart()), vec![(1, 1)]);

    cleanup(&storage);
}

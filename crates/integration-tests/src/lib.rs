//! Integration tests for RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! Tests run against [`CatalogServer`], an in-process `axum` server that
//! mimics the stock and product service on an ephemeral port, so no external
//! service is needed.

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_cart::{ApiConfig, StorageConfig};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

/// How the catalog server answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Serve stored records, 404 for unknown ids.
    #[default]
    Normal,
    /// Answer every request with this status.
    Failing(StatusCode),
    /// Answer every request with 200 and a non-JSON body.
    Malformed,
}

#[derive(Default)]
struct CatalogState {
    stock: Mutex<HashMap<i32, u32>>,
    products: Mutex<HashMap<i32, Value>>,
    mode: Mutex<Mode>,
    stock_hits: AtomicUsize,
    product_hits: AtomicUsize,
}

impl CatalogState {
    fn mode(&self) -> Mode {
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn failure(&self) -> Option<Response> {
        match self.mode() {
            Mode::Normal => None,
            Mode::Failing(status) => Some((status, "maintenance").into_response()),
            Mode::Malformed => Some((StatusCode::OK, "<html>oops</html>").into_response()),
        }
    }
}

/// In-process stock and product service.
pub struct CatalogServer {
    base_url: Url,
    state: Arc<CatalogState>,
    handle: JoinHandle<()>,
}

impl CatalogServer {
    /// Start a server on an ephemeral localhost port.
    pub async fn start() -> Self {
        let state = Arc::new(CatalogState::default());

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind catalog server");
        let addr = listener.local_addr().expect("Failed to read local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Catalog server error");
        });

        let base_url = Url::parse(&format!("http://{addr}/")).expect("Invalid server URL");

        Self {
            base_url,
            state,
            handle,
        }
    }

    /// Client configuration pointing at this server.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.base_url.clone())
    }

    /// Register a product with `stock` units available.
    pub fn add_product(&self, id: i32, title: &str, price: f64, stock: u32) {
        self.state
            .products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                json!({
                    "id": id,
                    "title": title,
                    "price": price,
                    "image": format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
                }),
            );
        self.set_stock(id, stock);
    }

    /// Serve `body` verbatim for `/products/{id}`.
    pub fn set_product_body(&self, id: i32, body: Value) {
        self.state
            .products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, body);
    }

    pub fn set_stock(&self, id: i32, amount: u32) {
        self.state
            .stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, amount);
    }

    pub fn set_mode(&self, mode: Mode) {
        *self.state.mode.lock().unwrap_or_else(PoisonError::into_inner) = mode;
    }

    /// Requests received on `/stock/{id}`.
    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.state.stock_hits.load(Ordering::SeqCst)
    }

    /// Requests received on `/products/{id}`.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }
}

impl Drop for CatalogServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn stock(State(state): State<Arc<CatalogState>>, Path(id): Path<i32>) -> Response {
    state.stock_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = state.failure() {
        return response;
    }

    let amount = state
        .stock
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .copied();

    match amount {
        Some(amount) => Json(json!({ "id": id, "amount": amount })).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn product(State(state): State<Arc<CatalogState>>, Path(id): Path<i32>) -> Response {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = state.failure() {
        return response;
    }

    let body = state
        .products
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned();

    match body {
        Some(body) => Json(body).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Storage configuration in a fresh temp directory.
#[must_use]
pub fn temp_storage() -> StorageConfig {
    StorageConfig {
        path: std::env::temp_dir()
            .join(format!("rocketshoes-it-{}", uuid::Uuid::new_v4()))
            .join("local-storage.json"),
        ..StorageConfig::default()
    }
}

/// Remove the temp directory created by [`temp_storage`].
pub fn cleanup(storage: &StorageConfig) {
    if let Some(dir) = storage.path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}


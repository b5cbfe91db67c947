//! Cart state store.
//!
//! [`CartStore`] owns the authoritative in-memory [`Cart`]. Every mutation
//! checks stock once, builds a candidate cart, writes it through
//! [`CartStorage`] and only then replaces the in-memory cart. A failure at
//! any step leaves both the snapshot and memory untouched and is reported
//! through the injected [`Notifier`].
//!
//! Mutations take `&mut self`, so two operations can never interleave on
//! the same store.

use rocketshoes_core::{AmountUpdate, Cart, CartItem, ProductId, Stock};
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiError, CatalogClient, ProductApi, StockApi};
use crate::config::CartConfig;
use crate::error::{CartError, Operation};
use crate::notify::Notifier;
use crate::storage::{CartStorage, FileStore, KeyValueStore};

/// Stock-validated cart with write-through persistence.
pub struct CartStore<A, S, N> {
    cart: Cart,
    api: A,
    storage: CartStorage<S>,
    notifier: N,
}

impl<A, S, N> CartStore<A, S, N>
where
    A: StockApi + ProductApi,
    S: KeyValueStore,
    N: Notifier,
{
    /// Open the store, loading the persisted snapshot.
    ///
    /// A missing snapshot yields an empty cart. An unreadable one is logged
    /// and also yields an empty cart; it is overwritten on the next commit.
    pub fn new(api: A, storage: CartStorage<S>, notifier: N) -> Self {
        let cart = match storage.load() {
            Ok(cart) => cart,
            Err(e) => {
                warn!(error = %e, key = %storage.key(), "Discarding unreadable cart snapshot");
                Cart::empty()
            }
        };

        debug!(items = cart.len(), "Cart loaded");

        Self {
            cart,
            api,
            storage,
            notifier,
        }
    }

    /// Current cart contents.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Tear the store down into its parts.
    pub fn into_parts(self) -> (Cart, A, CartStorage<S>, N) {
        (self.cart, self.api, self.storage, self.notifier)
    }

    /// Add one unit of `product_id`.
    ///
    /// New products are appended with amount 1; products already in the cart
    /// are incremented if stock allows. Returns `true` if the cart changed.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) -> bool {
        let result = self.try_add(product_id).await;
        self.finish(Operation::Add, result)
    }

    /// Remove the line for `product_id`. Returns `true` if the cart changed.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn remove_product(&mut self, product_id: ProductId) -> bool {
        let result = self
            .cart
            .without(product_id)
            .ok_or(CartError::NotInCart(product_id));
        self.finish(Operation::Remove, result)
    }

    /// Set the amount of a product already in the cart.
    ///
    /// Amounts below 1 and products with no stock at all are rejected
    /// without a notification. Returns `true` if the cart changed.
    #[instrument(skip_all, fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(&mut self, update: AmountUpdate) -> bool {
        let result = self.try_update(update).await;
        self.finish(Operation::Update, result)
    }

    async fn try_add(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let stock = self.api.stock(product_id).await?;
        if stock.is_depleted() {
            return Err(CartError::StockDepleted(product_id));
        }

        match self.cart.get(product_id) {
            None => {
                let product = self.api.product(product_id).await?;
                Ok(self.cart.with_item(CartItem::new(product, 1)))
            }
            Some(item) => {
                let requested = u64::from(item.amount) + 1;
                set_amount(&self.cart, product_id, requested, stock)
            }
        }
    }

    async fn try_update(&self, update: AmountUpdate) -> Result<Cart, CartError> {
        let AmountUpdate { product_id, amount } = update;
        if amount < 1 {
            return Err(CartError::InvalidAmount(amount));
        }

        let stock = self.api.stock(product_id).await?;
        if stock.is_depleted() {
            return Err(CartError::StockDepleted(product_id));
        }

        set_amount(&self.cart, product_id, amount.unsigned_abs(), stock)
    }

    /// Persist and commit a candidate cart, or report why there is none.
    fn finish(&mut self, operation: Operation, result: Result<Cart, CartError>) -> bool {
        let committed = result.and_then(|next| {
            self.storage.save(&next)?;
            Ok(next)
        });

        match committed {
            Ok(next) => {
                self.cart = next;
                info!(
                    ?operation,
                    items = self.cart.len(),
                    quantity = self.cart.total_quantity(),
                    "Cart updated"
                );
                true
            }
            Err(err) => {
                match err.notice(operation) {
                    Some(notice) => {
                        warn!(?operation, error = %err, "Cart operation rejected");
                        self.notifier.error(notice.message());
                    }
                    None => debug!(?operation, error = %err, "Cart operation declined"),
                }
                false
            }
        }
    }
}

impl<N: Notifier> CartStore<CatalogClient, FileStore, N> {
    /// Open a store backed by the HTTP catalog and the file store named in
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the catalog client cannot be built.
    pub fn from_config(config: &CartConfig, notifier: N) -> Result<Self, ApiError> {
        let api = CatalogClient::new(&config.api)?;
        let storage = CartStorage::new(
            FileStore::new(&config.storage.path),
            config.storage.key.as_str(),
        );
        Ok(Self::new(api, storage, notifier))
    }
}

/// Candidate cart with `product_id` set to `requested` units.
fn set_amount(
    cart: &Cart,
    product_id: ProductId,
    requested: u64,
    stock: Stock,
) -> Result<Cart, CartError> {
    let amount = u32::try_from(requested)
        .ok()
        .filter(|&amount| stock.covers(amount))
        .ok_or(CartError::OutOfStock {
            product_id,
            requested,
            available: stock.amount,
        })?;

    cart.with_amount(product_id, amount)
        .ok_or(CartError::NotInCart(product_id))
}

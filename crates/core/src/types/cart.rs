//! Cart snapshot types.
//!
//! A [`Cart`] is an immutable value: every mutation produces a new cart so a
//! caller can persist the candidate before committing it in memory.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// One product line in the cart.
///
/// Serialized with the product fields flattened next to `amount`, which is
/// the snapshot shape storefront clients already read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    /// Units of this product in the cart. Always at least 1.
    pub amount: u32,
}

impl CartItem {
    #[must_use]
    pub const fn new(product: Product, amount: u32) -> Self {
        Self { product, amount }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times amount.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.amount)
    }
}

/// Ordered cart contents, in the order products were first added.
///
/// Holds at most one [`CartItem`] per [`ProductId`], each with an amount of
/// at least 1. Deserialization goes through [`From<Vec<CartItem>>`] so a
/// stored snapshot cannot break either rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<CartItem>::deserialize(deserializer).map(Self::from)
    }
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Sum of all amounts.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// A new cart with `item` appended.
    ///
    /// If the product is already present its line is replaced in place, so
    /// the one-line-per-product invariant holds regardless of caller.
    #[must_use]
    pub fn with_item(&self, item: CartItem) -> Self {
        let mut items = self.items.clone();
        match items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        Self { items }
    }

    /// A new cart without the line for `id`, or `None` if it is absent.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect();
        Some(Self { items })
    }

    /// A new cart with the amount for `id` replaced, keeping its position.
    ///
    /// Returns `None` if `id` is absent.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Option<Self> {
        let mut items = self.items.clone();
        let item = items.iter_mut().find(|item| item.id() == id)?;
        item.amount = amount;
        Some(Self { items })
    }
}

impl From<Vec<CartItem>> for Cart {
    /// Build a cart from lines, skipping empty lines and keeping the first
    /// remaining line for each product.
    fn from(lines: Vec<CartItem>) -> Self {
        let mut items: Vec<CartItem> = Vec::with_capacity(lines.len());
        for line in lines {
            if line.amount > 0 && !items.iter().any(|item| item.id() == line.id()) {
                items.push(line);
            }
        }
        Self { items }
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Request to set a product's amount.
///
/// `amount` is signed because callers may submit zero or negative values,
/// which the cart rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountUpdate {
    pub product_id: ProductId,
    pub amount: i64,
}

impl AmountUpdate {
    #[must_use]
    pub const fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn item(id: i32, amount: u32) -> CartItem {
        CartItem::new(
            Product::new(
                ProductId::new(id),
                format!("Shoe {id}"),
                Price::new(Decimal::new(1000 * i64::from(id), 2)),
                format!("https://example.com/{id}.jpg"),
            ),
            amount,
        )
    }

    fn ids(cart: &Cart) -> Vec<(i32, u32)> {
        cart.iter().map(|i| (i.id().as_i32(), i.amount)).collect()
    }

    #[test]
    fn test_cart_item_snapshot_shape() {
        let value = serde_json::to_value(item(1, 2)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "title": "Shoe 1",
                "price": 10.0,
                "image": "https://example.com/1.jpg",
                "amount": 2
            })
        );
    }

    #[test]
    fn test_cart_roundtrip_preserves_order() {
        let cart = Cart::empty()
            .with_item(item(3, 1))
            .with_item(item(1, 2))
            .with_item(item(2, 5));

        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['));

        let loaded: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, cart);
        assert_eq!(ids(&loaded), vec![(3, 1), (1, 2), (2, 5)]);
    }

    #[test]
    fn test_with_item_replaces_existing_line() {
        let cart = Cart::empty().with_item(item(1, 1)).with_item(item(2, 1));
        let cart = cart.with_item(item(1, 4));
        assert_eq!(ids(&cart), vec![(1, 4), (2, 1)]);
    }

    #[test]
    fn test_without_absent_returns_none() {
        let cart = Cart::empty().with_item(item(1, 1));
        assert!(cart.without(ProductId::new(9)).is_none());
        assert!(cart.without(ProductId::new(1)).unwrap().is_empty());
    }

    #[test]
    fn test_with_amount_keeps_position() {
        let cart = Cart::empty()
            .with_item(item(1, 1))
            .with_item(item(2, 3))
            .with_item(item(3, 1));

        let updated = cart.with_amount(ProductId::new(2), 5).unwrap();
        assert_eq!(ids(&updated), vec![(1, 1), (2, 5), (3, 1)]);
        // Original is untouched
        assert_eq!(ids(&cart), vec![(1, 1), (2, 3), (3, 1)]);

        assert!(cart.with_amount(ProductId::new(4), 1).is_none());
    }

    #[test]
    fn test_totals() {
        let cart = Cart::empty().with_item(item(1, 2)).with_item(item(2, 3));
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_quantity(), 5);
        // 2 * 10.00 + 3 * 20.00
        assert_eq!(cart.subtotal().to_string(), "$80.00");
        assert_eq!(Cart::empty().subtotal().to_string(), "$0.00");
    }

    #[test]
    fn test_from_vec_drops_duplicate_products() {
        let cart = Cart::from(vec![item(1, 1), item(2, 2), item(1, 7)]);
        assert_eq!(ids(&cart), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn test_from_vec_skips_empty_lines() {
        let cart = Cart::from(vec![item(1, 0), item(2, 2), item(1, 3)]);
        assert_eq!(ids(&cart), vec![(2, 2), (1, 3)]);
    }

    #[test]
    fn test_deserialize_normalizes_lines() {
        let line = |id: i32, amount: u32| {
            json!({"id": id, "title": "Shoe", "price": 99.9, "image": "x.jpg", "amount": amount})
        };
        let cart: Cart =
            serde_json::from_value(json!([line(1, 0), line(1, 3), line(2, 1), line(2, 4)]))
                .unwrap();
        assert_eq!(ids(&cart), vec![(1, 3), (2, 1)]);
    }

    #[test]
    fn test_amount_update_camel_case() {
        let update: AmountUpdate =
            serde_json::from_value(json!({"productId": 2, "amount": -1})).unwrap();
        assert_eq!(update, AmountUpdate::new(ProductId::new(2), -1));
    }
}

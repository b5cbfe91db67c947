//! Cart commands.
//!
//! Each mutating command runs exactly one store operation. The store has
//! already surfaced a notice when an operation is rejected, so commands only
//! translate the outcome into an error for the exit code.
//!
//! The cart summary is command output and goes to stdout regardless of
//! `RUST_LOG`; logs go through `tracing`.

use rocketshoes_cart::{CartStore, KeyValueStore, Notifier, ProductApi, StockApi};
use rocketshoes_core::{AmountUpdate, Cart, ProductId};
use thiserror::Error;

/// Errors that end a command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The store declined the operation.
    #[error("{0} was not applied")]
    Rejected(&'static str),
}

/// Print the current cart.
pub fn show<A, S, N>(store: &CartStore<A, S, N>)
where
    A: StockApi + ProductApi,
    S: KeyValueStore,
    N: Notifier,
{
    render(store.cart());
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns `CommandError::Rejected` if the cart did not change.
pub async fn add<A, S, N>(
    store: &mut CartStore<A, S, N>,
    product_id: ProductId,
) -> Result<(), CommandError>
where
    A: StockApi + ProductApi,
    S: KeyValueStore,
    N: Notifier,
{
    applied(store.add_product(product_id).await, "add")?;
    render(store.cart());
    Ok(())
}

/// Remove a product.
///
/// # Errors
///
/// Returns `CommandError::Rejected` if the cart did not change.
pub fn remove<A, S, N>(
    store: &mut CartStore<A, S, N>,
    product_id: ProductId,
) -> Result<(), CommandError>
where
    A: StockApi + ProductApi,
    S: KeyValueStore,
    N: Notifier,
{
    applied(store.remove_product(product_id), "remove")?;
    render(store.cart());
    Ok(())
}

/// Set a product's amount.
///
/// # Errors
///
/// Returns `CommandError::Rejected` if the cart did not change.
pub async fn update<A, S, N>(
    store: &mut CartStore<A, S, N>,
    product_id: ProductId,
    amount: i64,
) -> Result<(), CommandError>
where
    A: StockApi + ProductApi,
    S: KeyValueStore,
    N: Notifier,
{
    let update = AmountUpdate::new(product_id, amount);
    applied(store.update_product_amount(update).await, "update")?;
    render(store.cart());
    Ok(())
}

const fn applied(committed: bool, operation: &'static str) -> Result<(), CommandError> {
    if committed {
        Ok(())
    } else {
        Err(CommandError::Rejected(operation))
    }
}

#[allow(clippy::print_stdout)]
fn render(cart: &Cart) {
    for line in summary_lines(cart) {
        println!("{line}");
    }
}

/// Human-readable cart summary, one entry per line.
fn summary_lines(cart: &Cart) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Cart is empty".to_string()];
    }

    let mut lines: Vec<String> = cart
        .iter()
        .map(|item| {
            format!(
                "#{} {} x{} @ {} = {}",
                item.id(),
                item.product.title,
                item.amount,
                item.product.price,
                item.line_total()
            )
        })
        .collect();

    lines.push(format!(
        "{} products, {} units, subtotal {}",
        cart.len(),
        cart.total_quantity(),
        cart.subtotal()
    ));
    lines
}

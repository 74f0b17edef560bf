//! Cart commands.
//!
//! Each mutation runs against a freshly hydrated store. Failures the store
//! keeps silent leave the cart as it was and exit cleanly; notified failures
//! are shown once, by the notification, and exit non-zero.

use anyhow::Result;
use cart_core::cart::Cart;
use cart_core::notify::Operation;
use cart_core::{CartResult, CartStore, ProductId};

use super::{AlreadyReported, ProductArgs, SetArgs};
use crate::context::Context;

/// Print the current cart.
pub async fn show(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    ctx.output.header("Cart");
    ctx.output.cart(&store.current_cart());
    Ok(())
}

/// Add one unit of a product.
pub async fn add(args: ProductArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let result = store.add_product(args.id).await;
    report(ctx, &store, Operation::Add, args.id, result)
}

/// Remove a product line.
pub async fn remove(args: ProductArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let result = store.remove_product(args.id).await;
    report(ctx, &store, Operation::Remove, args.id, result)
}

/// Set the quantity of a product line.
pub async fn set(args: SetArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let result = store.update_product_amount(args.id, args.amount).await;
    report(ctx, &store, Operation::UpdateAmount, args.id, result)
}

fn report(
    ctx: &Context,
    store: &CartStore,
    op: Operation,
    product_id: ProductId,
    result: CartResult<Cart>,
) -> Result<()> {
    match result {
        Ok(cart) => {
            ctx.output
                .success(&format!("{} product {}", past_tense(op), product_id));
            ctx.output.cart(&cart);
            Ok(())
        }
        Err(err) => match store.policy().message_for(op, &err) {
            None => {
                ctx.output.debug(&format!("Ignored: {}", err));
                ctx.output.cart(&store.current_cart());
                Ok(())
            }
            Some(_) => Err(AlreadyReported(err.to_string()).into()),
        },
    }
}

fn past_tense(op: Operation) -> &'static str {
    match op {
        Operation::Add => "Added",
        Operation::Remove => "Removed",
        Operation::UpdateAmount => "Updated",
    }
}

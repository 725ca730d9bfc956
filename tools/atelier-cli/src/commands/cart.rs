//! Cart commands.

use anyhow::{bail, Result};
use atelier_commerce::prelude::*;
use atelier_store::KvBackend;
use dialoguer::Confirm;
use serde_json::json;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::{format_items, format_price, Output};

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let store = ctx.cart_store()?;
    watch(&store, ctx.output);

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => show_cart(&store, ctx),
        CartCommand::Add {
            product_id,
            quantity,
            name,
            price,
            image_url,
        } => add_item(&store, ctx, product_id, quantity, name, price, image_url),
        CartCommand::Remove { product_id } => {
            let outcome = store.remove_from_cart(product_id.as_str());
            report(outcome, ctx, &format!("Removed {}", product_id))
        }
        CartCommand::Update {
            product_id,
            quantity,
        } => {
            let outcome = store.update_cart_item_quantity(product_id.as_str(), quantity);
            let msg = if quantity <= 0 {
                format!("Removed {}", product_id)
            } else {
                format!("Set {} to {}", product_id, quantity)
            };
            report(outcome, ctx, &msg)
        }
        CartCommand::Clear { yes } => clear_cart(&store, ctx, yes),
        CartCommand::Total => {
            let total = store.calculate_cart_total();
            if ctx.output.is_json() {
                ctx.output.json(&json!({ "total": total }));
            } else {
                println!("{}", format_price(total));
            }
            Ok(())
        }
        CartCommand::Count => {
            let count = store.get_cart_item_count();
            if ctx.output.is_json() {
                ctx.output.json(&json!({ "count": count }));
            } else {
                println!("{}", count);
            }
            Ok(())
        }
    }
}

/// Echo change notifications in verbose mode.
pub(crate) fn watch<B: KvBackend>(store: &CartStore<B>, output: Output) {
    store.subscribe(move |change| {
        let product = change
            .product_id
            .as_ref()
            .map(|id| format!(" {}", id))
            .unwrap_or_default();
        output.debug(&format!(
            "{}: {:?}{} ({}, {})",
            change.name(),
            change.kind,
            product,
            format_items(change.cart.item_count()),
            format_price(change.cart.total())
        ));
    });
}

/// Turn a mutation outcome into CLI output.
pub(crate) fn report(outcome: CartOutcome, ctx: &Context, msg: &str) -> Result<()> {
    match outcome {
        CartOutcome::Changed(cart) => {
            if ctx.output.is_json() {
                print_cart_json(&cart, ctx);
            } else {
                ctx.output.success(msg);
                ctx.output.kv(
                    "cart",
                    &format!(
                        "{}, {}",
                        format_items(cart.item_count()),
                        format_price(cart.total())
                    ),
                );
            }
            Ok(())
        }
        CartOutcome::Unchanged => {
            ctx.output.info("Cart unchanged: product not in cart");
            if ctx.output.is_json() {
                ctx.output.json(&json!({ "changed": false }));
            }
            Ok(())
        }
        CartOutcome::Rejected(e) => bail!("Invalid cart input: {}", e),
        CartOutcome::Failed(e) => bail!("Cart was not saved: {}", e),
    }
}

fn show_cart<B: KvBackend>(store: &CartStore<B>, ctx: &Context) -> Result<()> {
    let cart = match store.try_get_cart() {
        Ok(cart) => cart,
        Err(e) if matches!(e, CartError::Corrupt(_)) => {
            ctx.output
                .warn(&format!("Stored cart is unreadable and will be replaced: {}", e));
            Cart::new()
        }
        Err(e) => return Err(e.into()),
    };

    if ctx.output.is_json() {
        print_cart_json(&cart, ctx);
        return Ok(());
    }

    ctx.output.header(&format!("Cart ({})", store.key()));

    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    let widths = [10, 28, 5, 10, 10];
    ctx.output
        .table_row(&["ID", "NAME", "QTY", "PRICE", "SUBTOTAL"], &widths);
    for item in cart.items() {
        ctx.output.table_row(
            &[
                item.product_id.as_str(),
                &item.name,
                &item.quantity.to_string(),
                &format_price(item.price),
                &format_price(item.subtotal()),
            ],
            &widths,
        );
    }

    println!();
    ctx.output.kv("items", &cart.item_count().to_string());
    ctx.output.kv("total", &format_price(cart.total()));

    Ok(())
}

fn add_item<B: KvBackend>(
    store: &CartStore<B>,
    ctx: &Context,
    product_id: String,
    quantity: i64,
    name: Option<String>,
    price: Option<f64>,
    image_url: Option<String>,
) -> Result<()> {
    let (name, price, image_url) = match (name, price) {
        (Some(name), Some(price)) => (name, price, image_url),
        (name, price) => {
            let catalog = ctx.catalog()?;
            let product = catalog.get(&ProductId::new(product_id.as_str()))?;
            ctx.output
                .debug(&format!("Using catalog entry for {}", product.id));
            (
                name.unwrap_or_else(|| product.name.clone()),
                price.unwrap_or(product.price),
                image_url.or_else(|| product.image_url.clone()),
            )
        }
    };

    let msg = format!("Added {} x {}", quantity, name);
    let outcome = store.add_to_cart(product_id, quantity, name, price, image_url);
    report(outcome, ctx, &msg)
}

fn clear_cart<B: KvBackend>(store: &CartStore<B>, ctx: &Context, yes: bool) -> Result<()> {
    if !yes && !ctx.output.is_json() {
        let count = store.get_cart_item_count();
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove {} from the cart?", format_items(count)))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.info("Clear cancelled");
            return Ok(());
        }
    }

    report(store.clear_cart(), ctx, "Cart cleared")
}

fn print_cart_json(cart: &Cart, ctx: &Context) {
    ctx.output.json(&json!({
        "items": cart,
        "count": cart.item_count(),
        "total": cart.total(),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use atelier_store::MemoryStore;

    fn json_context() -> Context {
        Context {
            config: CliConfig::default(),
            output: Output::new(false, true),
            cwd: std::env::temp_dir(),
            config_file: None,
            session: None,
        }
    }

    #[test]
    fn test_report_maps_outcomes() {
        let ctx = json_context();
        let store = CartStore::new(MemoryStore::new());

        assert!(report(store.add_to_cart("p1", 1, "Tee", 25.0, None), &ctx, "ok").is_ok());
        assert!(report(store.remove_from_cart("missing"), &ctx, "ok").is_ok());

        let err = report(store.add_to_cart("p2", 0, "Cap", 15.0, None), &ctx, "ok").unwrap_err();
        assert!(err.to_string().contains("Invalid cart input"));
    }

    #[test]
    fn test_report_fails_when_store_rejects_write() {
        let ctx = json_context();
        let store = CartStore::new(MemoryStore::new().with_quota(8));

        let err = report(store.add_to_cart("p1", 1, "Tee", 25.0, None), &ctx, "ok").unwrap_err();
        assert!(err.to_string().contains("Cart was not saved"));
    }

    #[test]
    fn test_clear_without_prompt_in_json_mode() {
        let ctx = json_context();
        let store = CartStore::new(MemoryStore::new());
        store.add_to_cart("p1", 2, "Tee", 25.0, None);

        clear_cart(&store, &ctx, false).unwrap();
        assert!(store.get_cart().is_empty());
    }

    #[test]
    fn test_add_with_explicit_fields_skips_catalog() {
        let ctx = json_context();
        let store = CartStore::new(MemoryStore::new());

        add_item(
            &store,
            &ctx,
            "p9".to_string(),
            2,
            Some("Scarf".to_string()),
            Some(12.5),
            None,
        )
        .unwrap();
        assert_eq!(store.calculate_cart_total(), 25.0);
    }

    #[test]
    fn test_watch_registers_listener() {
        let store = CartStore::new(MemoryStore::new());
        watch(&store, Output::new(true, false));
        assert_eq!(store.listener_count(), 1);
    }
}

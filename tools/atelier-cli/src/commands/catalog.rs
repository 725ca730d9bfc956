//! Catalog commands.

use anyhow::{Context as _, Result};
use atelier_commerce::prelude::*;

use super::cart::{report, watch};
use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;
use crate::output::format_price;

/// Run the catalog command.
pub fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CatalogCommand::List {
            category,
            search,
            sort,
        } => list_products(ctx, category, search, sort),
        CatalogCommand::Add {
            product_id,
            quantity,
        } => add_product(ctx, &product_id, quantity),
        CatalogCommand::Categories => list_categories(ctx),
    }
}

/// Build a listing query from command line filters and the configured default sort.
fn build_query(
    ctx: &Context,
    category: Option<String>,
    search: Option<String>,
    sort: Option<String>,
) -> Result<ProductQuery> {
    let sort = sort.unwrap_or_else(|| ctx.config.catalog.default_sort.clone());
    let sort: SortOption = sort.parse().context("Invalid sort option")?;

    let mut query = ProductQuery::new().with_sort(sort);
    if let Some(category) = category {
        query = query.with_category(category);
    }
    if let Some(search) = search {
        query = query.with_search(search);
    }
    Ok(query)
}

fn list_products(
    ctx: &Context,
    category: Option<String>,
    search: Option<String>,
    sort: Option<String>,
) -> Result<()> {
    let catalog = ctx.catalog()?;
    let query = build_query(ctx, category, search, sort)?;
    let products = catalog.query(&query);

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header(&format!(
        "Products ({} of {}, {})",
        products.len(),
        catalog.len(),
        query.sort.display_name()
    ));

    if products.is_empty() {
        ctx.output.info("No products match");
        return Ok(());
    }

    let widths = [10, 28, 14, 10];
    ctx.output
        .table_row(&["ID", "NAME", "CATEGORY", "PRICE"], &widths);
    for product in &products {
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &product.name,
                &product.category,
                &product.display_price(),
            ],
            &widths,
        );
    }

    Ok(())
}

fn add_product(ctx: &Context, product_id: &str, quantity: i64) -> Result<()> {
    let catalog = ctx.catalog()?;
    let product = catalog.get(&ProductId::new(product_id))?;

    let store = ctx.cart_store()?;
    watch(&store, ctx.output);

    let msg = format!(
        "Added {} x {} at {}",
        quantity,
        product.name,
        format_price(product.price)
    );
    report(store.add_product(product, quantity), ctx, &msg)
}

fn list_categories(ctx: &Context) -> Result<()> {
    let categories = ctx.catalog()?.categories();

    if ctx.output.is_json() {
        ctx.output.json(&categories);
        return Ok(());
    }

    ctx.output.header("Categories");
    for category in &categories {
        ctx.output.list_item(category);
    }

    Ok(())
}

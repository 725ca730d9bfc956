//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod config;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show cart contents.
    Show,
    /// Add a product to the cart.
    Add {
        /// Product ID.
        product_id: String,

        /// Quantity to add.
        #[arg(short, long = "qty", visible_alias = "quantity", default_value = "1")]
        quantity: i64,

        /// Product name; looked up in the catalog when omitted.
        #[arg(long)]
        name: Option<String>,

        /// Unit price; looked up in the catalog when omitted.
        #[arg(long)]
        price: Option<f64>,

        /// Product image URL.
        #[arg(long = "image")]
        image_url: Option<String>,
    },
    /// Remove a product from the cart.
    Remove {
        /// Product ID.
        product_id: String,
    },
    /// Set the quantity of a product. Zero or less removes it.
    Update {
        /// Product ID.
        product_id: String,

        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove everything from the cart.
    Clear {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the cart total.
    Total,
    /// Print the number of items in the cart.
    Count,
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products.
    List {
        /// Category to show ("all" shows everything).
        #[arg(long)]
        category: Option<String>,

        /// Case-insensitive name search.
        #[arg(long)]
        search: Option<String>,

        /// Sort order (default, price-asc, price-desc, name-asc, name-desc).
        #[arg(long)]
        sort: Option<String>,
    },
    /// Add a catalog product to the cart at its current price.
    Add {
        /// Product ID.
        product_id: String,

        /// Quantity to add.
        #[arg(short, long = "qty", visible_alias = "quantity", default_value = "1")]
        quantity: i64,
    },
    /// List categories.
    Categories,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

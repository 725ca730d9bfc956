//! Cart state management and catalog queries for Atelier.
//!
//! This crate provides:
//!
//! - **Cart**: line items keyed by product, persisted through any
//!   [`atelier_store::KvBackend`], with change notifications
//! - **Catalog**: product listings with category filters, name search and
//!   sorting
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_commerce::prelude::*;
//! use atelier_store::MemoryStore;
//!
//! let store = CartStore::new(MemoryStore::new());
//!
//! let _sub = store.subscribe(|change| {
//!     println!("cart now holds {} items", change.cart.item_count());
//! });
//!
//! store.add_to_cart("p1", 1, "Shirt", 20.0, None);
//! store.add_to_cart("p2", 2, "Jeans", 50.0, None);
//! store.update_cart_item_quantity("p1", 3);
//!
//! assert_eq!(store.calculate_cart_total(), 160.0);
//! assert_eq!(store.get_cart_item_count(), 5);
//! ```

pub mod error;
pub mod ids;

pub mod cart;
pub mod catalog;

pub use error::{CartError, CatalogError};
pub use ids::ProductId;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CartError, CatalogError};
    pub use crate::ids::ProductId;

    // Cart
    pub use crate::cart::{
        Cart, CartChange, CartLineItem, CartOutcome, CartStore, ChangeKind, SubscriptionId,
        CART_STORAGE_KEY, CART_UPDATED_EVENT,
    };

    // Catalog
    pub use crate::catalog::{Catalog, Product, ProductQuery, SortOption};
}

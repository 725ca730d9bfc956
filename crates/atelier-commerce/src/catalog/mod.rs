//! Product catalog module.
//!
//! Contains the product listing and the filter/search/sort helpers used by
//! every listing page.

mod product;
mod query;

pub use product::{Catalog, Product};
pub use query::{ProductQuery, SortOption};

//! Commerce error types.

use std::path::PathBuf;

use atelier_store::StoreError;
use thiserror::Error;

/// Errors produced by cart operations.
///
/// The first group describes rejected input; the operation was a no-op.
/// The rest describe storage trouble.
#[derive(Error, Debug)]
pub enum CartError {
    /// Product ID missing or blank.
    #[error("Product ID is required")]
    InvalidProductId,

    /// Product name missing or blank.
    #[error("Product name is required")]
    InvalidName,

    /// Price not a finite positive number.
    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    /// Quantity not positive.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in quantity calculation")]
    Overflow,

    /// Persisted cart data could not be read as a valid cart.
    #[error("Corrupt cart data: {0}")]
    Corrupt(String),

    /// Backend read or write failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl CartError {
    /// Whether this error rejected caller input, as opposed to a storage
    /// failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            CartError::InvalidProductId
                | CartError::InvalidName
                | CartError::InvalidPrice(_)
                | CartError::InvalidQuantity(_)
                | CartError::Overflow
        )
    }
}

/// Errors produced while loading or querying the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog data is not a valid product list.
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Unrecognized sort option.
    #[error("Unknown sort option: {0}")]
    UnknownSort(String),
}

//! Local key-value storage for Atelier.
//!
//! Provides a small synchronous storage contract ([`KvBackend`]) with two
//! implementations, and a typed wrapper with automatic JSON serialization.
//!
//! - [`MemoryStore`]: in-process map, used by tests and short-lived tools
//! - [`FileStore`]: embedded directory store, one file per key
//! - [`Cache`]: typed `get`/`set`/`delete` over any backend
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_store::{Cache, MemoryStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Wishlist {
//!     items: Vec<String>,
//! }
//!
//! let cache = Cache::new(MemoryStore::new());
//!
//! // Store a value
//! cache.set("wishlist:guest", &wishlist)?;
//!
//! // Retrieve a value
//! let wishlist: Option<Wishlist> = cache.get("wishlist:guest")?;
//!
//! // Delete a value
//! cache.delete("wishlist:guest")?;
//! ```

mod backend;
mod error;
mod file;
mod kv;
mod memory;

pub use backend::KvBackend;
pub use error::StoreError;
pub use file::FileStore;
pub use kv::Cache;
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, FileStore, KvBackend, MemoryStore, StoreError};
}

//! Key-Value store wrapper with automatic serialization.

use crate::{KvBackend, StoreError};
use serde::{de::DeserializeOwned, Serialize};

/// Type-safe cache over any [`KvBackend`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Debug, Clone)]
pub struct Cache<B> {
    backend: B,
}

impl<B: KvBackend> Cache<B> {
    /// Wrap a backend.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::new(FileStore::open(".atelier/store")?);
    /// ```
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Borrow the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist, and
    /// [`StoreError::SerializeError`] if the stored bytes are not valid JSON
    /// for `T`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let wishlist: Option<Wishlist> = cache.get("wishlist:guest")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.get(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("wishlist:guest", &wishlist)?;
    /// ```
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.set(key, &bytes)
    }

    /// Store raw bytes under a key, bypassing serialization.
    pub fn set_raw(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.backend.set(key, bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.backend.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.backend.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.backend.keys()
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = cache_key!("shoppingCart", session);
/// // Returns "shoppingCart:guest"
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wishlist {
        items: Vec<String>,
    }

    #[test]
    fn test_typed_round_trip() {
        let cache = Cache::new(MemoryStore::new());
        let list = Wishlist {
            items: vec!["Hoodie".to_string()],
        };

        cache.set("wishlist", &list).unwrap();
        assert_eq!(cache.get::<Wishlist>("wishlist").unwrap(), Some(list));
        assert_eq!(cache.get::<Wishlist>("other").unwrap(), None);
    }

    #[test]
    fn test_corrupt_value_is_serialize_error() {
        let cache = Cache::new(MemoryStore::new());
        cache.set_raw("wishlist", b"{not json").unwrap();

        let err = cache.get::<Wishlist>("wishlist").unwrap_err();
        assert!(matches!(err, StoreError::SerializeError(_)));
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(cache_key!("shoppingCart", "guest"), "shoppingCart:guest");
        assert_eq!(cache_key!("cart", "a", 7), "cart:a:7");
    }
}

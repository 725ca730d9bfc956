//! Persistent cart store.
//!
//! [`CartStore`] is the only reader and writer of the persisted cart. Every
//! operation reads the cart fresh from the backend, so several stores over
//! one backend (one per window, process or tab) see each other's writes.
//! There is no locking across the read-modify-write cycle: concurrent
//! writers resolve as last-write-wins.
//!
//! Public operations never panic and never return `Err`. Mutations report a
//! [`CartOutcome`] that callers may inspect or ignore; ignoring it gives the
//! fire-and-forget behavior where a failed add simply does nothing.

use atelier_store::{cache_key, Cache, KvBackend, StoreError};
use tracing::{error, warn};

use crate::cart::events::{CartChange, ChangeKind, ChangeNotifier, SubscriptionId};
use crate::cart::{Cart, CartLineItem};
use crate::catalog::Product;
use crate::error::CartError;
use crate::ids::ProductId;

/// Default storage key of the cart slot.
pub const CART_STORAGE_KEY: &str = "shoppingCart";

/// Result of a cart mutation.
#[derive(Debug)]
pub enum CartOutcome {
    /// The cart was persisted and listeners were notified.
    Changed(Cart),
    /// Nothing matched; no write, no notification.
    Unchanged,
    /// Input was invalid; no write, no notification.
    Rejected(CartError),
    /// Storage failed; the mutation was lost and nobody was notified.
    Failed(CartError),
}

impl CartOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, CartOutcome::Changed(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, CartOutcome::Rejected(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CartOutcome::Failed(_))
    }

    /// New cart contents, if the mutation went through.
    pub fn cart(&self) -> Option<&Cart> {
        match self {
            CartOutcome::Changed(cart) => Some(cart),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CartError> {
        match self {
            CartOutcome::Rejected(e) | CartOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Convert to a `Result`; `Ok(None)` means nothing changed.
    pub fn into_result(self) -> Result<Option<Cart>, CartError> {
        match self {
            CartOutcome::Changed(cart) => Ok(Some(cart)),
            CartOutcome::Unchanged => Ok(None),
            CartOutcome::Rejected(e) | CartOutcome::Failed(e) => Err(e),
        }
    }
}

/// Cart state backed by a key-value store.
///
/// # Example
///
/// ```rust,ignore
/// let store = CartStore::new(FileStore::open(".atelier/store")?);
/// store.add_to_cart("p1", 1, "Shirt", 20.0, None);
/// println!("{} items", store.get_cart_item_count());
/// ```
#[derive(Debug)]
pub struct CartStore<B> {
    cache: Cache<B>,
    key: String,
    notifier: ChangeNotifier,
}

impl<B: KvBackend> CartStore<B> {
    /// Create a store using the default [`CART_STORAGE_KEY`] slot.
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, CART_STORAGE_KEY)
    }

    /// Create a store using a custom slot.
    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            cache: Cache::new(backend),
            key: key.into(),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Create a store for one shopper session (`shoppingCart:<session>`).
    pub fn for_session(backend: B, session: &str) -> Self {
        Self::with_key(backend, cache_key!(CART_STORAGE_KEY, session))
    }

    /// Storage key of the cart slot.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        self.cache.backend()
    }

    /// Register a change listener.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&CartChange) + Send + Sync + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// Remove a change listener.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.notifier.listener_count()
    }

    /// Read the persisted cart, reporting absent data as an empty cart and
    /// anything unparseable as an error.
    ///
    /// Individual line items that cannot be counted (blank id, quantity
    /// below 1, negative or non-finite price) are dropped and logged; the
    /// rest of the cart survives.
    pub fn try_get_cart(&self) -> Result<Cart, CartError> {
        let mut cart = match self.cache.get::<Cart>(&self.key) {
            Ok(Some(cart)) => cart,
            Ok(None) => return Ok(Cart::new()),
            Err(StoreError::SerializeError(e)) => return Err(CartError::Corrupt(e.to_string())),
            Err(e) => return Err(CartError::Storage(e)),
        };

        for (index, item, reason) in cart.drop_unreadable() {
            warn!(
                key = %self.key,
                index,
                product_id = %item.product_id,
                error = %reason,
                "Dropping unreadable cart line item"
            );
        }
        Ok(cart)
    }

    /// Read the persisted cart, falling back to an empty cart on any error.
    pub fn get_cart(&self) -> Cart {
        self.try_get_cart().unwrap_or_else(|e| {
            error!(key = %self.key, error = %e, "Failed to read cart, using empty cart");
            Cart::new()
        })
    }

    /// Add `quantity` units of a product.
    ///
    /// Rejected when the product ID or name is blank, the price is not a
    /// finite positive number, or the quantity is not positive. An existing
    /// line item keeps its price and grows by `quantity`.
    pub fn add_to_cart(
        &self,
        product_id: impl Into<ProductId>,
        quantity: i64,
        name: impl Into<String>,
        price: f64,
        image_url: Option<String>,
    ) -> CartOutcome {
        let item = match CartLineItem::new(product_id, quantity, name, price, image_url) {
            Ok(item) => item,
            Err(e) => return reject("add to cart", e),
        };

        let mut cart = match self.load_for_update() {
            Ok(cart) => cart,
            Err(e) => return self.fail("add to cart", e),
        };

        let product_id = item.product_id.clone();
        if let Err(e) = cart.add_item(item) {
            return reject("add to cart", e);
        }

        self.commit(cart, ChangeKind::Added, Some(product_id))
    }

    /// Add a single unit of a product.
    pub fn add_one(
        &self,
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        price: f64,
        image_url: Option<String>,
    ) -> CartOutcome {
        self.add_to_cart(product_id, 1, name, price, image_url)
    }

    /// Add a catalog product, freezing its current price in the cart.
    pub fn add_product(&self, product: &Product, quantity: i64) -> CartOutcome {
        self.add_to_cart(
            &product.id,
            quantity,
            product.name.as_str(),
            product.price,
            product.image_url.clone(),
        )
    }

    /// Remove every line item for a product.
    ///
    /// Writes and notifies only when something was removed.
    pub fn remove_from_cart(&self, product_id: impl Into<ProductId>) -> CartOutcome {
        let product_id = product_id.into();
        if product_id.is_blank() {
            return reject("remove from cart", CartError::InvalidProductId);
        }

        let mut cart = match self.load_for_update() {
            Ok(cart) => cart,
            Err(e) => return self.fail("remove from cart", e),
        };

        if !cart.remove_item(&product_id) {
            return CartOutcome::Unchanged;
        }

        self.commit(cart, ChangeKind::Removed, Some(product_id))
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// A quantity of zero or less removes the product. Writes and notifies
    /// only when a matching line item exists.
    pub fn update_cart_item_quantity(
        &self,
        product_id: impl Into<ProductId>,
        quantity: i64,
    ) -> CartOutcome {
        let product_id = product_id.into();
        if product_id.is_blank() {
            return reject("update cart quantity", CartError::InvalidProductId);
        }

        if quantity <= 0 {
            return self.remove_from_cart(product_id);
        }

        let mut cart = match self.load_for_update() {
            Ok(cart) => cart,
            Err(e) => return self.fail("update cart quantity", e),
        };

        if !cart.update_quantity(&product_id, quantity) {
            return CartOutcome::Unchanged;
        }

        self.commit(cart, ChangeKind::QuantityUpdated, Some(product_id))
    }

    /// Delete the persisted cart and notify listeners with an empty cart.
    ///
    /// Runs even when the cart is already empty.
    pub fn clear_cart(&self) -> CartOutcome {
        if let Err(e) = self.cache.delete(&self.key) {
            return self.fail("clear cart", CartError::Storage(e));
        }

        let cart = Cart::new();
        self.notifier.publish(&CartChange {
            kind: ChangeKind::Cleared,
            product_id: None,
            cart: cart.clone(),
        });
        CartOutcome::Changed(cart)
    }

    /// Sum of price times quantity over the persisted cart.
    pub fn calculate_cart_total(&self) -> f64 {
        self.get_cart().total()
    }

    /// Sum of quantities over the persisted cart.
    pub fn get_cart_item_count(&self) -> i64 {
        self.get_cart().item_count()
    }

    /// Read the cart before a mutation.
    ///
    /// Corrupt data is replaced by an empty cart so the mutation overwrites
    /// it. A backend read failure aborts the mutation.
    fn load_for_update(&self) -> Result<Cart, CartError> {
        match self.try_get_cart() {
            Ok(cart) => Ok(cart),
            Err(CartError::Corrupt(reason)) => {
                error!(key = %self.key, %reason, "Discarding corrupt cart data");
                Ok(Cart::new())
            }
            Err(e) => Err(e),
        }
    }

    fn commit(&self, cart: Cart, kind: ChangeKind, product_id: Option<ProductId>) -> CartOutcome {
        if let Err(e) = self.cache.set(&self.key, &cart) {
            return self.fail("save cart", CartError::Storage(e));
        }

        self.notifier.publish(&CartChange {
            kind,
            product_id,
            cart: cart.clone(),
        });
        CartOutcome::Changed(cart)
    }

    fn fail(&self, operation: &str, e: CartError) -> CartOutcome {
        error!(key = %self.key, error = %e, "Failed to {}", operation);
        CartOutcome::Failed(e)
    }
}

fn reject(operation: &str, e: CartError) -> CartOutcome {
    warn!(error = %e, "Rejected {}", operation);
    CartOutcome::Rejected(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_store::MemoryStore;
    use std::sync::{Arc, Mutex};

    fn recorded(store: &CartStore<MemoryStore>) -> Arc<Mutex<Vec<CartChange>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |change| sink.lock().unwrap().push(change.clone()));
        seen
    }

    #[test]
    fn test_empty_store_reads_empty_cart() {
        let store = CartStore::new(MemoryStore::new());
        assert!(store.get_cart().is_empty());
        assert_eq!(store.calculate_cart_total(), 0.0);
        assert_eq!(store.get_cart_item_count(), 0);
    }

    #[test]
    fn test_add_persists_and_notifies() {
        let store = CartStore::new(MemoryStore::new());
        let seen = recorded(&store);

        let outcome = store.add_to_cart("p1", 2, "Jeans", 50.0, None);
        assert!(outcome.is_changed());
        assert!(store.backend().exists(CART_STORAGE_KEY).unwrap());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, ChangeKind::Added);
        assert_eq!(seen[0].product_id, Some(ProductId::new("p1")));
        assert_eq!(seen[0].cart.item_count(), 2);
    }

    #[test]
    fn test_rejected_add_does_not_write() {
        let store = CartStore::new(MemoryStore::new());
        let seen = recorded(&store);

        assert!(store.add_to_cart("p1", 1, "Tee", -5.0, None).is_rejected());
        assert!(store.add_to_cart("p1", 0, "Tee", 5.0, None).is_rejected());
        assert!(store.add_to_cart("p1", 1, "", 5.0, None).is_rejected());

        assert!(store.backend().is_empty());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_blank_id_on_remove_and_update() {
        let store = CartStore::new(MemoryStore::new());
        assert!(matches!(
            store.remove_from_cart(""),
            CartOutcome::Rejected(CartError::InvalidProductId)
        ));
        assert!(matches!(
            store.update_cart_item_quantity("", 3),
            CartOutcome::Rejected(CartError::InvalidProductId)
        ));
    }

    #[test]
    fn test_update_missing_item_is_unchanged() {
        let store = CartStore::new(MemoryStore::new());
        store.add_to_cart("p1", 1, "Tee", 25.0, None);
        let seen = recorded(&store);

        assert!(matches!(
            store.update_cart_item_quantity("p9", 4),
            CartOutcome::Unchanged
        ));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_update_negative_removes() {
        let store = CartStore::new(MemoryStore::new());
        store.add_to_cart("p1", 1, "Tee", 25.0, None);
        let seen = recorded(&store);

        assert!(store.update_cart_item_quantity("p1", -1).is_changed());
        assert!(store.get_cart().is_empty());
        assert_eq!(seen.lock().unwrap()[0].kind, ChangeKind::Removed);
    }

    #[test]
    fn test_clear_notifies_even_when_empty() {
        let store = CartStore::new(MemoryStore::new());
        let seen = recorded(&store);

        assert!(store.clear_cart().is_changed());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, ChangeKind::Cleared);
        assert!(seen[0].cart.is_empty());
    }

    #[test]
    fn test_write_failure_is_reported_not_notified() {
        let store = CartStore::new(MemoryStore::new().with_quota(16));
        let seen = recorded(&store);

        let outcome = store.add_to_cart("p1", 1, "Leather Jacket", 120.0, None);
        assert!(outcome.is_failed());
        assert!(matches!(
            outcome.error(),
            Some(CartError::Storage(StoreError::QuotaExceeded { .. }))
        ));
        assert!(store.get_cart().is_empty());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_session_key() {
        let store = CartStore::for_session(MemoryStore::new(), "guest");
        assert_eq!(store.key(), "shoppingCart:guest");

        store.add_to_cart("p1", 1, "Tee", 25.0, None);
        assert!(store.backend().exists("shoppingCart:guest").unwrap());
        assert!(!store.backend().exists(CART_STORAGE_KEY).unwrap());
    }

    #[test]
    fn test_try_get_cart_reports_corruption() {
        let store = CartStore::new(MemoryStore::new());
        store.backend().set(CART_STORAGE_KEY, b"not json").unwrap();

        assert!(matches!(store.try_get_cart(), Err(CartError::Corrupt(_))));
        assert!(store.get_cart().is_empty());
    }

    #[test]
    fn test_into_result() {
        let store = CartStore::new(MemoryStore::new());
        let cart = store
            .add_to_cart("p1", 1, "Tee", 25.0, None)
            .into_result()
            .unwrap()
            .unwrap();
        assert_eq!(cart.item_count(), 1);

        assert!(store.remove_from_cart("p9").into_result().unwrap().is_none());
        assert!(store.add_one("", "Tee", 25.0, None).into_result().is_err());
    }
}

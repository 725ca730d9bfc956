//! Cart and line item types.

use crate::error::CartError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// One product in the cart with its quantity and price snapshot.
///
/// The price is captured when the product is added and never refreshed from
/// the catalog afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Units in the cart, always at least 1.
    pub quantity: i64,
    /// Product name (denormalized for display).
    pub name: String,
    /// Unit price at add time.
    pub price: f64,
    /// Display image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLineItem {
    /// Create a validated line item.
    ///
    /// Returns an error if the product ID or name is blank, the price is not
    /// a finite positive number, or the quantity is not positive.
    pub fn new(
        product_id: impl Into<ProductId>,
        quantity: i64,
        name: impl Into<String>,
        price: f64,
        image_url: Option<String>,
    ) -> Result<Self, CartError> {
        let item = Self {
            product_id: product_id.into(),
            quantity,
            name: name.into(),
            price,
            image_url,
        };
        item.validate()?;
        Ok(item)
    }

    /// Check the line item invariants.
    pub fn validate(&self) -> Result<(), CartError> {
        if self.product_id.is_blank() {
            return Err(CartError::InvalidProductId);
        }
        if self.name.trim().is_empty() {
            return Err(CartError::InvalidName);
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(CartError::InvalidPrice(self.price));
        }
        if self.quantity <= 0 {
            return Err(CartError::InvalidQuantity(self.quantity));
        }
        Ok(())
    }

    /// Check a line item read back from storage.
    ///
    /// Looser than [`CartLineItem::validate`]: a free item (price 0) or a
    /// blank display name is kept. Only lines that cannot be counted or
    /// totalled are refused.
    pub fn check_stored(&self) -> Result<(), CartError> {
        if self.product_id.is_blank() {
            return Err(CartError::InvalidProductId);
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CartError::InvalidPrice(self.price));
        }
        if self.quantity <= 0 {
            return Err(CartError::InvalidQuantity(self.quantity));
        }
        Ok(())
    }

    /// Unit price times quantity.
    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// The ordered collection of line items for one shopper.
///
/// Serialized as a bare JSON array of line items.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Add a line item.
    ///
    /// If the product is already in the cart its quantity grows by the new
    /// item's quantity and the stored price and name are kept. Otherwise the
    /// item is appended.
    pub fn add_item(&mut self, item: CartLineItem) -> Result<(), CartError> {
        item.validate()?;

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            existing.quantity = existing
                .quantity
                .checked_add(item.quantity)
                .ok_or(CartError::Overflow)?;
            return Ok(());
        }

        self.items.push(item);
        Ok(())
    }

    /// Remove every line item for a product.
    ///
    /// Returns true if anything was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        self.items.len() != len_before
    }

    /// Set the quantity of a product.
    ///
    /// A quantity of zero or less removes the product. Returns true if a
    /// matching line item was found.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        let mut updated = false;
        for item in self.items.iter_mut().filter(|i| &i.product_id == product_id) {
            item.quantity = quantity;
            updated = true;
        }
        updated
    }

    /// Sum of unit price times quantity over all items.
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }

    /// Get total item count (sum of quantities), saturating at `i64::MAX`.
    pub fn item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |count, i| count.saturating_add(i.quantity))
    }

    /// Get number of unique items.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by product ID.
    pub fn get_item(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// Drop line items that fail [`CartLineItem::check_stored`].
    ///
    /// Returns the dropped items with their position in the stored array and
    /// the reason. The remaining items keep their order.
    pub fn drop_unreadable(&mut self) -> Vec<(usize, CartLineItem, CartError)> {
        let mut dropped = Vec::new();
        let mut kept = Vec::with_capacity(self.items.len());
        for (index, item) in std::mem::take(&mut self.items).into_iter().enumerate() {
            match item.check_stored() {
                Ok(()) => kept.push(item),
                Err(e) => dropped.push((index, item, e)),
            }
        }
        self.items = kept;
        dropped
    }
}

//! Shopping cart module.
//!
//! Contains the cart aggregate, the persistent cart store and its change
//! notifications.

#[allow(clippy::module_inception)]
mod cart;
mod events;
mod store;

pub use cart::{Cart, CartLineItem};
pub use events::{
    CartChange, ChangeKind, ChangeNotifier, SubscriptionId, CART_UPDATED_EVENT,
};
pub use store::{CartOutcome, CartStore, CART_STORAGE_KEY};

//! Change notifications.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::cart::Cart;
use crate::ids::ProductId;

/// Name of the change notification event.
pub const CART_UPDATED_EVENT: &str = "cartUpdated";

/// What kind of mutation produced a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A product was added or its quantity grew.
    Added,
    /// A product was removed.
    Removed,
    /// A product's quantity was set.
    QuantityUpdated,
    /// The whole cart was cleared.
    Cleared,
}

/// Payload delivered to listeners after a successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartChange {
    /// Mutation kind.
    pub kind: ChangeKind,
    /// Product touched by the mutation; `None` for [`ChangeKind::Cleared`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    /// Cart contents after the mutation.
    pub cart: Cart,
}

impl CartChange {
    /// Event name, shared by every change.
    pub fn name(&self) -> &'static str {
        CART_UPDATED_EVENT
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&CartChange) + Send + Sync>;

#[derive(Default)]
struct NotifierState {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

/// Synchronous fan-out of [`CartChange`]s to registered callbacks.
///
/// The listener list is copied before delivery, so callbacks may subscribe,
/// unsubscribe or read the cart without deadlocking.
#[derive(Default)]
pub struct ChangeNotifier {
    inner: Mutex<NotifierState>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked after every change.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&CartChange) + Send + Sync + 'static,
    {
        let mut state = self.lock_state();
        let id = SubscriptionId(state.next_id);
        state.next_id = state.next_id.saturating_add(1);
        state.listeners.push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback. Returns false if the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.lock_state();
        let len_before = state.listeners.len();
        state.listeners.retain(|(existing, _)| *existing != id);
        state.listeners.len() != len_before
    }

    pub fn listener_count(&self) -> usize {
        self.lock_state().listeners.len()
    }

    /// Deliver a change to every listener. Returns how many were called.
    pub fn publish(&self, change: &CartChange) -> usize {
        let listeners: Vec<Listener> = self
            .lock_state()
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        tracing::debug!(
            event = CART_UPDATED_EVENT,
            kind = ?change.kind,
            listeners = listeners.len(),
            "Publishing cart change"
        );

        for listener in &listeners {
            listener(change);
        }
        listeners.len()
    }

    fn lock_state(&self) -> MutexGuard<'_, NotifierState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

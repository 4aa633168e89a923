//! Cart session — reducer state wired to persisted storage.
//!
//! DESIGN
//! ======
//! The session owns the `CartState` and a `PersistedStore` holding only the
//! item list (panel visibility is not persisted). Opening a session
//! hydrates the store and replays stored items through `LOAD_CART`; every
//! dispatch that changes the item list is mirrored back into the store,
//! which debounces the actual write.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::{CartAction, CartItem, CartState, reduce};
use crate::store::{KvStore, PersistedStore, StoreError};

/// Storage key for the persisted item list.
pub const CART_STORAGE_KEY: &str = "octodeco_cart";

pub struct CartSession {
    state: CartState,
    items: PersistedStore<Vec<CartItem>>,
}

impl CartSession {
    /// Open a session over `backend`, restoring any stored items.
    ///
    /// `None` runs the cart purely in memory.
    pub async fn open(backend: Option<Arc<dyn KvStore>>, debounce: Duration) -> Self {
        let mut items: PersistedStore<Vec<CartItem>> =
            PersistedStore::new(CART_STORAGE_KEY, Vec::new(), backend).with_debounce(debounce);
        items.hydrate().await;

        let mut session = Self { state: CartState::new(), items };
        if !session.items.value().is_empty() {
            let stored = session.items.value().clone();
            info!(lines = stored.len(), "restoring stored cart");
            session.state = reduce(&session.state, CartAction::LoadCart(stored));
        }
        session
    }

    /// Apply `action` and mirror a changed item list into storage.
    pub fn dispatch(&mut self, action: CartAction) {
        let kind = action.kind().to_owned();
        let next = reduce(&self.state, action);
        let items_changed = next.items != self.state.items;
        self.state = next;

        debug!(action = %kind, items_changed, "cart action applied");
        if items_changed && self.items.is_hydrated() {
            self.items.set(self.state.items.clone());
        }
    }

    #[must_use]
    pub fn state(&self) -> &CartState {
        &self.state
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.state.item_count()
    }

    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.state.subtotal()
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.items.is_hydrated()
    }

    /// Write the current item list now instead of waiting for the debounce.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the write fails.
    pub async fn flush(&mut self) -> Result<(), StoreError> {
        self.items.flush().await
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

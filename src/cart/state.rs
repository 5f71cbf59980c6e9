//! Shopping Cart State Management
//!
//! This module manages the application state shared by every request:
//! the catalog, the key-value cart storage and each visitor's selections.

use super::selection::Selections;
use super::session::CartSession;
use super::store::KeyValueCartStore;
use crate::catalog::Catalog;
use dashmap::{mapref::entry::Entry, DashMap};
use std::{mem, sync::Arc};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state
pub struct AppState {
    pub catalog: Arc<Catalog>,

    /// Serialized carts, keyed by `<session>:carrinho`.
    /// DashMap allows concurrent access without external Mutexes.
    pub storage: Arc<DashMap<String, String>>,

    /// Uncommitted selections, keyed by session id
    pub selections: DashMap<String, Selections>,

    /// Page the cart is handed off to
    pub checkout_path: String,
}

impl AppState {
    pub fn new(catalog: Catalog, checkout_path: impl Into<String>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            storage: Arc::new(DashMap::new()),
            selections: DashMap::new(),
            checkout_path: checkout_path.into(),
        }
    }

    /// Runs `f` against the session of `session_id`.
    ///
    /// The cart is hydrated from storage and every change `f` makes to it is
    /// written back by the session itself; selections are stored again when
    /// `f` returns. Requests for the same session run one at a time.
    ///
    /// Only sessions holding at least one selection keep an entry, so
    /// read-only requests leave the state as they found it.
    pub fn with_session<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut CartSession<KeyValueCartStore>) -> R,
    ) -> R {
        let mut slot = self.selections.entry(session_id.to_string());
        let previous = match &mut slot {
            Entry::Occupied(entry) => mem::take(entry.get_mut()),
            Entry::Vacant(_) => Selections::new(),
        };

        let store = KeyValueCartStore::new(self.storage.clone(), session_id);
        let mut session = CartSession::resume(store, previous);
        let result = f(&mut session);
        let selections = session.into_selections();

        match slot {
            Entry::Occupied(entry) if selections.is_empty() => {
                entry.remove();
            }
            Entry::Occupied(mut entry) => {
                entry.insert(selections);
            }
            Entry::Vacant(entry) if !selections.is_empty() => {
                entry.insert(selections);
            }
            Entry::Vacant(_) => {}
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SectionKey;

    fn state() -> AppState {
        AppState::new(Catalog::bundled().unwrap(), "/pedidos")
    }

    #[test]
    fn test_read_only_sessions_leave_no_entries() {
        let state = state();

        for n in 0..50 {
            let id = format!("visitor-{n}");
            state.with_session(&id, |cart| cart.view());
            state.with_session(&id, |cart| cart.remove_from_cart(0));
        }

        assert_eq!(state.selections.len(), 0);
        assert_eq!(state.storage.len(), 0);
    }

    #[test]
    fn test_selection_change_keeps_entry() {
        let state = state();
        state.with_session("s1", |cart| {
            cart.update_selection(SectionKey::Porcoes, 1, 2.0, None, None);
        });
        state.with_session("s1", |cart| cart.view());

        assert_eq!(state.selections.len(), 1);
        let kept = state.selections.get("s1").map(|s| s.len());
        assert_eq!(kept, Some(1));
    }
}

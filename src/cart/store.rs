//! Cart persistence
//!
//! The cart is written after every mutation and read back once when a
//! session opens. Two interchangeable backends exist: a key-value store
//! that outlives the request, and a navigation payload carried in a query
//! string. Neither ever fails a load: unreadable data is an empty cart.

use super::models::{Cart, CartLine};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use url::form_urlencoded;

/// Fixed key the cart is stored under
pub const CART_STORAGE_KEY: &str = "carrinho";

/// Where a session's cart is read from and written to.
pub trait CartStore {
    /// Reads the persisted cart. Missing or malformed data yields an empty cart.
    fn load(&self) -> Cart;

    /// Best-effort write of the whole cart.
    fn save(&mut self, cart: &[CartLine]);
}

/// Serializes the cart in line order.
pub fn serialize_cart(cart: &[CartLine]) -> String {
    serde_json::to_string(cart).unwrap_or_else(|e| {
        warn!("Failed to serialize cart: {}", e);
        "[]".to_string()
    })
}

/// Parses a serialized cart, falling back to an empty one.
pub fn parse_cart(raw: &str) -> Cart {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Discarding unreadable cart: {}", e);
        Cart::new()
    })
}

// =============================================================================
// Key-value backend
// =============================================================================

/// Cart stored as a serialized string in a shared key-value map, scoped
/// to one visitor.
#[derive(Debug, Clone)]
pub struct KeyValueCartStore {
    entries: Arc<DashMap<String, String>>,
    key: String,
}

impl KeyValueCartStore {
    pub fn new(entries: Arc<DashMap<String, String>>, scope: &str) -> Self {
        Self {
            entries,
            key: format!("{}:{}", scope, CART_STORAGE_KEY),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl CartStore for KeyValueCartStore {
    fn load(&self) -> Cart {
        match self.entries.get(&self.key) {
            Some(raw) => parse_cart(raw.value()),
            None => Cart::new(),
        }
    }

    /// An empty cart is stored as no entry at all.
    fn save(&mut self, cart: &[CartLine]) {
        if cart.is_empty() {
            self.entries.remove(&self.key);
            return;
        }
        self.entries.insert(self.key.clone(), serialize_cart(cart));
    }
}

// =============================================================================
// Navigation payload backend
// =============================================================================

/// Cart carried in a query string under `carrinho`.
#[derive(Debug, Clone, Default)]
pub struct QueryCartStore {
    query: String,
}

impl QueryCartStore {
    /// Wraps an incoming query string (with or without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        Self {
            query: query.trim_start_matches('?').to_string(),
        }
    }

    /// Current payload, without the leading `?`.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Link to `path` carrying the current cart. A query already on `path`
    /// is kept and the payload appended to it.
    pub fn link(&self, path: &str) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{}{}{}", path, separator, self.query)
    }
}

impl CartStore for QueryCartStore {
    fn load(&self) -> Cart {
        let payload = form_urlencoded::parse(self.query.as_bytes())
            .find(|(key, _)| key == CART_STORAGE_KEY)
            .map(|(_, value)| value.into_owned());

        match payload {
            Some(raw) => parse_cart(&raw),
            None => {
                debug!("No cart in navigation payload");
                Cart::new()
            }
        }
    }

    fn save(&mut self, cart: &[CartLine]) {
        self.query = form_urlencoded::Serializer::new(String::new())
            .append_pair(CART_STORAGE_KEY, &serialize_cart(cart))
            .finish();
    }
}

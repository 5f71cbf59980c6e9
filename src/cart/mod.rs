//! Shopping Cart Domain Module
//!
//! This module contains all shopping cart business logic, including:
//! - Domain models (CartLine, SelectionState, inputs, responses)
//! - Business logic helpers (quantity validation, pricing, merging, totals)
//! - Selection state and the cart controller
//! - Cart persistence backends
//! - Application state and REST API handlers

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod selection;
pub mod session;
pub mod state;
pub mod store;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use models::{Cart, CartLine, SelectionState};
pub use selection::Selections;
pub use session::CartSession;
pub use state::{AppState, SharedState};
pub use store::{CartStore, KeyValueCartStore, QueryCartStore};

//! Cardápio Library
//!
//! Menu browsing and shopping cart for a restaurant ordering site: a
//! read-only catalog, per-item selections, a cart that survives
//! navigation, and the hand-off of that cart to the checkout page.

// Domain modules
pub mod cart;
pub mod catalog;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;

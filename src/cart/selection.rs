//! Per-item selection state
//!
//! Selections are ephemeral: they live as long as the visitor's session
//! and are never persisted with the cart.

use super::helpers::validate_quantity;
use super::models::SelectionState;
use crate::catalog::{MenuItem, SectionKey, SIZE_SIMPLE};
use std::collections::HashMap;

/// Selection state keyed by `(section, item id)`.
#[derive(Debug, Clone, Default)]
pub struct Selections {
    entries: HashMap<(SectionKey, u32), SelectionState>,
}

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection for `(section, item_id)`.
    ///
    /// The quantity is normalized. `size` and `flavor` are stored as given:
    /// callers changing only the quantity must pass the known values through.
    pub fn update(
        &mut self,
        section: SectionKey,
        item_id: u32,
        quantity: f64,
        size: Option<String>,
        flavor: Option<String>,
    ) -> &SelectionState {
        let state = SelectionState {
            quantity: validate_quantity(quantity),
            size,
            flavor,
        };
        self.entries.insert((section, item_id), state);
        &self.entries[&(section, item_id)]
    }

    /// The stored selection, if the visitor touched this item.
    pub fn get(&self, section: SectionKey, item_id: u32) -> Option<&SelectionState> {
        self.entries.get(&(section, item_id))
    }

    /// The selection as presented: the stored one, or quantity 1 with the
    /// default size and the item's first flavor.
    pub fn selection_for(&self, section: SectionKey, item: &MenuItem) -> SelectionState {
        match self.get(section, item.id) {
            Some(state) => state.clone(),
            None => SelectionState {
                quantity: 1,
                size: section.is_size_priced().then(|| SIZE_SIMPLE.to_string()),
                flavor: item.default_flavor().map(str::to_string),
            },
        }
    }

    /// The + button: one more, keeping size and flavor.
    pub fn increment(&mut self, section: SectionKey, item: &MenuItem) -> &SelectionState {
        self.step(section, item, 1.0)
    }

    /// The - button: one less, never below 1.
    pub fn decrement(&mut self, section: SectionKey, item: &MenuItem) -> &SelectionState {
        self.step(section, item, -1.0)
    }

    fn step(&mut self, section: SectionKey, item: &MenuItem, delta: f64) -> &SelectionState {
        let current = self.selection_for(section, item);
        let quantity = (current.quantity as f64 + delta).max(1.0);
        self.update(section, item.id, quantity, current.size, current.flavor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SIZE_FULL;

    fn suco() -> MenuItem {
        serde_json::from_str(
            r#"{"id": 2, "nome": "Suco Natural", "preco": 9, "sabores": ["Laranja", "Limão"]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_update_normalizes_quantity() {
        let mut selections = Selections::new();
        let state = selections.update(SectionKey::Porcoes, 1, -3.0, None, None);
        assert_eq!(state.quantity, 1);

        let state = selections.update(SectionKey::Porcoes, 1, 4.9, None, None);
        assert_eq!(state.quantity, 4);
        assert_eq!(selections.len(), 1);
    }

    #[test]
    fn test_update_forgets_unpassed_fields() {
        let mut selections = Selections::new();
        selections.update(SectionKey::Espetinhos, 1, 1.0, Some(SIZE_FULL.into()), None);
        selections.update(SectionKey::Espetinhos, 1, 2.0, None, None);

        let state = selections.get(SectionKey::Espetinhos, 1).unwrap();
        assert_eq!(state.quantity, 2);
        assert_eq!(state.size, None);
    }

    #[test]
    fn test_selection_for_defaults() {
        let selections = Selections::new();
        let state = selections.selection_for(SectionKey::Bebidas, &suco());
        assert_eq!(state.quantity, 1);
        assert_eq!(state.size, None);
        assert_eq!(state.flavor.as_deref(), Some("Laranja"));
    }

    #[test]
    fn test_increment_and_decrement_keep_choices() {
        let mut selections = Selections::new();
        let item = suco();
        let lemon = Some("Limão".to_string());
        selections.update(SectionKey::Bebidas, item.id, 1.0, None, lemon);

        selections.increment(SectionKey::Bebidas, &item);
        let state = selections.increment(SectionKey::Bebidas, &item);
        assert_eq!(state.quantity, 3);
        assert_eq!(state.flavor.as_deref(), Some("Limão"));

        for _ in 0..5 {
            selections.decrement(SectionKey::Bebidas, &item);
        }
        let state = selections.get(SectionKey::Bebidas, item.id).unwrap();
        assert_eq!(state.quantity, 1);
        assert_eq!(state.flavor.as_deref(), Some("Limão"));
    }
}

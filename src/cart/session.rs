//! Cart controller
//!
//! A `CartSession` owns one visitor's selections and cart, and writes the
//! cart through its store after every change.

use super::helpers::{
    compute_total, display_name, merge_line, remove_line, resolve_flavor, resolve_price,
    validate_quantity,
};
use super::models::{Cart, CartLine, CartView, SelectionState};
use super::selection::Selections;
use super::store::CartStore;
use crate::catalog::{MenuItem, SectionKey};
use tracing::debug;

pub struct CartSession<S> {
    selections: Selections,
    cart: Cart,
    store: S,
}

impl<S: CartStore> CartSession<S> {
    /// Opens a session with no selections, hydrating the cart from `store`.
    pub fn open(store: S) -> Self {
        Self::resume(store, Selections::new())
    }

    /// Opens a session continuing previously made selections.
    pub fn resume(store: S, selections: Selections) -> Self {
        let cart = store.load();
        Self {
            selections,
            cart,
            store,
        }
    }

    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hands back the selections so they can outlive this session value.
    pub fn into_selections(self) -> Selections {
        self.selections
    }

    pub fn update_selection(
        &mut self,
        section: SectionKey,
        item_id: u32,
        quantity: f64,
        size: Option<String>,
        flavor: Option<String>,
    ) -> &SelectionState {
        self.selections
            .update(section, item_id, quantity, size, flavor)
    }

    pub fn increment(&mut self, section: SectionKey, item: &MenuItem) -> &SelectionState {
        self.selections.increment(section, item)
    }

    pub fn decrement(&mut self, section: SectionKey, item: &MenuItem) -> &SelectionState {
        self.selections.decrement(section, item)
    }

    /// Price displayed next to `item` for its current selection.
    pub fn display_price(&self, section: SectionKey, item: &MenuItem) -> f64 {
        let selection = self.selections.selection_for(section, item);
        resolve_price(item, section, selection.size.as_deref())
    }

    /// Commits the current selection for `item` to the cart.
    ///
    /// Returns the index of the line that was created or grown.
    pub fn add_to_cart(&mut self, item: &MenuItem, section: SectionKey) -> usize {
        let selection = self
            .selections
            .get(section, item.id)
            .cloned()
            .unwrap_or_default();
        let quantity = validate_quantity(selection.quantity as f64);
        let size = selection.size.filter(|_| section.is_size_priced());
        let flavor = resolve_flavor(item, selection.flavor.as_deref());

        let line = CartLine {
            id: item.id,
            name: display_name(item, section, size.as_deref(), flavor.as_deref()),
            unit_price: resolve_price(item, section, size.as_deref()),
            quantity,
            size,
            flavor,
        };

        let index = merge_line(&mut self.cart, line);
        debug!(
            section = %section,
            item = item.id,
            quantity,
            line = index,
            "Added to cart"
        );
        self.store.save(&self.cart);
        index
    }

    /// Removes the line at `index`; out of range does nothing and writes
    /// nothing.
    pub fn remove_from_cart(&mut self, index: usize) -> Option<CartLine> {
        let Some(removed) = remove_line(&mut self.cart, index) else {
            debug!(line = index, "Ignoring removal of missing line");
            return None;
        };
        debug!(line = index, item = removed.id, "Removed from cart");
        self.store.save(&self.cart);
        Some(removed)
    }

    pub fn total(&self) -> f64 {
        compute_total(&self.cart)
    }

    pub fn view(&self) -> CartView {
        CartView {
            itens: self.cart.clone(),
            total: self.total(),
            quantidade_itens: self.cart.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::store::{KeyValueCartStore, QueryCartStore};
    use crate::catalog::{Catalog, SIZE_FULL, SIZE_SIMPLE};
    use dashmap::DashMap;
    use std::sync::Arc;

    fn catalog() -> Catalog {
        Catalog::bundled().unwrap()
    }

    /// Records how often the cart was written.
    #[derive(Default)]
    struct CountingStore {
        saves: usize,
    }

    impl CartStore for CountingStore {
        fn load(&self) -> Cart {
            Cart::new()
        }

        fn save(&mut self, _cart: &[CartLine]) {
            self.saves += 1;
        }
    }

    #[test]
    fn test_add_twice_merges_quantities() {
        let catalog = catalog();
        let burger = catalog.item(SectionKey::Hamburgueres, 2).unwrap();
        let mut session = CartSession::open(QueryCartStore::default());

        session.update_selection(SectionKey::Hamburgueres, 2, 2.0, None, None);
        session.add_to_cart(burger, SectionKey::Hamburgueres);
        session.update_selection(SectionKey::Hamburgueres, 2, 3.0, None, None);
        session.add_to_cart(burger, SectionKey::Hamburgueres);

        assert_eq!(session.cart().len(), 1);
        assert_eq!(session.cart()[0].quantity, 5);
        assert_eq!(session.cart()[0].name, "X-Bacon");
        assert_eq!(session.total(), 22.5 * 5.0);
    }

    #[test]
    fn test_different_sizes_make_different_lines() {
        let catalog = catalog();
        let espeto = catalog.item(SectionKey::Espetinhos, 1).unwrap();
        let mut session = CartSession::open(QueryCartStore::default());

        let simple = Some(SIZE_SIMPLE.to_string());
        session.update_selection(SectionKey::Espetinhos, 1, 1.0, simple, None);
        session.add_to_cart(espeto, SectionKey::Espetinhos);
        let full = Some(SIZE_FULL.to_string());
        session.update_selection(SectionKey::Espetinhos, 1, 1.0, full, None);
        session.add_to_cart(espeto, SectionKey::Espetinhos);

        let cart = session.cart();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart[0].unit_price, 10.0);
        assert_eq!(cart[0].name, "Espetinho de Carne - Simples");
        assert_eq!(cart[1].unit_price, 15.0);
        assert_eq!(
            cart[1].name,
            "Espetinho de Carne - Acompanhamento (completo)"
        );
    }

    #[test]
    fn test_untouched_espetinho_is_priced_at_higher_tier() {
        let catalog = catalog();
        let espeto = catalog.item(SectionKey::Espetinhos, 1).unwrap();
        let mut session = CartSession::open(QueryCartStore::default());

        session.add_to_cart(espeto, SectionKey::Espetinhos);

        let line = &session.cart()[0];
        assert_eq!(line.quantity, 1);
        assert_eq!(line.size, None);
        assert_eq!(line.unit_price, 15.0);
        // The render default shows the lower tier until something is chosen.
        assert_eq!(session.display_price(SectionKey::Espetinhos, espeto), 10.0);
    }

    #[test]
    fn test_drink_flavor_falls_back_to_first_option() {
        let catalog = catalog();
        let refri = catalog.item(SectionKey::Bebidas, 1).unwrap();
        let mut session = CartSession::open(QueryCartStore::default());

        session.add_to_cart(refri, SectionKey::Bebidas);
        let coca = Some("Coca-Cola".to_string());
        session.update_selection(SectionKey::Bebidas, 1, 1.0, None, coca);
        session.add_to_cart(refri, SectionKey::Bebidas);
        let sprite = Some("Sprite".to_string());
        session.update_selection(SectionKey::Bebidas, 1, 1.0, None, sprite);
        session.add_to_cart(refri, SectionKey::Bebidas);

        let cart = session.cart();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart[0].name, "Refrigerante Lata - Coca-Cola");
        assert_eq!(cart[0].quantity, 2);
        assert_eq!(cart[1].flavor.as_deref(), Some("Sprite"));
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let catalog = catalog();
        let entries = Arc::new(DashMap::new());
        let mut session = CartSession::open(KeyValueCartStore::new(entries.clone(), "v1"));

        for id in 1..=3 {
            let item = catalog.item(SectionKey::Porcoes, id).unwrap();
            session.add_to_cart(item, SectionKey::Porcoes);
        }
        session.remove_from_cart(1);

        let reopened = CartSession::open(KeyValueCartStore::new(entries, "v1"));
        let ids: Vec<u32> = reopened.cart().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(reopened.total(), 45.0);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let catalog = catalog();
        let pudim = catalog.item(SectionKey::Sobremesas, 1).unwrap();
        let mut session = CartSession::open(QueryCartStore::default());
        session.add_to_cart(pudim, SectionKey::Sobremesas);

        assert!(session.remove_from_cart(5).is_none());
        assert_eq!(session.cart().len(), 1);
    }

    #[test]
    fn test_remove_missing_line_writes_nothing() {
        let catalog = catalog();
        let pudim = catalog.item(SectionKey::Sobremesas, 1).unwrap();
        let mut session = CartSession::open(CountingStore::default());

        session.remove_from_cart(0);
        assert_eq!(session.store().saves, 0);

        session.add_to_cart(pudim, SectionKey::Sobremesas);
        session.remove_from_cart(3);
        assert_eq!(session.store().saves, 1);

        session.remove_from_cart(0);
        assert_eq!(session.store().saves, 2);
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_emptied_cart_leaves_no_storage_entry() {
        let catalog = catalog();
        let pudim = catalog.item(SectionKey::Sobremesas, 1).unwrap();
        let entries = Arc::new(DashMap::new());
        let mut session = CartSession::open(KeyValueCartStore::new(entries.clone(), "v2"));

        session.remove_from_cart(0);
        assert!(entries.is_empty());

        session.add_to_cart(pudim, SectionKey::Sobremesas);
        assert_eq!(entries.len(), 1);
        session.remove_from_cart(0);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_corrupt_store_opens_empty() {
        let session = CartSession::open(QueryCartStore::from_query("carrinho=%7B%7B%7B"));
        assert!(session.cart().is_empty());
        assert_eq!(session.total(), 0.0);
    }
}

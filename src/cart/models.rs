//! Shopping Cart Domain Models
//!
//! This module contains all data structures related to the shopping cart
//! business domain. Wire names are the ones the checkout page reads
//! (`nome`, `preco`, `quantidade`, `tamanho`, `sabor`).

use super::helpers::{price_from_value, quantity_from_value};
use crate::catalog::SectionKey;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// Cart Domain Models
// =============================================================================

/// Returns the default quantity (1) for cart lines
fn default_quantity() -> u32 {
    1
}

fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(price_from_value(&value))
}

fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(quantity_from_value(&value))
}

/// One aggregated entry in the cart, keyed by `(id, size, flavor)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Catalog id of the item
    pub id: u32,

    /// Item name, annotated with the chosen size or flavor
    #[serde(rename = "nome", default)]
    pub name: String,

    /// Unit price resolved when the line was added
    #[serde(rename = "preco", default, deserialize_with = "lenient_price")]
    pub unit_price: f64,

    #[serde(
        rename = "quantidade",
        default = "default_quantity",
        deserialize_with = "lenient_quantity"
    )]
    pub quantity: u32,

    #[serde(rename = "tamanho", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(rename = "sabor", default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
}

impl CartLine {
    /// Whether `self` is the line an addition of `(id, size, flavor)` merges into.
    pub fn matches(&self, id: u32, size: Option<&str>, flavor: Option<&str>) -> bool {
        self.id == id && self.size.as_deref() == size && self.flavor.as_deref() == flavor
    }
}

/// Ordered sequence of cart lines
pub type Cart = Vec<CartLine>;

/// The visitor's not yet committed choice for one displayed item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionState {
    /// Always at least 1
    #[serde(rename = "quantidade")]
    pub quantity: u32,

    #[serde(rename = "tamanho", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(rename = "sabor", default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            quantity: default_quantity(),
            size: None,
            flavor: None,
        }
    }
}

// =============================================================================
// HTTP Inputs
// =============================================================================

/// Input for updating a selection
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionInput {
    pub section: SectionKey,

    pub item_id: u32,

    /// Raw quantity as typed; anything invalid is normalized
    #[serde(rename = "quantidade", default)]
    pub quantity: Value,

    #[serde(rename = "tamanho", default)]
    pub size: Option<String>,

    #[serde(rename = "sabor", default)]
    pub flavor: Option<String>,
}

/// Addresses one catalog item (add to cart, +/- buttons)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRef {
    pub section: SectionKey,
    pub item_id: u32,
}

// =============================================================================
// HTTP Responses
// =============================================================================

/// Cart contents with the running total, as shown on the cart button
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub itens: Vec<CartLine>,
    pub total: f64,
    pub quantidade_itens: usize,
}

/// Hand-off link to the checkout page
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub href: String,
    pub itens: Vec<CartLine>,
    pub total: f64,
}

/// One catalog item as presented, with its current selection
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    #[serde(flatten)]
    pub item: crate::catalog::MenuItem,

    /// Price for the current selection
    pub preco_exibido: f64,

    pub selecao: SelectionState,

    /// Size choices, only for size-priced sections
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tamanhos: Vec<String>,

    /// Flavor choices, only for flavored sections
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub escolhas: Vec<String>,
}

/// A catalog section as presented
#[derive(Debug, Serialize)]
pub struct SectionView {
    pub secao: SectionKey,
    pub titulo: &'static str,
    pub itens: Vec<MenuEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> CartLine {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_cart_line_lenient_fields() {
        let line = parse(r#"{"id": 3, "preco": "abc", "quantidade": 2.9}"#);
        assert_eq!(line.unit_price, 0.0);
        assert_eq!(line.quantity, 2);

        let line = parse(r#"{"id": 3, "quantidade": -4}"#);
        assert_eq!(line.unit_price, 0.0);
        assert_eq!(line.quantity, 1);

        let line = parse(r#"{"id": 3, "preco": "12.5"}"#);
        assert_eq!(line.unit_price, 12.5);
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_cart_line_wire_shape() {
        let line = CartLine {
            id: 2,
            name: "Suco Natural - Laranja".into(),
            unit_price: 9.0,
            quantity: 2,
            size: None,
            flavor: Some("Laranja".into()),
        };
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["nome"], "Suco Natural - Laranja");
        assert_eq!(value["preco"], 9.0);
        assert_eq!(value["quantidade"], 2);
        assert_eq!(value["sabor"], "Laranja");
        assert!(value.get("tamanho").is_none());
    }
}

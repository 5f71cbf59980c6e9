//! Shopping Cart Business Logic Helpers
//!
//! Quantity normalization, price resolution, line merging and totals.
//! None of these fail: invalid input degrades to a safe default.

use super::models::CartLine;
use crate::catalog::{MenuItem, SectionKey, SIZE_SIMPLE};
use serde_json::Value;

/// Coerces any quantity input to a positive integer.
///
/// NaN, zero and negatives become 1; fractions are floored.
pub fn validate_quantity(quantity: f64) -> u32 {
    if quantity.is_nan() || quantity < 1.0 {
        return 1;
    }
    // Float to int casts saturate, so huge inputs clamp to u32::MAX.
    quantity.floor() as u32
}

/// Reads a raw quantity out of arbitrary JSON. Non-numeric input yields NaN.
pub fn quantity_input(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Quantity of a stored line or an input field, always at least 1.
pub fn quantity_from_value(value: &Value) -> u32 {
    validate_quantity(quantity_input(value))
}

/// Price of a stored line; anything non-numeric counts as 0.
pub fn price_from_value(value: &Value) -> f64 {
    let price = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if price.is_finite() {
        price
    } else {
        0.0
    }
}

/// Unit price of `item` in `section` for the chosen size.
///
/// For size-priced items only the exact `"Simples"` label selects the lower
/// tier; any other value, including none, selects the accompaniment price.
pub fn resolve_price(item: &MenuItem, section: SectionKey, size: Option<&str>) -> f64 {
    match item.size_prices {
        Some(prices) if section.is_size_priced() => {
            if size == Some(SIZE_SIMPLE) {
                prices.simple
            } else {
                prices.full
            }
        }
        _ => item.price.unwrap_or(0.0),
    }
}

/// The flavor a line is recorded with: the chosen one, else the item's
/// first option, else its first flavor.
pub fn resolve_flavor(item: &MenuItem, chosen: Option<&str>) -> Option<String> {
    chosen
        .filter(|f| !f.is_empty())
        .or_else(|| item.default_flavor())
        .map(str::to_string)
}

/// Name shown on a cart line.
pub fn display_name(
    item: &MenuItem,
    section: SectionKey,
    size: Option<&str>,
    flavor: Option<&str>,
) -> String {
    if section.is_flavored() {
        match flavor {
            Some(flavor) => format!("{} - {}", item.name, flavor),
            None => item.name.clone(),
        }
    } else if section.is_size_priced() {
        format!("{} - {}", item.name, size.unwrap_or(SIZE_SIMPLE))
    } else {
        item.name.clone()
    }
}

/// Merges `incoming` into `cart`, returning the index of the affected line.
///
/// A line with the same `(id, size, flavor)` has its quantity increased;
/// otherwise `incoming` is appended.
pub fn merge_line(cart: &mut Vec<CartLine>, incoming: CartLine) -> usize {
    let existing = cart.iter().position(|line| {
        line.matches(
            incoming.id,
            incoming.size.as_deref(),
            incoming.flavor.as_deref(),
        )
    });

    match existing {
        Some(index) => {
            let line = &mut cart[index];
            line.quantity = validate_quantity(line.quantity as f64)
                .saturating_add(validate_quantity(incoming.quantity as f64));
            index
        }
        None => {
            cart.push(incoming);
            cart.len() - 1
        }
    }
}

/// Removes the line at `index`. Out of range is a no-op.
pub fn remove_line(cart: &mut Vec<CartLine>, index: usize) -> Option<CartLine> {
    (index < cart.len()).then(|| cart.remove(index))
}

/// Sum of `unit_price * quantity` over all lines.
pub fn compute_total(cart: &[CartLine]) -> f64 {
    cart.iter()
        .map(|line| {
            let price = if line.unit_price.is_finite() {
                line.unit_price
            } else {
                0.0
            };
            price * validate_quantity(line.quantity as f64) as f64
        })
        .sum()
}

/// Produces a human-readable one-line summary for a list of cart lines.
///
/// Example output: `"2x X-Bacon, 1x Suco Natural - Laranja"`.
pub fn format_item_summary(items: &[CartLine]) -> String {
    items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.name))
        .collect::<Vec<_>>()
        .join(", ")
}

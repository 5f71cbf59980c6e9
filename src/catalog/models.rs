//! Catalog Domain Models
//!
//! Menu items are read-only records supplied as JSON documents. The field
//! names on the wire are the ones the catalog files use (`nome`, `preco`,
//! `precos`, ...).

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

// =============================================================================
// Size Labels
// =============================================================================

/// Size label selecting the lower price tier
pub const SIZE_SIMPLE: &str = "Simples";
/// Size label for the full plate with sides
pub const SIZE_FULL: &str = "Acompanhamento (completo)";
/// Size choices offered for size-priced items, in display order
pub const SIZE_LABELS: [&str; 2] = [SIZE_SIMPLE, SIZE_FULL];

// =============================================================================
// Sections
// =============================================================================

/// A named grouping of catalog items sharing the same optional-field semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    Espetinhos,
    Bebidas,
    Hamburgueres,
    PratosDoDia,
    Porcoes,
    Sobremesas,
}

impl SectionKey {
    /// All sections in the order the menu presents them.
    pub const ALL: [SectionKey; 6] = [
        SectionKey::Hamburgueres,
        SectionKey::Espetinhos,
        SectionKey::PratosDoDia,
        SectionKey::Porcoes,
        SectionKey::Bebidas,
        SectionKey::Sobremesas,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Espetinhos => "espetinhos",
            SectionKey::Bebidas => "bebidas",
            SectionKey::Hamburgueres => "hamburgueres",
            SectionKey::PratosDoDia => "pratosDoDia",
            SectionKey::Porcoes => "porcoes",
            SectionKey::Sobremesas => "sobremesas",
        }
    }

    /// Heading shown above the section.
    pub fn title(self) -> &'static str {
        match self {
            SectionKey::Espetinhos => "Nossos Espetinhos",
            SectionKey::Bebidas => "Nossas Bebidas",
            SectionKey::Hamburgueres => "Hamburgueres",
            SectionKey::PratosDoDia => "Pratos do Dia",
            SectionKey::Porcoes => "Porções",
            SectionKey::Sobremesas => "Sobremesas",
        }
    }

    /// Items in this section are priced by size.
    pub fn is_size_priced(self) -> bool {
        self == SectionKey::Espetinhos
    }

    /// Items in this section offer a flavor choice.
    pub fn is_flavored(self) -> bool {
        self == SectionKey::Bebidas
    }

    /// Maps a collection name used inside the catalog documents.
    pub fn from_collection(name: &str) -> Option<Self> {
        match name {
            "espetos" => Some(SectionKey::Espetinhos),
            "bebidas" => Some(SectionKey::Bebidas),
            "burguers" => Some(SectionKey::Hamburgueres),
            "pratos_do_dia" => Some(SectionKey::PratosDoDia),
            "porcoes" => Some(SectionKey::Porcoes),
            "sobremesas" => Some(SectionKey::Sobremesas),
            _ => None,
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKey::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownSection(s.to_string()))
    }
}

// =============================================================================
// Menu Items
// =============================================================================

/// Two-tier pricing used by size-priced items
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizePrices {
    #[serde(rename = "Simples")]
    pub simple: f64,

    #[serde(rename = "Acompanhamento")]
    pub full: f64,
}

/// A single entry of the menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique within its section
    pub id: u32,

    #[serde(rename = "nome")]
    pub name: String,

    /// Flat price
    #[serde(rename = "preco", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// Size-dependent price
    #[serde(rename = "precos", default, skip_serializing_if = "Option::is_none")]
    pub size_prices: Option<SizePrices>,

    #[serde(rename = "imagem", default)]
    pub image: String,

    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "ingredientes", default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,

    #[serde(rename = "opcoes", default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    #[serde(rename = "sabores", default, skip_serializing_if = "Option::is_none")]
    pub flavors: Option<Vec<String>>,
}

impl MenuItem {
    /// The list a flavor is picked from: declared options, else declared flavors.
    pub fn flavor_choices(&self) -> &[String] {
        self.options
            .as_deref()
            .or(self.flavors.as_deref())
            .unwrap_or_default()
    }

    /// First declared option, else first declared flavor.
    pub fn default_flavor(&self) -> Option<&str> {
        fn first(list: &Option<Vec<String>>) -> Option<&str> {
            list.as_deref()
                .and_then(|l| l.first())
                .map(String::as_str)
                .filter(|s| !s.is_empty())
        }
        first(&self.options).or_else(|| first(&self.flavors))
    }
}

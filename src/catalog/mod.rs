//! Catalog Domain Module
//!
//! This module provides the read-only menu:
//! - Domain models (MenuItem, SectionKey, size labels)
//! - The catalog provider and its JSON loading

pub mod models;

pub use models::{MenuItem, SectionKey, SizePrices, SIZE_FULL, SIZE_LABELS, SIZE_SIMPLE};

use crate::error::CatalogError;
use std::{collections::HashMap, path::Path};
use tracing::{info, warn};

/// Catalog documents, by file name.
pub const CATALOG_FILES: [&str; 4] = [
    "hamburguer.json",
    "espetinhos.json",
    "pratos.json",
    "bebidas.json",
];

const BUNDLED: [(&str, &str); 4] = [
    ("hamburguer.json", include_str!("../../data/hamburguer.json")),
    ("espetinhos.json", include_str!("../../data/espetinhos.json")),
    ("pratos.json", include_str!("../../data/pratos.json")),
    ("bebidas.json", include_str!("../../data/bebidas.json")),
];

/// Fixed, read-only collection of menu sections.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sections: HashMap<SectionKey, Vec<MenuItem>>,
}

impl Catalog {
    /// Loads the catalog from `dir`, or the bundled documents when `None`.
    pub fn load(dir: Option<&Path>) -> Result<Self, CatalogError> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::bundled(),
        }
    }

    /// The catalog compiled into the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        let mut catalog = Catalog::default();
        for (name, raw) in BUNDLED {
            catalog.ingest(name, raw)?;
        }
        info!("Loaded bundled catalog ({} items)", catalog.len());
        Ok(catalog)
    }

    /// Reads every catalog document from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::default();
        for name in CATALOG_FILES {
            let path = dir.join(name);
            let raw = std::fs::read_to_string(&path)
                .map_err(|source| CatalogError::Read { path, source })?;
            catalog.ingest(name, &raw)?;
        }
        info!("Loaded catalog from {:?} ({} items)", dir, catalog.len());
        Ok(catalog)
    }

    /// Parses one document (`{"collection": [items...]}`) into its sections.
    pub fn ingest(&mut self, name: &str, raw: &str) -> Result<(), CatalogError> {
        let parsed = serde_json::from_str::<HashMap<String, Vec<MenuItem>>>(raw);
        let document = parsed.map_err(|source| CatalogError::Parse {
            name: name.to_string(),
            source,
        })?;

        for (collection, items) in document {
            match SectionKey::from_collection(&collection) {
                Some(section) => self.sections.entry(section).or_default().extend(items),
                None => warn!("Skipping unknown collection {collection:?} in {name}"),
            }
        }
        Ok(())
    }

    /// Items of `section`, in catalog order.
    pub fn items(&self, section: SectionKey) -> &[MenuItem] {
        self.sections
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn item(&self, section: SectionKey, id: u32) -> Option<&MenuItem> {
        self.items(section).iter().find(|item| item.id == id)
    }

    /// Sections in menu order, with their items.
    pub fn sections(&self) -> impl Iterator<Item = (SectionKey, &[MenuItem])> {
        SectionKey::ALL
            .into_iter()
            .map(move |section| (section, self.items(section)))
    }

    /// Total number of items across all sections.
    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bundled_catalog_fills_every_section() {
        let catalog = Catalog::bundled().unwrap();
        for (section, items) in catalog.sections() {
            assert!(!items.is_empty(), "{section} should not be empty");

            let ids: HashSet<u32> = items.iter().map(|i| i.id).collect();
            assert_eq!(ids.len(), items.len(), "ids must be unique in {section}");
        }
    }

    #[test]
    fn test_espetinhos_carry_size_prices() {
        let catalog = Catalog::bundled().unwrap();
        assert!(catalog
            .items(SectionKey::Espetinhos)
            .iter()
            .all(|item| item.size_prices.is_some()));
        assert!(catalog.item(SectionKey::Bebidas, 1).is_some());
        assert!(catalog.item(SectionKey::Bebidas, 999).is_none());
    }

    #[test]
    fn test_ingest_reports_malformed_document() {
        let mut catalog = Catalog::default();
        let err = catalog.ingest("bebidas.json", "{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { ref name, .. } if name == "bebidas.json"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_ingest_skips_unknown_collections() {
        let mut catalog = Catalog::default();
        let document = r#"{
            "pizzas": [{"id": 1, "nome": "Calabresa", "preco": 40}],
            "porcoes": [{"id": 7, "nome": "Polenta", "preco": 15}]
        }"#;
        catalog.ingest("extra.json", document).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.items(SectionKey::Porcoes)[0].name, "Polenta");
    }

    #[test]
    fn test_from_dir_missing_file() {
        let err = Catalog::from_dir(Path::new("/nonexistent/catalog")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}

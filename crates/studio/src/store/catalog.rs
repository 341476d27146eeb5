//! Read-only item catalog.
//!
//! The built-in seed ships with the binary; `CATALOG_PATH` swaps in a JSON
//! file of the same shape.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use lookbook_core::{CurrencyCode, Item, ItemId};
use thiserror::Error;

const SEED: &str = include_str!("../../data/catalog.json");

/// Errors loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate item id {0} in catalog")]
    DuplicateId(ItemId),

    #[error("item id {0} leaves no room for vendor product ids")]
    IdOutOfRange(ItemId),

    #[error("item {id} is priced in {found:?}, catalog uses {expected:?}")]
    MixedCurrency {
        id: ItemId,
        expected: CurrencyCode,
        found: CurrencyCode,
    },
}

/// Catalog items in display order.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
    next_id: ItemId,
    currency: CurrencyCode,
}

impl Catalog {
    /// The built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded seed is malformed.
    pub fn seed() -> Result<Self, CatalogError> {
        Self::from_json(SEED)
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse a JSON array of items.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on invalid JSON, repeated IDs, mixed
    /// currencies or an ID at `i32::MAX`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<Item> = serde_json::from_str(json)?;
        let mut seen = HashSet::with_capacity(items.len());
        if let Some(dup) = items.iter().find(|item| !seen.insert(item.id)) {
            return Err(CatalogError::DuplicateId(dup.id));
        }

        let currency = items
            .first()
            .map_or_else(CurrencyCode::default, |item| item.price.currency_code);
        if let Some(item) = items.iter().find(|item| item.price.currency_code != currency) {
            return Err(CatalogError::MixedCurrency {
                id: item.id,
                expected: currency,
                found: item.price.currency_code,
            });
        }

        let max_id = items.iter().map(|item| item.id).max().unwrap_or(ItemId::new(0));
        let next_id = max_id
            .as_i32()
            .checked_add(1)
            .map(ItemId::new)
            .ok_or(CatalogError::IdOutOfRange(max_id))?;
        Ok(Self {
            items,
            next_id,
            currency,
        })
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items whose category matches, ignoring case.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items
            .iter()
            .filter(move |item| item.category.eq_ignore_ascii_case(category))
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// First ID above every catalog item, used to keep vendor product IDs
    /// disjoint.
    #[must_use]
    pub const fn next_id(&self) -> ItemId {
        self.next_id
    }

    /// Currency every price in the store is quoted in.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookbook_core::Price;

    #[test]
    fn test_seed_contains_gala_dress() {
        let catalog = Catalog::seed().expect("seed");
        let dress = catalog.get(ItemId::new(1)).expect("dress");
        assert_eq!(dress.name, "Vestido de Gala LV");
        assert_eq!(dress.price, Price::whole(15000));
        assert!(dress.try_on);
    }

    #[test]
    fn test_in_category_ignores_case() {
        let catalog = Catalog::seed().expect("seed");
        let makeup: Vec<_> = catalog.in_category("MAKEUP").collect();
        assert_eq!(makeup.len(), 2);
    }

    #[test]
    fn test_categories_are_distinct() {
        let catalog = Catalog::seed().expect("seed");
        let categories = catalog.categories();
        assert_eq!(categories[0], "dresses");
        let unique: HashSet<_> = categories.iter().collect();
        assert_eq!(unique.len(), categories.len());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id":1,"name":"A","price":{"amount":"1"},"image_url":"u","category":"c"},
            {"id":1,"name":"B","price":{"amount":"2"},"image_url":"u","category":"c"}
        ]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateId(id)) if id == ItemId::new(1)
        ));
    }

    #[test]
    fn test_id_at_i32_max_rejected() {
        let json = format!(
            r#"[{{"id":{},"name":"A","price":{{"amount":"1"}},"image_url":"u","category":"c"}}]"#,
            i32::MAX
        );
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::IdOutOfRange(id)) if id == ItemId::new(i32::MAX)
        ));
    }

    #[test]
    fn test_mixed_currencies_rejected() {
        let json = r#"[
            {"id":1,"name":"A","price":{"amount":"1","currency_code":"BRL"},"image_url":"u","category":"c"},
            {"id":2,"name":"B","price":{"amount":"2","currency_code":"USD"},"image_url":"u","category":"c"}
        ]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::MixedCurrency { id, found: CurrencyCode::USD, .. }) if id == ItemId::new(2)
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::from_path(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn test_next_id() {
        let catalog = Catalog::seed().expect("seed");
        assert_eq!(catalog.next_id(), ItemId::new(15));
        assert_eq!(Catalog::from_json("[]").expect("empty").next_id(), ItemId::new(1));
    }
}

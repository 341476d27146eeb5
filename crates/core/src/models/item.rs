//! Catalog items and vendor products.

use serde::{Deserialize, Serialize};

use crate::types::{FolderId, ItemId, Price, ProfileId};

const fn default_try_on() -> bool {
    true
}

/// A catalog entry that can be bought and, usually, tried on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    /// Remote image URL of the item on a neutral background.
    pub image_url: String,
    /// Free-form category slug, e.g. `dresses` or `makeup`.
    pub category: String,
    #[serde(default = "default_try_on")]
    pub try_on: bool,
}

/// A vendor-created catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub item: Item,
    pub owner_id: ProfileId,
    /// `None` places the product in the uncategorised bucket.
    #[serde(default)]
    pub folder_id: Option<FolderId>,
}

impl Product {
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.item.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_on_defaults_to_true() {
        let json = r#"{
            "id": 1,
            "name": "Vestido de Gala LV",
            "price": {"amount": "15000"},
            "image_url": "https://cdn.example.com/vestido.jpg",
            "category": "dresses"
        }"#;
        let item: Item = serde_json::from_str(json).expect("deserialize");
        assert!(item.try_on);
        assert_eq!(item.price, Price::whole(15000));
    }

    #[test]
    fn test_product_flattens_item() {
        let product = Product {
            item: Item {
                id: ItemId::new(3),
                name: "Bolsa".to_string(),
                price: Price::whole(900),
                image_url: "https://cdn.example.com/bolsa.jpg".to_string(),
                category: "bags".to_string(),
                try_on: true,
            },
            owner_id: ProfileId::random(),
            folder_id: None,
        };
        let value = serde_json::to_value(&product).expect("serialize");
        assert_eq!(value["name"], "Bolsa");
        assert!(value["folder_id"].is_null());
    }
}

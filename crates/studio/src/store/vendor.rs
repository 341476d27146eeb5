//! Vendor storefront: folders and products.
//!
//! Every operation is scoped to the acting vendor's `ProfileId`; a vendor
//! can only see and change their own folders and products.

use lookbook_core::{CurrencyCode, Folder, FolderId, Item, ItemId, Price, Product, ProfileId};
use serde::Deserialize;

use super::StoreError;

/// New folder request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFolder {
    pub name: String,
    #[serde(default)]
    pub cover_image: Option<String>,
}

/// New product request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub image_url: String,
    pub category: String,
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    #[serde(default = "default_try_on")]
    pub try_on: bool,
}

const fn default_try_on() -> bool {
    true
}

/// All vendors' folders and products.
#[derive(Debug, Clone)]
pub struct Storefront {
    folders: Vec<Folder>,
    products: Vec<Product>,
    next_folder_id: i32,
    next_item_id: i32,
    currency: CurrencyCode,
}

impl Storefront {
    /// Product IDs start at `first_free_item_id` so they never clash with
    /// catalog IDs. Products must be priced in `currency`.
    #[must_use]
    pub const fn new(first_free_item_id: ItemId, currency: CurrencyCode) -> Self {
        Self {
            folders: Vec::new(),
            products: Vec::new(),
            next_folder_id: 1,
            next_item_id: first_free_item_id.as_i32(),
            currency,
        }
    }

    pub fn folders_of(&self, owner: ProfileId) -> impl Iterator<Item = &Folder> {
        self.folders.iter().filter(move |f| f.owner_id == owner)
    }

    pub fn products_of(&self, owner: ProfileId) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.owner_id == owner)
    }

    /// Products of `owner` in `folder`; `None` is the uncategorised bucket.
    pub fn products_in(
        &self,
        owner: ProfileId,
        folder: Option<FolderId>,
    ) -> impl Iterator<Item = &Product> {
        self.products_of(owner)
            .filter(move |p| p.folder_id == folder)
    }

    /// Every product, across vendors.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn product(&self, id: ItemId) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == id)
    }

    /// # Errors
    ///
    /// Returns `StoreError::Invalid` for a blank name.
    pub fn create_folder(
        &mut self,
        owner: ProfileId,
        request: NewFolder,
    ) -> Result<&Folder, StoreError> {
        let name = non_blank("folder name", &request.name)?;
        let folder = Folder {
            id: FolderId::new(self.next_folder_id),
            owner_id: owner,
            name,
            cover_image: request.cover_image,
        };
        self.next_folder_id += 1;
        self.folders.push(folder);
        Ok(&self.folders[self.folders.len() - 1])
    }

    /// Delete a folder; its products move to the uncategorised bucket.
    ///
    /// Returns how many products were moved.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if `owner` has no such folder.
    pub fn delete_folder(&mut self, owner: ProfileId, id: FolderId) -> Result<usize, StoreError> {
        let index = self
            .folders
            .iter()
            .position(|f| f.id == id && f.owner_id == owner)
            .ok_or_else(|| not_found("folder", id))?;
        self.folders.remove(index);

        let mut moved = 0;
        for product in self
            .products
            .iter_mut()
            .filter(|p| p.owner_id == owner && p.folder_id == Some(id))
        {
            product.folder_id = None;
            moved += 1;
        }
        Ok(moved)
    }

    /// # Errors
    ///
    /// Returns `StoreError::Invalid` for blank fields, a negative price or a
    /// currency other than the store's, and `StoreError::NotFound` if the
    /// target folder is not `owner`'s.
    pub fn create_product(
        &mut self,
        owner: ProfileId,
        request: NewProduct,
    ) -> Result<&Product, StoreError> {
        let name = non_blank("product name", &request.name)?;
        let image_url = non_blank("image_url", &request.image_url)?;
        let category = non_blank("category", &request.category)?;
        if request.price.amount.is_sign_negative() {
            return Err(StoreError::Invalid("price must not be negative".to_string()));
        }
        if request.price.currency_code != self.currency {
            return Err(StoreError::Invalid(format!(
                "price must be in {:?}",
                self.currency
            )));
        }
        if let Some(folder_id) = request.folder_id {
            if !self.folders_of(owner).any(|f| f.id == folder_id) {
                return Err(not_found("folder", folder_id));
            }
        }

        let id = ItemId::new(self.next_item_id);
        let next_item_id = self
            .next_item_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Invalid("product id space exhausted".to_string()))?;

        let product = Product {
            item: Item {
                id,
                name,
                price: request.price,
                image_url,
                category,
                try_on: request.try_on,
            },
            owner_id: owner,
            folder_id: request.folder_id,
        };
        self.next_item_id = next_item_id;
        self.products.push(product);
        Ok(&self.products[self.products.len() - 1])
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if `owner` has no such product.
    pub fn delete_product(&mut self, owner: ProfileId, id: ItemId) -> Result<Product, StoreError> {
        let index = self
            .products
            .iter()
            .position(|p| p.id() == id && p.owner_id == owner)
            .ok_or_else(|| not_found("product", id))?;
        Ok(self.products.remove(index))
    }
}

fn non_blank(field: &str, value: &str) -> Result<String, StoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::Invalid(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn not_found(entity: &'static str, id: impl ToString) -> StoreError {
    StoreError::NotFound {
        entity,
        id: id.to_string(),
    }
}

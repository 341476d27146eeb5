//! Shopping cart.

use lookbook_core::{CurrencyCode, Item, Price, PriceError};
use serde::Serialize;

use super::StoreError;

/// Ordered list of items; the same item may appear more than once.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<Item>,
}

/// Serializable cart snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<Item>,
    pub total: Price,
}

impl Cart {
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items.extend(items);
    }

    /// Remove the item at `index`, keeping the others in order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::IndexOutOfRange` if `index` is past the end.
    pub fn remove_at(&mut self, index: usize) -> Result<Item, StoreError> {
        if index >= self.items.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Exact sum of all prices.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if the cart mixes currencies.
    pub fn total(&self) -> Result<Price, PriceError> {
        let currency = self
            .items
            .first()
            .map_or_else(CurrencyCode::default, |item| item.price.currency_code);
        Price::sum(currency, self.items.iter().map(|item| item.price))
    }

    /// # Errors
    ///
    /// Returns `PriceError` if the total cannot be computed.
    pub fn view(&self) -> Result<CartView, PriceError> {
        Ok(CartView {
            items: self.items.clone(),
            total: self.total()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookbook_core::ItemId;

    fn item(id: i32, price: i64) -> Item {
        Item {
            id: ItemId::new(id),
            name: format!("Item {id}"),
            price: Price::whole(price),
            image_url: format!("https://img.example/{id}.jpg"),
            category: "tops".to_string(),
            try_on: true,
        }
    }

    #[test]
    fn test_total_is_exact_sum() {
        let mut cart = Cart::default();
        cart.add(item(1, 100));
        cart.add(item(2, 250));
        assert_eq!(cart.total().expect("total"), Price::whole(350));
    }

    #[test]
    fn test_empty_total_is_zero() {
        assert_eq!(
            Cart::default().total().expect("total"),
            Price::zero(CurrencyCode::BRL)
        );
    }

    #[test]
    fn test_remove_at_keeps_order() {
        let mut cart = Cart::default();
        for id in 1..=4 {
            cart.add(item(id, 10));
        }
        let removed = cart.remove_at(1).expect("remove");
        assert_eq!(removed.id, ItemId::new(2));
        let ids: Vec<i32> = cart.items().iter().map(|i| i.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_duplicates_allowed_and_removed_individually() {
        let mut cart = Cart::default();
        cart.add(item(7, 10));
        cart.add(item(7, 10));
        cart.remove_at(0).expect("remove");
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut cart = Cart::default();
        cart.add(item(1, 10));
        assert!(matches!(
            cart.remove_at(1),
            Err(StoreError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert_eq!(cart.len(), 1);
    }
}

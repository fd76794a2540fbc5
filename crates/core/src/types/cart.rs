//! Session cart contents.

use serde::{Deserialize, Serialize};

use super::ProductId;

/// An ordered list of product ids held in the shopper's session.
///
/// Each entry is one unit; adding the same product twice means a quantity of
/// two. Ids are not validated here, so a cart may reference products that
/// were deleted from the catalog after they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<ProductId>);

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append one unit of a product.
    pub fn add(&mut self, id: ProductId) {
        self.0.push(id);
    }

    /// Remove the first occurrence of a product.
    ///
    /// Returns `false` if the product was not in the cart.
    pub fn remove(&mut self, id: ProductId) -> bool {
        match self.0.iter().position(|p| *p == id) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ProductId] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.0.iter()
    }

    /// Distinct product ids in the cart, for catalog lookups.
    #[must_use]
    pub fn distinct_ids(&self) -> Vec<ProductId> {
        let mut ids = self.0.clone();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

impl From<Vec<ProductId>> for Cart {
    fn from(ids: Vec<ProductId>) -> Self {
        Self(ids)
    }
}

impl FromIterator<ProductId> for Cart {
    fn from_iter<T: IntoIterator<Item = ProductId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

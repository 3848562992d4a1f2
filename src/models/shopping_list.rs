// Shopping list model: the products a shopper selected for one trip

use crate::models::{Cell, FloorPlan, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Represents a customer's selection of products in one store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    /// Selected product identifiers
    pub items: BTreeSet<ProductId>,
}

impl ShoppingList {
    /// Creates a new empty shopping list
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product to the list
    pub fn add_item<S: Into<ProductId>>(&mut self, product_id: S) {
        self.items.insert(product_id.into());
    }

    /// Removes a product from the list
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.remove(product_id);
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.items.contains(product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Gets the total number of unique products in the list
    pub fn unique_product_count(&self) -> usize {
        self.items.len()
    }

    /// Selected products stocked on this shelf, in list order
    pub fn matching_products(&self, cell: &Cell) -> Vec<ProductId> {
        if !cell.is_product() {
            return Vec::new();
        }
        self.items
            .iter()
            .filter(|id| cell.product_ids.contains(id))
            .cloned()
            .collect()
    }

    /// Returns every shelf holding at least one listed product, row-major.
    /// A product stocked on several shelves yields one cell per shelf.
    pub fn find_relevant_cells<'a>(&self, floor_plan: &'a FloorPlan) -> Vec<&'a Cell> {
        floor_plan
            .product_cells()
            .filter(|cell| cell.product_ids.iter().any(|id| self.items.contains(id)))
            .collect()
    }

    /// Listed products that no shelf on the floor plan stocks
    pub fn missing_products(&self, floor_plan: &FloorPlan) -> Vec<ProductId> {
        self.items
            .iter()
            .filter(|id| !floor_plan.product_cells().any(|cell| cell.stocks(id)))
            .cloned()
            .collect()
    }
}

impl<S: Into<ProductId>> FromIterator<S> for ShoppingList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

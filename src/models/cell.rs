// Cell model: the atomic unit of a floor plan

use crate::models::ProductId;
use serde::{Deserialize, Serialize};

/// What occupies a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    #[default]
    Empty,
    Products,
    Entrance,
    Exit,
    CashRegister,
}

impl CellKind {
    /// Shoppers may stand on and walk through these cells
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            CellKind::Empty | CellKind::Entrance | CellKind::Exit | CellKind::CashRegister
        )
    }

    /// Shelf cell: enterable from a walkable cell but never from another shelf
    pub fn is_product(self) -> bool {
        self == CellKind::Products
    }

    /// Stable one-byte tag, used for layout fingerprints
    pub fn tag(self) -> u8 {
        match self {
            CellKind::Empty => 0,
            CellKind::Products => 1,
            CellKind::Entrance => 2,
            CellKind::Exit => 3,
            CellKind::CashRegister => 4,
        }
    }
}

/// A single floor plan cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,

    #[serde(rename = "type")]
    pub kind: CellKind,

    /// Products stocked here; only meaningful for `Products` cells
    #[serde(rename = "productIds", default)]
    pub product_ids: Vec<ProductId>,
}

impl Cell {
    /// Creates a cell without products
    pub fn new(row: usize, col: usize, kind: CellKind) -> Self {
        Self {
            row,
            col,
            kind,
            product_ids: Vec::new(),
        }
    }

    /// Creates a shelf cell stocking the given products
    pub fn with_products<I, S>(row: usize, col: usize, product_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ProductId>,
    {
        Self {
            row,
            col,
            kind: CellKind::Products,
            product_ids: product_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_walkable(&self) -> bool {
        self.kind.is_walkable()
    }

    pub fn is_product(&self) -> bool {
        self.kind.is_product()
    }

    /// True if this is a shelf holding the product
    pub fn stocks(&self, product_id: &str) -> bool {
        self.is_product() && self.product_ids.iter().any(|id| id == product_id)
    }
}

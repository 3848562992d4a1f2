// Models module - exports all model types

mod cell;
mod floor_plan;
mod path_data;
mod position;
mod route;
mod shopping_list;

// Re-export model types
pub use self::cell::{Cell, CellKind};
pub use self::floor_plan::FloorPlan;
pub use self::path_data::{PathData, PathMetadata, PATH_DATA_FORMAT_VERSION};
pub use self::position::{step_cost, Position, NEIGHBOR_OFFSETS, ORTHOGONAL_OFFSETS};
pub use self::route::{OrderingStrategy, Route, Stop};
pub use self::shopping_list::ShoppingList;

// Common type aliases for improved code readability
pub type ProductId = String;
pub type CellIndex = usize;
pub type Cost = f64;

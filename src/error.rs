//! Error and warning types for route planning

use crate::models::{Position, ProductId};
use serde::Serialize;
use thiserror::Error;

/// Conditions that stop a route from being planned at all
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("floor plan has no entrance")]
    MissingEntrance,

    #[error("entrance {0} is not walkable and has no walkable neighbour")]
    EntranceNotWalkable(Position),

    #[error("position {0} is outside the floor plan")]
    OutOfBounds(Position),

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("path data was built for layout {found:#018x}, expected {expected:#018x}")]
    PathDataMismatch { expected: u64, found: u64 },

    #[error("path data computation was cancelled")]
    Cancelled,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;

/// Recoverable conditions; the route is still produced without the affected part
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum RouteWarning {
    #[error("no cash register or exit found, route ends at the last stop")]
    MissingDestination,

    #[error("destination {0} cannot be reached from the entrance")]
    UnreachableDestination(Position),

    #[error("shelf at {shelf} has no reachable access point, dropping {product_ids:?}")]
    UnreachableProduct {
        shelf: Position,
        product_ids: Vec<ProductId>,
    },

    #[error("product {0} is not stocked anywhere on the floor plan")]
    ProductNotInLayout(ProductId),

    #[error("no path from {from} to {to}, segment truncated")]
    NoPathBetweenWaypoints { from: Position, to: Position },

    #[error("cell {0} on the reconstructed path is not walkable, removed")]
    InvalidCellInPath(Position),

    #[error("{waypoints} stops exceed the exact ordering limit of {limit}, using nearest neighbour")]
    HeuristicOrdering { waypoints: usize, limit: usize },
}

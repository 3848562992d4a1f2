// Public modules
pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

// Re-exports for convenience
pub use algorithms::floyd_warshall::{compute_all_pairs, compute_all_pairs_with_cancel};
pub use algorithms::route_planner::{optimize_route, RoutePlanner};
pub use config::PlannerConfig;
pub use error::{PlannerError, Result, RouteWarning};
pub use models::{Cell, CellKind, FloorPlan, PathData, Position, Route, ShoppingList, Stop};
pub use utils::cache::PathDataCache;
pub use utils::graph::build_graph;
pub use utils::path::reconstruct_path;

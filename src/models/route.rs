// Route models for representing a planned walk through the store

use crate::error::RouteWarning;
use crate::models::{Cost, Position, ProductId};
use serde::Serialize;

/// How the visiting order was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingStrategy {
    /// Held-Karp: optimal over the chosen access points
    Exact,
    /// Nearest neighbour, used above the exact waypoint limit
    NearestNeighbor,
}

/// A numbered marker along the route
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    /// Where the shopper stands
    pub position: Position,

    /// 0 for the start, 1..=k for product stops, k + 1 for the finish
    pub stop_number: usize,

    /// Selected products picked up here
    pub product_ids: Vec<ProductId>,

    /// Shelf the products are taken from, for product stops
    pub shelf: Option<Position>,

    /// True for the start and finish markers
    pub is_special: bool,

    pub label: String,
}

impl Stop {
    pub fn start(position: Position) -> Self {
        Self {
            position,
            stop_number: 0,
            product_ids: Vec::new(),
            shelf: None,
            is_special: true,
            label: "Start".to_string(),
        }
    }

    pub fn finish(position: Position, stop_number: usize) -> Self {
        Self {
            position,
            stop_number,
            product_ids: Vec::new(),
            shelf: None,
            is_special: true,
            label: "Finish".to_string(),
        }
    }

    pub fn product(
        position: Position,
        stop_number: usize,
        shelf: Position,
        product_ids: Vec<ProductId>,
    ) -> Self {
        Self {
            position,
            stop_number,
            product_ids,
            shelf: Some(shelf),
            is_special: false,
            label: stop_number.to_string(),
        }
    }
}

/// The result of one optimisation run. Produced fresh each time and handed
/// to the caller by value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Walkable cells in walking order, no consecutive repeats
    pub cells: Vec<Position>,

    /// Start, product stops in visiting order, then finish (when there is one)
    pub stops: Vec<Stop>,

    /// Entrance, ordered access points, destination
    pub waypoints: Vec<Position>,

    /// Sum of shortest distances between consecutive waypoints
    pub total_cost: Cost,

    pub strategy: OrderingStrategy,

    /// Conditions recovered from while planning
    pub warnings: Vec<RouteWarning>,
}

impl Route {
    /// Product stops only, without the start and finish markers
    pub fn product_stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter().filter(|stop| !stop.is_special)
    }

    /// Number of cell-to-cell steps
    pub fn step_count(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// Length of the walked cell sequence, diagonal steps counting sqrt(2).
    /// Cells removed during validation can leave gaps, which are measured
    /// as straight octile distance.
    pub fn walked_length(&self) -> Cost {
        self.cells
            .windows(2)
            .map(|pair| pair[0].octile_distance_to(&pair[1]))
            .sum()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_labels() {
        let start = Stop::start(Position::new(0, 0));
        assert_eq!(start.label, "Start");
        assert!(start.is_special);

        let stop = Stop::product(Position::new(0, 1), 2, Position::new(1, 1), vec!["p".into()]);
        assert_eq!(stop.label, "2");
        assert!(!stop.is_special);

        let finish = Stop::finish(Position::new(2, 2), 3);
        assert_eq!(finish.label, "Finish");
        assert_eq!(finish.stop_number, 3);
    }

    #[test]
    fn test_walked_length() {
        let route = Route {
            cells: vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 2),
            ],
            stops: vec![Stop::start(Position::new(0, 0))],
            waypoints: vec![Position::new(0, 0), Position::new(1, 2)],
            total_cost: 1.0 + std::f64::consts::SQRT_2,
            strategy: OrderingStrategy::Exact,
            warnings: Vec::new(),
        };
        assert_eq!(route.step_count(), 2);
        assert!((route.walked_length() - route.total_cost).abs() < 1e-12);
        assert_eq!(route.product_stops().count(), 0);
    }

    #[test]
    fn test_serialises_camel_case() {
        let stop = Stop::start(Position::new(0, 0));
        let json = serde_json::to_string(&stop).unwrap();
        assert!(json.contains("\"stopNumber\":0"));
        assert!(json.contains("\"isSpecial\":true"));
    }
}

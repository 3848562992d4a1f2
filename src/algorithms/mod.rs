pub mod floyd_warshall;
pub mod held_karp;
pub mod nearest_neighbor;
pub mod route_planner;

// Common algorithm traits
use crate::models::Cost;

/// Costs between the waypoints of one tour, waypoint 0 being the fixed start
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointCosts {
    size: usize,
    costs: Vec<Cost>,

    /// Cost from each waypoint to the final destination, when the last leg
    /// is part of the objective
    closing: Option<Vec<Cost>>,
}

impl WaypointCosts {
    /// Builds the table by evaluating `cost(from, to)` for every ordered pair
    pub fn from_fn<F>(size: usize, cost: F) -> Self
    where
        F: Fn(usize, usize) -> Cost,
    {
        let mut costs = Vec::with_capacity(size * size);
        for from in 0..size {
            for to in 0..size {
                costs.push(if from == to { 0.0 } else { cost(from, to) });
            }
        }
        Self {
            size,
            costs,
            closing: None,
        }
    }

    /// Adds the per-waypoint cost of finishing the tour there
    pub fn with_closing(mut self, closing: Vec<Cost>) -> Self {
        debug_assert_eq!(closing.len(), self.size);
        self.closing = Some(closing);
        self
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn cost(&self, from: usize, to: usize) -> Cost {
        self.costs[from * self.size + to]
    }

    /// Zero unless a closing leg was configured
    pub fn closing_cost(&self, last: usize) -> Cost {
        self.closing.as_ref().map(|c| c[last]).unwrap_or(0.0)
    }

    /// Objective value of a visiting order
    pub fn tour_cost(&self, order: &[usize]) -> Cost {
        let legs: Cost = order.windows(2).map(|w| self.cost(w[0], w[1])).sum();
        legs + order.last().map(|&last| self.closing_cost(last)).unwrap_or(0.0)
    }
}

/// Trait for waypoint ordering strategies
pub trait TourSolver {
    /// Returns a visiting order over `0..costs.len()`: starts at waypoint 0
    /// and lists every waypoint exactly once.
    fn solve(&self, costs: &WaypointCosts) -> Vec<usize>;
}

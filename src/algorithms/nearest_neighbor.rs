use log::debug;

use crate::algorithms::{TourSolver, WaypointCosts};

/// Greedy ordering: always walk to the closest unvisited waypoint.
/// O(n^2), no optimality guarantee.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

impl TourSolver for NearestNeighbor {
    fn solve(&self, costs: &WaypointCosts) -> Vec<usize> {
        let n = costs.len();
        if n == 0 {
            return Vec::new();
        }

        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        visited[0] = true;
        order.push(0);

        let mut current = 0;
        while order.len() < n {
            let mut nearest: Option<(usize, f64)> = None;
            for candidate in 0..n {
                if visited[candidate] {
                    continue;
                }
                let cost = costs.cost(current, candidate);
                if cost.is_finite() && nearest.map_or(true, |(_, best)| cost < best) {
                    nearest = Some((candidate, cost));
                }
            }

            let Some((next, _)) = nearest else {
                break;
            };
            visited[next] = true;
            order.push(next);
            current = next;
        }

        // Waypoints unreachable from where the walk got stuck go last
        if order.len() < n {
            debug!(
                "nearest neighbour stranded {} waypoints, appending them",
                n - order.len()
            );
            order.extend((0..n).filter(|&i| !visited[i]));
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greedy_order() {
        let points: [f64; 4] = [0.0, 5.0, 1.0, -2.0];
        let costs = WaypointCosts::from_fn(4, |a, b| (points[a] - points[b]).abs());
        // 0 -> 1.0 (idx 2) -> -2.0 (idx 3) -> 5.0 (idx 1)
        assert_eq!(NearestNeighbor.solve(&costs), vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_ties_take_the_first_waypoint() {
        let costs = WaypointCosts::from_fn(3, |_, _| 1.0);
        assert_eq!(NearestNeighbor.solve(&costs), vec![0, 1, 2]);
    }

    #[test]
    fn test_unreachable_waypoints_are_appended() {
        let costs = WaypointCosts::from_fn(4, |_, b| if b == 1 { f64::INFINITY } else { 1.0 });
        assert_eq!(NearestNeighbor.solve(&costs), vec![0, 2, 3, 1]);
    }
}

use log::{debug, warn};

use crate::algorithms::nearest_neighbor::NearestNeighbor;
use crate::algorithms::{TourSolver, WaypointCosts};
use crate::models::Cost;

/// Exact Hamiltonian path from waypoint 0 via Held-Karp dynamic programming.
///
/// `dp[mask][u]` is the cheapest way to visit exactly the waypoints in
/// `mask`, starting at 0 and ending at `u`. Runs in O(2^n * n^2) time and
/// O(2^n * n) memory, so callers keep `n` small. At the ceiling of 20
/// waypoints the tables take about 190 MB.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeldKarp;

impl HeldKarp {
    /// Hard ceiling on the table size; larger inputs are ordered greedily
    pub const MAX_WAYPOINTS: usize = 20;
}

/// Parent slot of a state that was never reached
const NO_PARENT: u8 = u8::MAX;

impl TourSolver for HeldKarp {
    fn solve(&self, costs: &WaypointCosts) -> Vec<usize> {
        let n = costs.len();
        if n <= 2 {
            return (0..n).collect();
        }
        if n > Self::MAX_WAYPOINTS {
            warn!(
                "{} waypoints exceed the Held-Karp table limit of {}, ordering greedily",
                n,
                Self::MAX_WAYPOINTS
            );
            return NearestNeighbor.solve(costs);
        }

        let states = 1usize << n;
        debug!("Held-Karp over {} waypoints ({} states)", n, states * n);

        let mut dp: Vec<Cost> = vec![f64::INFINITY; states * n];
        let mut parent: Vec<u8> = vec![NO_PARENT; states * n];
        dp[n] = 0.0; // mask {0}, ending at 0

        for mask in (1..states).step_by(2) {
            for u in 1..n {
                if mask & (1 << u) == 0 {
                    continue;
                }
                let prev_mask = mask ^ (1 << u);
                for v in 0..n {
                    if prev_mask & (1 << v) == 0 {
                        continue;
                    }
                    let base = dp[prev_mask * n + v];
                    if !base.is_finite() {
                        continue;
                    }
                    let cost = base + costs.cost(v, u);
                    if cost < dp[mask * n + u] {
                        dp[mask * n + u] = cost;
                        parent[mask * n + u] = v as u8;
                    }
                }
            }
        }

        let full = states - 1;
        let mut best: Option<(usize, Cost)> = None;
        for u in 1..n {
            let total = dp[full * n + u] + costs.closing_cost(u);
            if total.is_finite() && best.map_or(true, |(_, c)| total < c) {
                best = Some((u, total));
            }
        }

        let Some((end, total)) = best else {
            warn!("no finite Hamiltonian path over {} waypoints, keeping input order", n);
            return (0..n).collect();
        };
        debug!("Held-Karp optimum {:.3} ending at waypoint {}", total, end);

        let mut order = Vec::with_capacity(n);
        let mut mask = full;
        let mut current = end;
        loop {
            order.push(current);
            let previous = parent[mask * n + current];
            mask ^= 1 << current;
            if previous == NO_PARENT {
                break;
            }
            current = previous as usize;
        }
        order.reverse();
        order
    }
}

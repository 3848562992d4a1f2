use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use log::{debug, warn};

use crate::error::RouteWarning;
use crate::models::{CellIndex, Cost, FloorPlan, PathData, Position};

/// Shortest-path distances between cells, however they were obtained
pub trait DistanceOracle {
    /// Cost of walking from one cell to another, infinite if impossible
    fn distance(&self, from: CellIndex, to: CellIndex) -> Cost;
}

impl DistanceOracle for PathData {
    fn distance(&self, from: CellIndex, to: CellIndex) -> Cost {
        PathData::distance(self, from, to)
    }
}

/// Breadth-first search tree over walkable cells (8-connected) rooted at
/// one cell. Paths are fewest-steps, not necessarily cheapest.
#[derive(Debug, Clone)]
pub struct BfsTree {
    source: CellIndex,
    parent: Vec<Option<CellIndex>>,
    cost: Vec<Cost>,
}

impl BfsTree {
    pub fn source(&self) -> CellIndex {
        self.source
    }

    /// Weighted length of the tree path to `target`, infinite if unreached
    pub fn cost_to(&self, target: CellIndex) -> Cost {
        self.cost.get(target).copied().unwrap_or(f64::INFINITY)
    }

    /// Cells from the source to `target`, both included
    pub fn path_to(&self, target: CellIndex) -> Option<Vec<CellIndex>> {
        if !self.cost_to(target).is_finite() {
            return None;
        }
        let mut path = vec![target];
        let mut current = target;
        while current != self.source {
            current = self.parent[current]?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

/// Runs a BFS from `source` that only ever steps onto walkable cells
pub fn bfs_walkable(floor_plan: &FloorPlan, source: CellIndex) -> BfsTree {
    let mut parent = vec![None; floor_plan.len()];
    let mut cost = vec![f64::INFINITY; floor_plan.len()];
    let mut queue = VecDeque::new();

    if source < floor_plan.len() {
        cost[source] = 0.0;
        queue.push_back(source);
    }

    while let Some(current) = queue.pop_front() {
        let here = floor_plan.position_of(current);
        for (next, weight) in floor_plan.neighbors(here) {
            if !floor_plan.is_walkable(next) {
                continue;
            }
            let Some(ni) = floor_plan.index_of(next) else {
                continue;
            };
            if cost[ni].is_finite() {
                continue;
            }
            cost[ni] = cost[current] + weight;
            parent[ni] = Some(current);
            queue.push_back(ni);
        }
    }

    BfsTree {
        source,
        parent,
        cost,
    }
}

/// Distance oracle for when no precomputed matrices exist. BFS trees are
/// built lazily per source and kept for the lifetime of the oracle.
pub struct BfsOracle<'a> {
    floor_plan: &'a FloorPlan,
    trees: RefCell<HashMap<CellIndex, Rc<BfsTree>>>,
}

impl<'a> BfsOracle<'a> {
    pub fn new(floor_plan: &'a FloorPlan) -> Self {
        Self {
            floor_plan,
            trees: RefCell::new(HashMap::new()),
        }
    }

    pub fn tree(&self, source: CellIndex) -> Rc<BfsTree> {
        let mut trees = self.trees.borrow_mut();
        trees
            .entry(source)
            .or_insert_with(|| Rc::new(bfs_walkable(self.floor_plan, source)))
            .clone()
    }
}

impl DistanceOracle for BfsOracle<'_> {
    fn distance(&self, from: CellIndex, to: CellIndex) -> Cost {
        self.tree(from).cost_to(to)
    }
}

/// Concrete cell sequence plus whatever had to be dropped to produce it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathReconstruction {
    pub cells: Vec<Position>,
    pub warnings: Vec<RouteWarning>,
}

/// Follows `next` hops from `from` until `to`. Returns the cells after
/// `from`, or `None` if the chain hits a missing hop.
pub fn walk_next_hops(
    path_data: &PathData,
    from: CellIndex,
    to: CellIndex,
) -> Option<Vec<CellIndex>> {
    let mut hops = Vec::new();
    let mut current = from;
    while current != to {
        // A shortest path never revisits a cell, so a longer chain is corrupt
        if hops.len() >= path_data.node_count() {
            return None;
        }
        current = path_data.next_hop(current, to)?;
        hops.push(current);
    }
    Some(hops)
}

/// Expands ordered waypoints into the walked cell sequence.
///
/// With path data each leg follows the next-hop matrix; without it (or when
/// the data belongs to another layout) each leg is a BFS over walkable
/// cells. Consecutive repeats are collapsed and non-walkable cells removed.
pub fn reconstruct_path(
    floor_plan: &FloorPlan,
    waypoints: &[Position],
    path_data: Option<&PathData>,
) -> PathReconstruction {
    let mut result = PathReconstruction::default();

    let path_data = match path_data {
        Some(data) if data.matches(floor_plan) => Some(data),
        Some(_) => {
            warn!("path data does not match the floor plan, falling back to BFS");
            None
        }
        None => None,
    };

    let mut indices = Vec::with_capacity(waypoints.len());
    for &waypoint in waypoints {
        match floor_plan.index_of(waypoint) {
            Some(index) => indices.push(index),
            None => {
                warn!("waypoint {} lies outside the floor plan, skipping", waypoint);
                result.warnings.push(RouteWarning::InvalidCellInPath(waypoint));
            }
        }
    }
    let Some(&first) = indices.first() else {
        return result;
    };

    let mut cells: Vec<CellIndex> = vec![first];
    for pair in indices.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let segment = match path_data {
            Some(data) => walk_next_hops(data, from, to),
            None => bfs_walkable(floor_plan, from)
                .path_to(to)
                .map(|path| path[1..].to_vec()),
        };

        match segment {
            Some(hops) => cells.extend(hops),
            None => {
                let (from, to) = (floor_plan.position_of(from), floor_plan.position_of(to));
                warn!("no path from {} to {}, truncating segment", from, to);
                result
                    .warnings
                    .push(RouteWarning::NoPathBetweenWaypoints { from, to });
            }
        }
    }
    cells.dedup();

    let before = cells.len();
    for index in cells {
        let position = floor_plan.position_of(index);
        if !floor_plan.cell_at(index).is_walkable() {
            result.warnings.push(RouteWarning::InvalidCellInPath(position));
            continue;
        }
        if result.cells.last() != Some(&position) {
            result.cells.push(position);
        }
    }
    let removed = before - result.cells.len();
    if removed > 0 {
        warn!("removed {} non-walkable or repeated cells from the path", removed);
    }
    debug!("reconstructed path of {} cells", result.cells.len());

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::floyd_warshall::compute_all_pairs;
    use crate::utils::graph::build_graph;

    fn positions(cells: &[(usize, usize)]) -> Vec<Position> {
        cells.iter().map(|&(r, c)| Position::new(r, c)).collect()
    }

    #[test]
    fn test_bfs_avoids_shelves() {
        let plan = FloorPlan::from_ascii(
            "E#.
             .#.
             ...",
        )
        .unwrap();
        let tree = bfs_walkable(&plan, 0);
        let target = plan.index_of(Position::new(0, 2)).unwrap();
        let path = tree.path_to(target).unwrap();
        assert!(path.iter().all(|&i| plan.cell_at(i).is_walkable()));
        assert_eq!(path.first(), Some(&0));
        assert_eq!(path.last(), Some(&target));
        // around the shelf column
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn test_bfs_unreachable() {
        let plan = FloorPlan::from_ascii("E#.").unwrap();
        let tree = bfs_walkable(&plan, 0);
        assert!(tree.path_to(2).is_none());
        assert!(tree.cost_to(2).is_infinite());
    }

    #[test]
    fn test_matrix_reconstruction() {
        let plan = FloorPlan::from_ascii(
            "E..
             ...
             ..C",
        )
        .unwrap();
        let data = compute_all_pairs(&build_graph(&plan));
        let result = reconstruct_path(
            &plan,
            &positions(&[(0, 0), (0, 2), (2, 2)]),
            Some(&data),
        );
        assert_eq!(result.cells, positions(&[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_repeated_waypoints_are_collapsed() {
        let plan = FloorPlan::new(2, 2);
        let data = compute_all_pairs(&build_graph(&plan));
        let result = reconstruct_path(
            &plan,
            &positions(&[(0, 0), (0, 0), (1, 1), (1, 1)]),
            Some(&data),
        );
        assert_eq!(result.cells, positions(&[(0, 0), (1, 1)]));
    }

    #[test]
    fn test_shelf_cells_are_filtered() {
        // The matrix path cuts through the single shelf
        let plan = FloorPlan::from_ascii("E#C").unwrap();
        let data = compute_all_pairs(&build_graph(&plan));
        let result = reconstruct_path(&plan, &positions(&[(0, 0), (0, 2)]), Some(&data));
        assert_eq!(result.cells, positions(&[(0, 0), (0, 2)]));
        assert_eq!(
            result.warnings,
            vec![RouteWarning::InvalidCellInPath(Position::new(0, 1))]
        );
    }

    #[test]
    fn test_missing_hop_truncates_segment() {
        let plan = FloorPlan::from_ascii("E##C").unwrap();
        let data = compute_all_pairs(&build_graph(&plan));
        let result = reconstruct_path(&plan, &positions(&[(0, 0), (0, 3)]), Some(&data));
        assert_eq!(result.cells, positions(&[(0, 0)]));
        assert_eq!(
            result.warnings,
            vec![RouteWarning::NoPathBetweenWaypoints {
                from: Position::new(0, 0),
                to: Position::new(0, 3)
            }]
        );
    }

    #[test]
    fn test_bfs_fallback_without_path_data() {
        let plan = FloorPlan::from_ascii(
            "E#.
             ...",
        )
        .unwrap();
        let result = reconstruct_path(&plan, &positions(&[(0, 0), (0, 2)]), None);
        assert_eq!(result.cells.first(), Some(&Position::new(0, 0)));
        assert_eq!(result.cells.last(), Some(&Position::new(0, 2)));
        assert!(result.cells.iter().all(|&p| plan.is_walkable(p)));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_stale_path_data_falls_back() {
        let plan = FloorPlan::from_ascii("E.C").unwrap();
        let other = FloorPlan::from_ascii("E#C").unwrap();
        let stale = compute_all_pairs(&build_graph(&other));
        let result = reconstruct_path(&plan, &positions(&[(0, 0), (0, 2)]), Some(&stale));
        assert_eq!(result.cells, positions(&[(0, 0), (0, 1), (0, 2)]));
    }

    #[test]
    fn test_bfs_oracle_caches_trees() {
        let plan = FloorPlan::new(3, 3);
        let oracle = BfsOracle::new(&plan);
        assert_eq!(oracle.distance(0, 2), 2.0);
        assert!(Rc::ptr_eq(&oracle.tree(0), &oracle.tree(0)));
    }
}

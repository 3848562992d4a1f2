use crate::models::{CellIndex, CellKind, Cost, FloorPlan, Position};
use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

/// Movement rule between neighbouring cells. Shoppers may walk between
/// walkable cells, step onto a shelf from a walkable cell and step off it
/// again, but never move from one shelf directly onto another.
pub fn can_step(from: CellKind, to: CellKind) -> bool {
    (from.is_walkable() && (to.is_walkable() || to.is_product()))
        || (from.is_product() && to.is_walkable())
}

/// Weighted traversal graph derived from a floor plan. Node `i` is the cell
/// at `row * cols + col`; the graph holds nothing the floor plan doesn't.
#[derive(Debug, Clone)]
pub struct TraversalGraph {
    graph: DiGraph<Position, Cost>,
    rows: usize,
    cols: usize,
    fingerprint: u64,
}

impl TraversalGraph {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Fingerprint of the floor plan the graph was built from
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn position(&self, node: CellIndex) -> Option<Position> {
        self.graph.node_weight(NodeIndex::new(node)).copied()
    }

    /// Weight of the direct step `from -> to`, if the step is permitted
    pub fn edge_weight(&self, from: CellIndex, to: CellIndex) -> Option<Cost> {
        let edge = self
            .graph
            .find_edge(NodeIndex::new(from), NodeIndex::new(to))?;
        self.graph.edge_weight(edge).copied()
    }

    /// All permitted steps as `(from, to, weight)`
    pub fn edges(&self) -> impl Iterator<Item = (CellIndex, CellIndex, Cost)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index(), *edge.weight()))
    }

    /// Cells reachable in one step from `node`
    pub fn successors(&self, node: CellIndex) -> impl Iterator<Item = CellIndex> + '_ {
        self.graph
            .neighbors(NodeIndex::new(node))
            .map(|neighbor| neighbor.index())
    }

    pub fn inner(&self) -> &DiGraph<Position, Cost> {
        &self.graph
    }
}

/// Builds the traversal graph: one node per cell, one directed edge per
/// permitted step to any of the 8 neighbours, weighted 1 orthogonally and
/// sqrt(2) diagonally.
pub fn build_graph(floor_plan: &FloorPlan) -> TraversalGraph {
    let mut graph = DiGraph::with_capacity(floor_plan.len(), floor_plan.len() * 8);

    // Nodes are added in row-major order so NodeIndex matches the cell index
    for cell in floor_plan.cells() {
        graph.add_node(Position::new(cell.row, cell.col));
    }

    for (from, cell) in floor_plan.cells().iter().enumerate() {
        let here = Position::new(cell.row, cell.col);
        for (next, weight) in floor_plan.neighbors(here) {
            let Some(to) = floor_plan.index_of(next) else {
                continue;
            };
            if can_step(cell.kind, floor_plan.cell_at(to).kind) {
                graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), weight);
            }
        }
    }

    debug!(
        "built traversal graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    TraversalGraph {
        graph,
        rows: floor_plan.rows(),
        cols: floor_plan.cols(),
        fingerprint: floor_plan.fingerprint(),
    }
}

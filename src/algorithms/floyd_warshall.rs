use std::sync::atomic::{AtomicBool, Ordering::Relaxed};

use log::{debug, trace};
use rayon::prelude::*;

use crate::error::{PlannerError, Result};
use crate::models::{CellIndex, Cost, PathData};
use crate::utils::graph::TraversalGraph;

/// Computes all-pairs shortest distances and first hops over the traversal
/// graph. O(V^3) in the number of cells; compute once per floor plan and
/// reuse the result.
pub fn compute_all_pairs(graph: &TraversalGraph) -> PathData {
    let n = graph.node_count();
    debug!("computing all-pairs shortest paths over {} cells", n);

    let (mut dist, mut next) = initial_matrices(graph);
    for k in 0..n {
        relax_pivot(&mut dist, &mut next, n, k);
    }
    PathData::from_matrices(dist, next, graph.rows(), graph.cols(), graph.fingerprint())
}

/// Same as [`compute_all_pairs`], checking `cancel` before every pivot so a
/// background job can be abandoned when the floor plan changes.
pub fn compute_all_pairs_with_cancel(
    graph: &TraversalGraph,
    cancel: &AtomicBool,
) -> Result<PathData> {
    let n = graph.node_count();
    debug!("computing all-pairs shortest paths over {} cells", n);

    let (mut dist, mut next) = initial_matrices(graph);
    for k in 0..n {
        if cancel.load(Relaxed) {
            debug!("all-pairs computation cancelled at pivot {}", k);
            return Err(PlannerError::Cancelled);
        }
        relax_pivot(&mut dist, &mut next, n, k);
    }
    Ok(PathData::from_matrices(
        dist,
        next,
        graph.rows(),
        graph.cols(),
        graph.fingerprint(),
    ))
}

fn initial_matrices(graph: &TraversalGraph) -> (Vec<Cost>, Vec<Option<CellIndex>>) {
    let n = graph.node_count();
    let mut dist: Vec<Cost> = vec![f64::INFINITY; n * n];
    let mut next: Vec<Option<CellIndex>> = vec![None; n * n];

    for i in 0..n {
        dist[i * n + i] = 0.0;
        next[i * n + i] = Some(i);
    }
    for (from, to, weight) in graph.edges() {
        if weight < dist[from * n + to] {
            dist[from * n + to] = weight;
            next[from * n + to] = Some(to);
        }
    }
    (dist, next)
}

fn relax_pivot(dist: &mut [Cost], next: &mut [Option<CellIndex>], n: usize, k: usize) {
    // Row k and column k are fixed points of pivot k, so rows can be
    // relaxed independently against a snapshot of row k.
    let pivot_row: Vec<Cost> = dist[k * n..(k + 1) * n].to_vec();

    dist.par_chunks_mut(n)
        .zip(next.par_chunks_mut(n))
        .for_each(|(dist_row, next_row)| {
            let via = dist_row[k];
            if !via.is_finite() {
                return;
            }
            let first_hop = next_row[k];
            for (j, through_pivot) in pivot_row.iter().enumerate() {
                let candidate = via + through_pivot;
                if candidate < dist_row[j] {
                    dist_row[j] = candidate;
                    next_row[j] = first_hop;
                }
            }
        });

    if k % 256 == 0 {
        trace!("pivot {}/{}", k, n);
    }
}

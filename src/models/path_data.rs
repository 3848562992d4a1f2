// Distance / next-hop artifact produced by the all-pairs computation

use crate::error::{PlannerError, Result};
use crate::models::{CellIndex, Cost, FloorPlan};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Bumped whenever the serialised layout of `PathData` changes
pub const PATH_DATA_FORMAT_VERSION: u32 = 1;

/// Describes which floor plan the matrices belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMetadata {
    pub row_count: usize,
    pub col_count: usize,
    pub fingerprint: u64,
    pub format_version: u32,
}

/// All-pairs shortest distances and first hops, stored row-major as flat
/// `n * n` vectors where `n = rows * cols`. Immutable once computed; share
/// it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    /// `dist[i * n + j]`, infinite when `j` cannot be reached from `i`
    #[serde(with = "infinite_as_null")]
    dist: Vec<Cost>,

    /// `next[i * n + j]`, the first hop from `i` towards `j`
    next: Vec<Option<CellIndex>>,

    pub metadata: PathMetadata,
}

impl PathData {
    /// Wraps matrices computed for a `rows` x `cols` floor plan
    pub fn new(
        dist: Vec<Cost>,
        next: Vec<Option<CellIndex>>,
        rows: usize,
        cols: usize,
        fingerprint: u64,
    ) -> Result<Self> {
        let n = rows * cols;
        if dist.len() != n * n || next.len() != n * n {
            return Err(PlannerError::InvalidLayout(format!(
                "matrices hold {} / {} entries, expected {}",
                dist.len(),
                next.len(),
                n * n
            )));
        }
        Ok(Self::from_matrices(dist, next, rows, cols, fingerprint))
    }

    /// Wraps matrices whose sizes are known to be consistent
    pub(crate) fn from_matrices(
        dist: Vec<Cost>,
        next: Vec<Option<CellIndex>>,
        rows: usize,
        cols: usize,
        fingerprint: u64,
    ) -> Self {
        Self {
            dist,
            next,
            metadata: PathMetadata {
                row_count: rows,
                col_count: cols,
                fingerprint,
                format_version: PATH_DATA_FORMAT_VERSION,
            },
        }
    }

    /// Number of nodes (cells) the matrices cover
    pub fn node_count(&self) -> usize {
        self.metadata.row_count * self.metadata.col_count
    }

    pub fn distance(&self, from: CellIndex, to: CellIndex) -> Cost {
        self.dist[from * self.node_count() + to]
    }

    pub fn next_hop(&self, from: CellIndex, to: CellIndex) -> Option<CellIndex> {
        self.next[from * self.node_count() + to]
    }

    pub fn is_reachable(&self, from: CellIndex, to: CellIndex) -> bool {
        self.distance(from, to).is_finite()
    }

    /// Checks that the matrices were computed for this floor plan
    pub fn ensure_matches(&self, floor_plan: &FloorPlan) -> Result<()> {
        let expected = floor_plan.fingerprint();
        let same_shape = self.metadata.row_count == floor_plan.rows()
            && self.metadata.col_count == floor_plan.cols();
        if !same_shape || self.metadata.fingerprint != expected {
            return Err(PlannerError::PathDataMismatch {
                expected,
                found: self.metadata.fingerprint,
            });
        }
        Ok(())
    }

    /// True if this artifact can be reused for the floor plan
    pub fn matches(&self, floor_plan: &FloorPlan) -> bool {
        self.metadata.format_version == PATH_DATA_FORMAT_VERSION
            && self.ensure_matches(floor_plan).is_ok()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a persisted artifact, rejecting truncated matrices
    pub fn from_json(json: &str) -> Result<Self> {
        let data: PathData = serde_json::from_str(json)?;
        let n = data.node_count();
        if data.dist.len() != n * n || data.next.len() != n * n {
            return Err(PlannerError::InvalidLayout(
                "persisted path data does not match its metadata".to_string(),
            ));
        }
        Ok(data)
    }
}

// JSON has no infinity, unreachable pairs are written as null
mod infinite_as_null {
    use super::*;

    pub fn serialize<S: Serializer>(
        dist: &[Cost],
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(dist.iter().map(|d| d.is_finite().then_some(*d)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Vec<Cost>, D::Error> {
        let raw: Vec<Option<Cost>> = Vec::deserialize(deserializer)?;
        Ok(raw.into_iter().map(|d| d.unwrap_or(f64::INFINITY)).collect())
    }
}

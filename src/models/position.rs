// Position model representing a cell coordinate on the floor plan

use serde::{Deserialize, Serialize};

/// Row/column coordinate of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// The 8 neighbouring offsets as (row delta, col delta), orthogonal first
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Orthogonal offsets used when looking for access points
pub const ORTHOGONAL_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl Position {
    /// Creates a new position
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Shifts the position by the given offset, staying inside a `rows` x `cols` grid
    pub fn offset(&self, dr: isize, dc: isize, rows: usize, cols: usize) -> Option<Position> {
        let r = self.row.checked_add_signed(dr)?;
        let c = self.col.checked_add_signed(dc)?;
        if r < rows && c < cols {
            Some(Position::new(r, c))
        } else {
            None
        }
    }

    /// True if the other cell is one of the 8 neighbours
    pub fn is_adjacent(&self, other: &Position) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr <= 1 && dc <= 1 && (dr + dc) > 0
    }

    /// Octile distance: the cost of the cheapest unobstructed 8-connected walk
    pub fn octile_distance_to(&self, other: &Position) -> f64 {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        let diagonal = dr.min(dc) as f64;
        let straight = (dr.max(dc) - dr.min(dc)) as f64;
        diagonal * std::f64::consts::SQRT_2 + straight
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Weight of a single step between neighbouring cells
pub fn step_cost(dr: isize, dc: isize) -> f64 {
    if dr != 0 && dc != 0 {
        std::f64::consts::SQRT_2
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_stays_in_bounds() {
        let pos = Position::new(0, 0);
        assert_eq!(pos.offset(-1, 0, 3, 3), None);
        assert_eq!(pos.offset(1, 1, 3, 3), Some(Position::new(1, 1)));
        assert_eq!(Position::new(2, 2).offset(0, 1, 3, 3), None);
    }

    #[test]
    fn test_adjacency() {
        let pos = Position::new(1, 1);
        assert!(pos.is_adjacent(&Position::new(0, 0)));
        assert!(pos.is_adjacent(&Position::new(1, 2)));
        assert!(!pos.is_adjacent(&pos));
        assert!(!pos.is_adjacent(&Position::new(3, 1)));
    }

    #[test]
    fn test_octile_distance() {
        let a = Position::new(0, 0);
        let b = Position::new(2, 3);
        let expected = 2.0 * std::f64::consts::SQRT_2 + 1.0;
        assert!((a.octile_distance_to(&b) - expected).abs() < 1e-12);
    }
}

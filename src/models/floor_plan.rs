// Floor plan model: a rectangular grid of typed cells

use crate::error::{PlannerError, Result};
use crate::models::position::{step_cost, NEIGHBOR_OFFSETS, ORTHOGONAL_OFFSETS};
use crate::models::{Cell, CellIndex, CellKind, Position};
use log::debug;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Represents a store layout. Cells are stored row-major, so the graph
/// node of a cell is `row * cols + col`.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorPlan {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl FloorPlan {
    /// Creates a floor plan where every cell is empty
    pub fn new(rows: usize, cols: usize) -> Self {
        let cells = (0..rows * cols)
            .map(|i| Cell::new(i / cols.max(1), i % cols.max(1), CellKind::Empty))
            .collect();
        Self { rows, cols, cells }
    }

    /// Builds a floor plan from nested rows, checking that the grid is rectangular.
    /// The `row`/`col` fields of each cell are restamped from its position.
    pub fn from_cells(layout: Vec<Vec<Cell>>) -> Result<Self> {
        let rows = layout.len();
        let cols = layout.first().map(Vec::len).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(PlannerError::InvalidLayout("layout is empty".to_string()));
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for (r, row) in layout.into_iter().enumerate() {
            if row.len() != cols {
                return Err(PlannerError::InvalidLayout(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    cols
                )));
            }
            for (c, mut cell) in row.into_iter().enumerate() {
                if cell.row != r || cell.col != c {
                    debug!(
                        "cell at ({}, {}) claims position ({}, {})",
                        r, c, cell.row, cell.col
                    );
                }
                cell.row = r;
                cell.col = c;
                cells.push(cell);
            }
        }

        Ok(Self { rows, cols, cells })
    }

    /// Parses the stored layout format: a JSON array of rows of cells
    pub fn from_layout_json(json: &str) -> Result<Self> {
        let layout: Vec<Vec<Cell>> = serde_json::from_str(json)?;
        Self::from_cells(layout)
    }

    /// Serialises back into the stored layout format
    pub fn to_layout_json(&self) -> Result<String> {
        let layout: Vec<&[Cell]> = self.cells.chunks(self.cols.max(1)).collect();
        Ok(serde_json::to_string(&layout)?)
    }

    /// Parses a compact text layout, one line per row:
    /// `.` empty, `E` entrance, `X` exit, `C` cash register, `#` empty shelf,
    /// and a lowercase letter for a shelf stocking the product of that name.
    pub fn from_ascii(text: &str) -> Result<Self> {
        let layout = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(r, line)| {
                line.chars()
                    .enumerate()
                    .map(|(c, ch)| match ch {
                        '.' => Ok(Cell::new(r, c, CellKind::Empty)),
                        'E' => Ok(Cell::new(r, c, CellKind::Entrance)),
                        'X' => Ok(Cell::new(r, c, CellKind::Exit)),
                        'C' => Ok(Cell::new(r, c, CellKind::CashRegister)),
                        '#' => Ok(Cell::new(r, c, CellKind::Products)),
                        'a'..='z' => Ok(Cell::with_products(r, c, [ch.to_string()])),
                        other => Err(PlannerError::InvalidLayout(format!(
                            "unknown cell symbol '{}' at ({}, {})",
                            other, r, c
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_cells(layout)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells, which is also the number of graph nodes
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn index_of(&self, pos: Position) -> Option<CellIndex> {
        self.contains(pos).then(|| pos.row * self.cols + pos.col)
    }

    pub fn position_of(&self, index: CellIndex) -> Position {
        Position::new(index / self.cols, index % self.cols)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index_of(pos).map(|i| &self.cells[i])
    }

    pub fn cell_at(&self, index: CellIndex) -> &Cell {
        &self.cells[index]
    }

    /// Changes the kind of a cell, clearing its products unless it stays a shelf
    pub fn set_kind(&mut self, pos: Position, kind: CellKind) -> Result<()> {
        let index = self.index_of(pos).ok_or(PlannerError::OutOfBounds(pos))?;
        let cell = &mut self.cells[index];
        cell.kind = kind;
        if kind != CellKind::Products {
            cell.product_ids.clear();
        }
        Ok(())
    }

    /// Turns the cell into a shelf and adds the products to it
    pub fn stock<I, S>(&mut self, pos: Position, product_ids: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = self.index_of(pos).ok_or(PlannerError::OutOfBounds(pos))?;
        let cell = &mut self.cells[index];
        cell.kind = CellKind::Products;
        for id in product_ids {
            let id = id.into();
            if !cell.product_ids.contains(&id) {
                cell.product_ids.push(id);
            }
        }
        Ok(())
    }

    /// Out-of-bounds positions are never walkable
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.cell(pos).map(Cell::is_walkable).unwrap_or(false)
    }

    /// First cell of the given kind in row-major order
    pub fn find_first(&self, kind: CellKind) -> Option<Position> {
        self.cells
            .iter()
            .find(|cell| cell.kind == kind)
            .map(|cell| Position::new(cell.row, cell.col))
    }

    pub fn find_entrance(&self) -> Option<Position> {
        self.find_first(CellKind::Entrance)
    }

    /// The cash register if there is one, otherwise the exit
    pub fn default_destination(&self) -> Option<Position> {
        self.find_first(CellKind::CashRegister)
            .or_else(|| self.find_first(CellKind::Exit))
    }

    /// All shelf cells in row-major order
    pub fn product_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| cell.is_product())
    }

    /// In-bounds 8-neighbourhood of a cell with the step weight to each neighbour
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = (Position, f64)> + '_ {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dr, dc)| {
            pos.offset(dr, dc, self.rows, self.cols)
                .map(|next| (next, step_cost(dr, dc)))
        })
    }

    /// Walkable cells directly above, below, left and right of `pos`
    pub fn walkable_orthogonal_neighbors(&self, pos: Position) -> Vec<Position> {
        ORTHOGONAL_OFFSETS
            .iter()
            .filter_map(|&(dr, dc)| pos.offset(dr, dc, self.rows, self.cols))
            .filter(|next| self.is_walkable(*next))
            .collect()
    }

    /// Content key for the traversal structure: FNV-1a over the dimensions
    /// and cell kinds. Product placement does not change traversal, so it is
    /// not part of the key.
    pub fn fingerprint(&self) -> u64 {
        let mut hash = FNV_OFFSET;
        let mut feed = |byte: u8| {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        };
        for byte in (self.rows as u64)
            .to_le_bytes()
            .into_iter()
            .chain((self.cols as u64).to_le_bytes())
        {
            feed(byte);
        }
        for cell in &self.cells {
            feed(cell.kind.tag());
        }
        hash
    }
}

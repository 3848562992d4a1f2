use std::fs;
use std::path::Path;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::models::{CellKind, FloorPlan, Position};

// Small store used by the demo binary when no layout file is given
const DEMO_LAYOUT: &str = "
    E........
    .a.b.c.d.
    .#.#.#.#.
    .e.f.g.h.
    .........
    .i.#.j.#.
    ........C
";

pub fn demo_layout() -> Result<FloorPlan> {
    FloorPlan::from_ascii(DEMO_LAYOUT)
}

/// Reads a layout JSON file (array of rows of cells)
pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<FloorPlan> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let floor_plan = FloorPlan::from_layout_json(&json)?;
    info!(
        "Loaded {}x{} layout from {}",
        floor_plan.rows(),
        floor_plan.cols(),
        path.display()
    );
    Ok(floor_plan)
}

pub fn save_layout<P: AsRef<Path>>(floor_plan: &FloorPlan, path: P) -> Result<()> {
    fs::write(path, floor_plan.to_layout_json()?)?;
    Ok(())
}

/// Generates an aisle-style store from a seed.
///
/// Shelves only ever occupy odd columns between the first and last row, so
/// the top row, the bottom row and every even column stay walkable and all
/// walkable cells are connected. Each interior cell of a shelf column becomes
/// a shelf with probability `shelf_density`, stocking one product drawn
/// from `p0..p{product_count - 1}`. The entrance sits at the top-left corner
/// and the cash register at the bottom-right one.
pub fn random_layout(
    rows: usize,
    cols: usize,
    shelf_density: f64,
    product_count: usize,
    seed: u64,
) -> FloorPlan {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut floor_plan = FloorPlan::new(rows, cols);
    if floor_plan.is_empty() {
        return floor_plan;
    }
    let density = shelf_density.clamp(0.0, 1.0);

    let mut shelves = 0;
    for row in 1..rows.saturating_sub(1) {
        for col in (1..cols).step_by(2) {
            if !rng.gen_bool(density) {
                continue;
            }
            let pos = Position::new(row, col);
            let placed = if product_count == 0 {
                floor_plan.set_kind(pos, CellKind::Products)
            } else {
                let product = format!("p{}", rng.gen_range(0..product_count));
                floor_plan.stock(pos, [product])
            };
            if placed.is_ok() {
                shelves += 1;
            }
        }
    }

    let entrance = Position::new(0, 0);
    let register = Position::new(rows - 1, cols - 1);
    floor_plan.set_kind(entrance, CellKind::Entrance).ok();
    if register != entrance {
        floor_plan.set_kind(register, CellKind::CashRegister).ok();
    }

    debug!(
        "generated {}x{} layout with {} shelves (seed {})",
        rows, cols, shelves, seed
    );
    floor_plan
}

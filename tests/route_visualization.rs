// Renders a planned route over the floor plan as a PNG
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;
use store_path_planner::utils::cache::PathDataCache;
use store_path_planner::utils::init_layout::random_layout;
use store_path_planner::{CellKind, FloorPlan, Route, RoutePlanner, ShoppingList};

const CELL_SIZE: u32 = 24;

#[test]
fn test_route_with_visualization() -> Result<(), Box<dyn Error>> {
    let floor_plan = random_layout(16, 23, 0.65, 10, 17);
    let shopping_list: ShoppingList = ["p0", "p2", "p4", "p6", "p8"].into_iter().collect();

    println!("Computing path data...");
    let cache = PathDataCache::new();
    let path_data = cache.get_or_compute(&floor_plan)?;

    let planner = RoutePlanner::new(&floor_plan, Some(path_data.as_ref()))?;
    let route = planner.plan(None, None, &shopping_list)?;

    println!("Route with {} stops:", route.stops.len());
    for stop in &route.stops {
        println!("  {:>6} at {} {:?}", stop.label, stop.position, stop.product_ids);
    }
    println!("  Total distance: {:.2}", route.total_cost);
    for warning in &route.warnings {
        println!("  warning: {}", warning);
    }

    let output_path = std::env::temp_dir().join("store_path_planner_route.png");
    visualize_route(&floor_plan, &route, &output_path)?;
    println!("Route image saved to {}", output_path.display());

    assert!(output_path.exists());
    assert!(std::fs::metadata(&output_path)?.len() > 0);
    std::fs::remove_file(&output_path).ok();
    Ok(())
}

fn cell_color(kind: CellKind) -> RGBColor {
    match kind {
        CellKind::Empty => RGBColor(245, 245, 245),
        CellKind::Products => RGBColor(160, 120, 80),
        CellKind::Entrance => RGBColor(60, 170, 90),
        CellKind::Exit => RGBColor(200, 60, 60),
        CellKind::CashRegister => RGBColor(230, 180, 40),
    }
}

fn visualize_route(
    floor_plan: &FloorPlan,
    route: &Route,
    output_path: &Path,
) -> Result<(), Box<dyn Error>> {
    let width = floor_plan.cols() as u32 * CELL_SIZE;
    let height = floor_plan.rows() as u32 * CELL_SIZE;
    let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    // Pixel coordinates of a cell's top-left corner and centre
    let corner = |row: usize, col: usize| {
        (col as i32 * CELL_SIZE as i32, row as i32 * CELL_SIZE as i32)
    };
    let centre = |row: usize, col: usize| {
        let (x, y) = corner(row, col);
        (x + CELL_SIZE as i32 / 2, y + CELL_SIZE as i32 / 2)
    };

    for cell in floor_plan.cells() {
        let (x, y) = corner(cell.row, cell.col);
        root.draw(&Rectangle::new(
            [(x, y), (x + CELL_SIZE as i32 - 1, y + CELL_SIZE as i32 - 1)],
            cell_color(cell.kind).filled(),
        ))?;
    }

    let points: Vec<(i32, i32)> = route.cells.iter().map(|p| centre(p.row, p.col)).collect();
    root.draw(&PathElement::new(points, BLUE.mix(0.7).stroke_width(3)))?;

    for stop in &route.stops {
        let (x, y) = centre(stop.position.row, stop.position.col);
        let color = if stop.is_special { &RED } else { &BLUE };
        root.draw(&Circle::new((x, y), CELL_SIZE as i32 / 3, color.filled()))?;
    }

    root.present()?;
    Ok(())
}

use std::collections::BTreeSet;
use std::env;
use std::process;
use std::time::Instant;

use env_logger::Env;
use log::error;
use store_path_planner::utils::init_layout::{demo_layout, load_layout};
use store_path_planner::{
    CellKind, FloorPlan, PathDataCache, PlannerConfig, Position, Result, Route, RoutePlanner,
    ShoppingList,
};

// Usage: store_path_planner [layout.json|-] [product,product,...] [config.json]
fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let floor_plan = match args.first().map(String::as_str) {
        Some(path) if path != "-" => load_layout(path)?,
        _ => demo_layout()?,
    };
    let config = match args.get(2) {
        Some(path) => PlannerConfig::from_json_file(path)?,
        None => PlannerConfig::default(),
    };

    // select products
    let shopping_list: ShoppingList = match args.get(1) {
        Some(items) => items
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect(),
        None => floor_plan
            .product_cells()
            .flat_map(|cell| cell.product_ids.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .take(5)
            .collect(),
    };

    println!("Floor plan: {}x{}", floor_plan.rows(), floor_plan.cols());
    println!("Shopping list:");
    for product_id in &shopping_list.items {
        println!("  {}", product_id);
    }

    let start_time = Instant::now();
    let cache = PathDataCache::from_config(&config);
    let path_data = cache.get_or_compute(&floor_plan)?;
    println!(
        "Path data for {} cells ready in {:.2?}",
        path_data.node_count(),
        start_time.elapsed()
    );

    let start_time = Instant::now();
    let planner = RoutePlanner::new(&floor_plan, Some(path_data.as_ref()))?.with_config(config);
    let route = planner.plan(None, None, &shopping_list)?;
    let elapsed = start_time.elapsed();

    println!("\nRoute (planned in {:.2?}, {:?} ordering):", elapsed, route.strategy);
    println!("------------------------------------------");
    for stop in &route.stops {
        if stop.product_ids.is_empty() {
            println!("  {:>6} at {}", stop.label, stop.position);
        } else {
            println!(
                "  {:>6} at {}  pick {} from shelf {}",
                stop.label,
                stop.position,
                stop.product_ids.join(", "),
                stop.shelf.map(|s| s.to_string()).unwrap_or_default()
            );
        }
    }
    println!("  Total distance: {:.2}", route.total_cost);
    println!("  Steps: {}", route.step_count());

    if route.has_warnings() {
        println!("\nWarnings:");
        for warning in &route.warnings {
            println!("  {}", warning);
        }
    }

    println!();
    print_route(&floor_plan, &route);
    Ok(())
}

// Draws the layout with the walked cells marked
fn print_route(floor_plan: &FloorPlan, route: &Route) {
    for row in 0..floor_plan.rows() {
        let line: String = (0..floor_plan.cols())
            .map(|col| {
                let pos = Position::new(row, col);
                if let Some(stop) = route.stops.iter().find(|s| s.position == pos) {
                    return match stop.stop_number {
                        0 => 'S',
                        _ if stop.is_special => 'F',
                        n => std::char::from_digit((n % 36) as u32, 36).unwrap_or('?'),
                    };
                }
                if route.cells.contains(&pos) {
                    return '*';
                }
                match floor_plan.cell(pos) {
                    Some(cell) if cell.is_product() => '#',
                    Some(cell) if cell.kind != CellKind::Empty => '+',
                    _ => '.',
                }
            })
            .collect();
        println!("  {}", line);
    }
}

use log::{debug, warn};

use crate::algorithms::held_karp::HeldKarp;
use crate::algorithms::nearest_neighbor::NearestNeighbor;
use crate::algorithms::{TourSolver, WaypointCosts};
use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result, RouteWarning};
use crate::models::{
    CellIndex, Cost, FloorPlan, OrderingStrategy, PathData, Position, ProductId, Route,
    ShoppingList, Stop,
};
use crate::utils::path::{reconstruct_path, BfsOracle, DistanceOracle};

/// A shelf to visit and the walkable cell the shopper stands on to reach it
#[derive(Debug, Clone, PartialEq)]
struct ProductWaypoint {
    shelf: Position,
    access: Position,
    access_index: CellIndex,
    product_ids: Vec<ProductId>,
}

/// Plans shopping routes over one floor plan.
///
/// Access points are chosen greedily (closest to the entrance), then the
/// visiting order over those access points is solved exactly with Held-Karp
/// up to `max_exact_waypoints` stops. The composite result is optimal for
/// the chosen access points, not necessarily end-to-end.
#[derive(Debug, Clone)]
pub struct RoutePlanner<'a> {
    floor_plan: &'a FloorPlan,
    path_data: Option<&'a PathData>,
    config: PlannerConfig,
}

impl<'a> RoutePlanner<'a> {
    /// Creates a planner. Without path data, distances and paths come from
    /// BFS over walkable cells, which is slower and not always optimal.
    pub fn new(floor_plan: &'a FloorPlan, path_data: Option<&'a PathData>) -> Result<Self> {
        if let Some(data) = path_data {
            data.ensure_matches(floor_plan)?;
        }
        Ok(Self {
            floor_plan,
            path_data,
            config: PlannerConfig::default(),
        })
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans a route from the entrance through every shelf stocking a listed
    /// product to the destination.
    ///
    /// `entrance` defaults to the floor plan's entrance cell; `destination`
    /// defaults to its cash register, then its exit. Only a missing or
    /// unusable entrance is an error; everything else degrades into a
    /// warning on the returned route.
    pub fn plan(
        &self,
        entrance: Option<Position>,
        destination: Option<Position>,
        shopping_list: &ShoppingList,
    ) -> Result<Route> {
        match self.path_data {
            Some(data) => self.plan_with(data, entrance, destination, shopping_list),
            None => {
                debug!("no path data, planning with BFS distances");
                let oracle = BfsOracle::new(self.floor_plan);
                self.plan_with(&oracle, entrance, destination, shopping_list)
            }
        }
    }

    fn plan_with(
        &self,
        oracle: &dyn DistanceOracle,
        entrance: Option<Position>,
        destination: Option<Position>,
        shopping_list: &ShoppingList,
    ) -> Result<Route> {
        let mut warnings = Vec::new();

        let entrance = entrance
            .or_else(|| self.floor_plan.find_entrance())
            .ok_or(PlannerError::MissingEntrance)?;
        if !self.floor_plan.contains(entrance) {
            return Err(PlannerError::OutOfBounds(entrance));
        }
        let start = self
            .standing_cell(entrance)
            .ok_or(PlannerError::EntranceNotWalkable(entrance))?;
        let start_index = self.index(start);

        let destination =
            self.resolve_destination(oracle, start_index, destination, &mut warnings)?;

        for product_id in shopping_list.missing_products(self.floor_plan) {
            warn!("product {} is not on the floor plan", product_id);
            warnings.push(RouteWarning::ProductNotInLayout(product_id));
        }

        let stops = self.select_access_points(oracle, start_index, shopping_list, &mut warnings);

        // Waypoint 0 is the start, waypoint i + 1 is stops[i]
        let mut indices = Vec::with_capacity(stops.len() + 1);
        indices.push(start_index);
        indices.extend(stops.iter().map(|stop| stop.access_index));

        let mut costs = WaypointCosts::from_fn(indices.len(), |a, b| {
            oracle.distance(indices[a], indices[b])
        });
        if let (true, Some((_, dest_index))) = (self.config.close_at_destination, destination) {
            let closing = indices
                .iter()
                .map(|&i| oracle.distance(i, dest_index))
                .collect();
            costs = costs.with_closing(closing);
        }

        let limit = self.exact_limit();
        let strategy = if stops.len() <= limit {
            OrderingStrategy::Exact
        } else {
            warn!(
                "{} stops exceed the exact ordering limit of {}",
                stops.len(),
                limit
            );
            warnings.push(RouteWarning::HeuristicOrdering {
                waypoints: stops.len(),
                limit,
            });
            OrderingStrategy::NearestNeighbor
        };
        let order = match strategy {
            OrderingStrategy::Exact => HeldKarp.solve(&costs),
            OrderingStrategy::NearestNeighbor => NearestNeighbor.solve(&costs),
        };

        let mut total_cost: Cost = order.windows(2).map(|w| costs.cost(w[0], w[1])).sum();

        let mut waypoints = vec![start];
        let mut route_stops = vec![Stop::start(start)];
        for (number, &waypoint) in order.iter().skip(1).enumerate() {
            let stop = &stops[waypoint - 1];
            waypoints.push(stop.access);
            route_stops.push(Stop::product(
                stop.access,
                number + 1,
                stop.shelf,
                stop.product_ids.clone(),
            ));
        }
        if let Some((dest, dest_index)) = destination {
            if let Some(&last) = order.last() {
                total_cost += oracle.distance(indices[last], dest_index);
            }
            waypoints.push(dest);
            route_stops.push(Stop::finish(dest, route_stops.len()));
        }

        let reconstruction = reconstruct_path(self.floor_plan, &waypoints, self.path_data);
        warnings.extend(reconstruction.warnings);

        debug!(
            "planned route: {} stops, {} cells, cost {:.3}",
            route_stops.len(),
            reconstruction.cells.len(),
            total_cost
        );

        Ok(Route {
            cells: reconstruction.cells,
            stops: route_stops,
            waypoints,
            total_cost,
            strategy,
            warnings,
        })
    }

    /// Picks the destination and checks it can be reached from the start
    fn resolve_destination(
        &self,
        oracle: &dyn DistanceOracle,
        start_index: CellIndex,
        requested: Option<Position>,
        warnings: &mut Vec<RouteWarning>,
    ) -> Result<Option<(Position, CellIndex)>> {
        let Some(destination) = requested.or_else(|| self.floor_plan.default_destination()) else {
            warn!("no cash register or exit, route ends at the last stop");
            warnings.push(RouteWarning::MissingDestination);
            return Ok(None);
        };
        if !self.floor_plan.contains(destination) {
            return Err(PlannerError::OutOfBounds(destination));
        }

        let standing = self
            .standing_cell(destination)
            .filter(|&cell| oracle.distance(start_index, self.index(cell)).is_finite());
        match standing {
            Some(cell) => Ok(Some((cell, self.index(cell)))),
            None => {
                warn!("destination {} cannot be reached from the entrance", destination);
                warnings.push(RouteWarning::UnreachableDestination(destination));
                Ok(None)
            }
        }
    }

    /// Stops ordered exactly: the configured limit, clamped so the start
    /// plus every stop still fits the Held-Karp table
    fn exact_limit(&self) -> usize {
        self.config
            .max_exact_waypoints
            .min(HeldKarp::MAX_WAYPOINTS - 1)
    }

    /// One access point per relevant shelf: the walkable orthogonal
    /// neighbour closest to the start, first found on ties. Shelves with no
    /// reachable neighbour are dropped.
    fn select_access_points(
        &self,
        oracle: &dyn DistanceOracle,
        start_index: CellIndex,
        shopping_list: &ShoppingList,
        warnings: &mut Vec<RouteWarning>,
    ) -> Vec<ProductWaypoint> {
        let mut stops = Vec::new();

        for cell in shopping_list.find_relevant_cells(self.floor_plan) {
            let shelf = Position::new(cell.row, cell.col);
            let product_ids = shopping_list.matching_products(cell);

            let mut best: Option<(Position, CellIndex, Cost)> = None;
            for candidate in self.floor_plan.walkable_orthogonal_neighbors(shelf) {
                let index = self.index(candidate);
                let cost = oracle.distance(start_index, index);
                if cost.is_finite() && best.map_or(true, |(_, _, c)| cost < c) {
                    best = Some((candidate, index, cost));
                }
            }

            match best {
                Some((access, access_index, cost)) => {
                    debug!(
                        "shelf {} reached from {} at distance {:.3}",
                        shelf, access, cost
                    );
                    stops.push(ProductWaypoint {
                        shelf,
                        access,
                        access_index,
                        product_ids,
                    });
                }
                None => {
                    warn!("shelf {} has no reachable access point", shelf);
                    warnings.push(RouteWarning::UnreachableProduct { shelf, product_ids });
                }
            }
        }

        stops
    }

    /// The cell itself if walkable, otherwise its first walkable orthogonal neighbour
    fn standing_cell(&self, pos: Position) -> Option<Position> {
        if self.floor_plan.is_walkable(pos) {
            return Some(pos);
        }
        self.floor_plan
            .walkable_orthogonal_neighbors(pos)
            .into_iter()
            .next()
    }

    fn index(&self, pos: Position) -> CellIndex {
        pos.row * self.floor_plan.cols() + pos.col
    }
}

/// Plans a route with the default configuration
pub fn optimize_route(
    floor_plan: &FloorPlan,
    path_data: Option<&PathData>,
    entrance: Option<Position>,
    destination: Option<Position>,
    shopping_list: &ShoppingList,
) -> Result<Route> {
    RoutePlanner::new(floor_plan, path_data)?.plan(entrance, destination, shopping_list)
}

// Integration tests for the traversal graph and the all-pairs matrices
use store_path_planner::models::{CellKind, FloorPlan, PathData, Position};
use store_path_planner::utils::graph::{build_graph, TraversalGraph};
use store_path_planner::utils::init_layout::random_layout;
use store_path_planner::utils::path::walk_next_hops;
use store_path_planner::{compute_all_pairs, PlannerError};

const EPSILON: f64 = 1e-9;

fn sample_layouts() -> Vec<FloorPlan> {
    let mut layouts: Vec<FloorPlan> = (0..4)
        .map(|seed| random_layout(7, 9, 0.6, 5, seed))
        .collect();

    // Irregular blocks of shelves, including a sealed-off pocket
    layouts.push(
        FloorPlan::from_ascii(
            "E.a.##..
             ....##.b
             C...##..",
        )
        .unwrap(),
    );
    layouts
}

fn compute(floor_plan: &FloorPlan) -> (TraversalGraph, PathData) {
    let graph = build_graph(floor_plan);
    let data = compute_all_pairs(&graph);
    (graph, data)
}

#[test]
fn test_no_edges_between_shelves() {
    for plan in sample_layouts() {
        let (graph, _) = compute(&plan);
        for (from, to, weight) in graph.edges() {
            assert!(
                !(plan.cell_at(from).is_product() && plan.cell_at(to).is_product()),
                "edge between shelves {} -> {}",
                plan.position_of(from),
                plan.position_of(to)
            );
            let (a, b) = (plan.position_of(from), plan.position_of(to));
            assert!(a.is_adjacent(&b));
            let expected = if a.row != b.row && a.col != b.col {
                std::f64::consts::SQRT_2
            } else {
                1.0
            };
            assert_eq!(weight, expected);
        }
    }
}

#[test]
fn test_distances_are_symmetric() {
    for plan in sample_layouts() {
        let (_, data) = compute(&plan);
        let n = data.node_count();
        for i in 0..n {
            assert_eq!(data.distance(i, i), 0.0);
            for j in 0..n {
                let (forward, backward) = (data.distance(i, j), data.distance(j, i));
                if forward.is_finite() || backward.is_finite() {
                    assert!(
                        (forward - backward).abs() < EPSILON,
                        "dist({}, {}) = {} but dist({}, {}) = {}",
                        i,
                        j,
                        forward,
                        j,
                        i,
                        backward
                    );
                }
            }
        }
    }
}

#[test]
fn test_triangle_inequality() {
    for plan in sample_layouts() {
        let (_, data) = compute(&plan);
        let n = data.node_count();
        for i in 0..n {
            for k in 0..n {
                let via_first = data.distance(i, k);
                if !via_first.is_finite() {
                    continue;
                }
                for j in 0..n {
                    let direct = data.distance(i, j);
                    let detour = via_first + data.distance(k, j);
                    assert!(direct <= detour + EPSILON);
                }
            }
        }
    }
}

#[test]
fn test_next_hops_follow_shortest_paths() {
    for plan in sample_layouts() {
        let (graph, data) = compute(&plan);
        let n = data.node_count();
        for i in 0..n {
            for j in 0..n {
                if !data.is_reachable(i, j) {
                    assert_eq!(data.next_hop(i, j), None);
                    continue;
                }
                let hops = walk_next_hops(&data, i, j).expect("finite distance has a hop chain");
                let mut current = i;
                let mut walked = 0.0;
                for &hop in &hops {
                    walked += graph
                        .edge_weight(current, hop)
                        .expect("every hop is a graph edge");
                    current = hop;
                }
                assert_eq!(current, j);
                assert!((walked - data.distance(i, j)).abs() < EPSILON);
            }
        }
    }
}

#[test]
fn test_sealed_pocket_is_unreachable() {
    let plan = FloorPlan::from_ascii(
        "E.a.##..
         ....##.b
         C...##..",
    )
    .unwrap();
    let (_, data) = compute(&plan);
    let entrance = plan.index_of(Position::new(0, 0)).unwrap();
    let pocket = plan.index_of(Position::new(1, 6)).unwrap();
    let register = plan.index_of(Position::new(2, 0)).unwrap();

    assert!(!data.is_reachable(entrance, pocket));
    assert!(!data.is_reachable(pocket, entrance));
    assert!(data.is_reachable(entrance, register));
}

#[test]
fn test_path_data_tracks_layout_changes() {
    let mut plan = random_layout(6, 7, 0.5, 3, 11);
    let (_, data) = compute(&plan);
    assert!(data.ensure_matches(&plan).is_ok());

    plan.set_kind(Position::new(0, 3), CellKind::Products).unwrap();
    match data.ensure_matches(&plan) {
        Err(PlannerError::PathDataMismatch { .. }) => {}
        other => panic!("expected a mismatch, got {:?}", other),
    }

    let json = data.to_json().unwrap();
    let restored = PathData::from_json(&json).unwrap();
    assert_eq!(restored, data);
}

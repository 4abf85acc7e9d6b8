//! Unit tests for nav-route.
//!
//! Fixed scenarios use hand-crafted graphs; the property checks run over
//! seeded random graphs so every run sees the same inputs.

#[cfg(test)]
mod helpers {
    use nav_core::{BuildingId, GeoPoint, NodeId};
    use nav_graph::{GraphBuilder, GraphStore, NodeKind};
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    /// Nodes 1:(0,0) 2:(0,1) 3:(1,1); edges 1-2 w1, 2-3 w1, 1-3 w5;
    /// building B1 enters at node 3.
    pub fn triangle() -> GraphStore {
        let mut b = GraphBuilder::new();
        let n1 = b.add_node(NodeId(1), GeoPoint::new(0.0, 0.0), NodeKind::Waypoint);
        let n2 = b.add_node(NodeId(2), GeoPoint::new(0.0, 1.0), NodeKind::Waypoint);
        let n3 = b.add_node(NodeId(3), GeoPoint::new(1.0, 1.0), NodeKind::BuildingEntrance);
        b.add_path(n1, n2, 1.0);
        b.add_path(n2, n3, 1.0);
        b.add_path(n1, n3, 5.0);
        b.add_building(BuildingId(1), "B1", n3);
        b.build().unwrap()
    }

    /// Random undirected graph with integer weights (sums stay exact).
    ///
    /// Node ids are a shuffled, gapped range so slot order and insertion
    /// order differ.
    pub fn random_graph(seed: u64, nodes: usize, edges: usize) -> (GraphStore, Vec<NodeId>) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut ids: Vec<NodeId> = (0..nodes as u32).map(|i| NodeId(i * 3 + 10)).collect();
        ids.shuffle(&mut rng);

        let mut b = GraphBuilder::new();
        for &id in &ids {
            let pos = GeoPoint::new(rng.gen_range(7.25..7.26), rng.gen_range(80.59..80.60));
            b.add_node(id, pos, NodeKind::Waypoint);
        }
        for _ in 0..edges {
            let a = ids[rng.gen_range(0..nodes)];
            let c = ids[rng.gen_range(0..nodes)];
            if a != c {
                b.add_path(a, c, rng.gen_range(0..20) as f64);
            }
        }
        (b.build().unwrap(), ids)
    }

    /// All-pairs reference distances (Floyd–Warshall), indexed by slot.
    pub fn all_pairs(graph: &GraphStore) -> Vec<Vec<f64>> {
        let n = graph.node_count();
        let mut d = vec![vec![f64::INFINITY; n]; n];
        for (i, row) in d.iter_mut().enumerate() {
            row[i] = 0.0;
            for (j, w) in graph.neighbors_at(i) {
                row[j] = row[j].min(w);
            }
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    let via = d[i][k] + d[k][j];
                    if via < d[i][j] {
                        d[i][j] = via;
                    }
                }
            }
        }
        d
    }
}

// ── Fixed scenarios ───────────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use nav_core::{BuildingId, GeoPoint, NodeId};
    use nav_graph::{GraphBuilder, NodeKind};

    use crate::{DijkstraRouter, Route, RouteError, Router, shortest_path, shortest_path_to_building};

    #[test]
    fn trivial_same_node() {
        let g = super::helpers::triangle();
        let r = shortest_path(&g, NodeId(2), NodeId(2)).unwrap();
        assert_eq!(r, Route::trivial(NodeId(2)));
        assert!(r.is_trivial());
        assert_eq!(r.total_distance, 0.0);
        assert_eq!(r.nodes, vec![NodeId(2)]);
    }

    #[test]
    fn prefers_two_short_edges_over_direct_long_edge() {
        let g = super::helpers::triangle();
        let r = shortest_path(&g, NodeId(1), NodeId(3)).unwrap();
        assert_eq!(r.nodes, vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(r.total_distance, 2.0);
        assert_eq!(r.edge_count, 2);
        assert_eq!(r.start(), NodeId(1));
        assert_eq!(r.goal(), NodeId(3));
    }

    #[test]
    fn building_route_matches_entry_node_route() {
        let g = super::helpers::triangle();
        let to_building = shortest_path_to_building(&g, NodeId(1), BuildingId(1)).unwrap();
        let to_node = shortest_path(&g, NodeId(1), NodeId(3)).unwrap();
        assert_eq!(to_building, to_node);
    }

    #[test]
    fn unknown_endpoints_fail_before_search() {
        let g = super::helpers::triangle();
        assert_eq!(
            shortest_path(&g, NodeId(9), NodeId(1)),
            Err(RouteError::UnknownNode(NodeId(9)))
        );
        assert_eq!(
            shortest_path(&g, NodeId(1), NodeId(9)),
            Err(RouteError::UnknownNode(NodeId(9)))
        );
        // Unknown start is reported even when start == goal.
        assert_eq!(
            shortest_path(&g, NodeId(9), NodeId(9)),
            Err(RouteError::UnknownNode(NodeId(9)))
        );
    }

    #[test]
    fn unknown_building() {
        let g = super::helpers::triangle();
        assert_eq!(
            DijkstraRouter.shortest_path_to_building(&g, NodeId(1), BuildingId(4)),
            Err(RouteError::UnknownBuilding(BuildingId(4)))
        );
    }

    #[test]
    fn no_route_disconnected() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(NodeId(1), GeoPoint::new(0.0, 0.0), NodeKind::Waypoint);
        let c = b.add_node(NodeId(2), GeoPoint::new(0.0, 0.1), NodeKind::Waypoint);
        let d = b.add_node(NodeId(3), GeoPoint::new(1.0, 0.0), NodeKind::Waypoint);
        b.add_path(a, c, 1.0);
        let g = b.build().unwrap();
        for _ in 0..3 {
            assert_eq!(
                shortest_path(&g, a, d),
                Err(RouteError::NoRoute { start: a, goal: d })
            );
        }
    }

    #[test]
    fn directed_one_way_blocks_return() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(NodeId(1), GeoPoint::new(0.0, 0.0), NodeKind::Waypoint);
        let c = b.add_node(NodeId(2), GeoPoint::new(0.0, 1.0), NodeKind::Waypoint);
        b.add_directed_edge(a, c, 4.0);
        let g = b.build().unwrap();
        assert!(shortest_path(&g, a, c).is_ok());
        assert!(matches!(shortest_path(&g, c, a), Err(RouteError::NoRoute { .. })));
    }

    #[test]
    fn equal_cost_paths_pick_lowest_predecessor() {
        // Diamond 1→{2,3}→4, every edge weight 1.  Insert edges in two
        // different orders; the route must not change.
        for reversed in [false, true] {
            let mut b = GraphBuilder::new();
            for id in 1..=4 {
                b.add_node(NodeId(id), GeoPoint::new(0.0, id as f64 * 0.001), NodeKind::Waypoint);
            }
            let mut edges = vec![(1, 2), (2, 4), (1, 3), (3, 4)];
            if reversed {
                edges.reverse();
            }
            for (x, y) in edges {
                b.add_path(NodeId(x), NodeId(y), 1.0);
            }
            let g = b.build().unwrap();
            let r = shortest_path(&g, NodeId(1), NodeId(4)).unwrap();
            assert_eq!(r.nodes, vec![NodeId(1), NodeId(2), NodeId(4)]);
        }
    }

    #[test]
    fn later_settled_lower_predecessor_wins_tie() {
        // 1→5→9 costs 1+1, 1→2→9 costs 1.5+0.5.  Node 5 settles before
        // node 2, but 2 is the lower id.
        let mut b = GraphBuilder::new();
        for id in [1, 2, 5, 9] {
            b.add_node(NodeId(id), GeoPoint::new(0.0, id as f64 * 0.001), NodeKind::Waypoint);
        }
        b.add_path(NodeId(1), NodeId(5), 1.0);
        b.add_path(NodeId(5), NodeId(9), 1.0);
        b.add_path(NodeId(1), NodeId(2), 1.5);
        b.add_path(NodeId(2), NodeId(9), 0.5);
        let g = b.build().unwrap();
        let r = shortest_path(&g, NodeId(1), NodeId(9)).unwrap();
        assert_eq!(r.nodes, vec![NodeId(1), NodeId(2), NodeId(9)]);
        assert_eq!(r.total_distance, 2.0);
    }

    #[test]
    fn rounding_noise_counts_as_a_tie() {
        // 0.1 + 0.2 != 0.3 in floating point; both paths are the same length.
        let mut b = GraphBuilder::new();
        for id in [1, 2, 5, 9] {
            b.add_node(NodeId(id), GeoPoint::new(0.0, id as f64 * 0.001), NodeKind::Waypoint);
        }
        b.add_path(NodeId(1), NodeId(2), 0.1);
        b.add_path(NodeId(2), NodeId(9), 0.2);
        b.add_path(NodeId(1), NodeId(5), 0.3);
        b.add_path(NodeId(5), NodeId(9), 0.0);
        let g = b.build().unwrap();
        let r = shortest_path(&g, NodeId(1), NodeId(9)).unwrap();
        assert_eq!(r.nodes, vec![NodeId(1), NodeId(2), NodeId(9)]);
        assert!((r.total_distance - 0.3).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_edges() {
        let mut b = GraphBuilder::new();
        for id in 1..=3 {
            b.add_node(NodeId(id), GeoPoint::new(0.0, id as f64 * 0.001), NodeKind::Waypoint);
        }
        b.add_path(NodeId(1), NodeId(2), 0.0);
        b.add_path(NodeId(2), NodeId(3), 0.0);
        let g = b.build().unwrap();
        let r = shortest_path(&g, NodeId(1), NodeId(3)).unwrap();
        assert_eq!(r.nodes, vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(r.total_distance, 0.0);
        assert!(!r.is_trivial());
    }

    #[test]
    fn huge_weights_still_route() {
        let mut b = GraphBuilder::new();
        for id in 1..=3 {
            b.add_node(NodeId(id), GeoPoint::new(0.0, id as f64 * 0.001), NodeKind::Waypoint);
        }
        b.add_path(NodeId(1), NodeId(2), 1e307);
        b.add_path(NodeId(2), NodeId(3), 1e307);
        let g = b.build().unwrap();
        let r = shortest_path(&g, NodeId(1), NodeId(3)).unwrap();
        assert_eq!(r.nodes, vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(r.total_distance, 2e307);
    }

    #[test]
    fn coordinates_follow_route() {
        let g = super::helpers::triangle();
        let r = shortest_path(&g, NodeId(1), NodeId(3)).unwrap();
        let coords = r.coordinates(&g).unwrap();
        assert_eq!(
            coords,
            vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0), GeoPoint::new(1.0, 1.0)]
        );
    }

    #[test]
    fn walking_time() {
        let g = super::helpers::triangle();
        let r = shortest_path(&g, NodeId(1), NodeId(3)).unwrap();
        assert!((r.walking_secs(crate::WALKING_SPEED_MPS) - 2.0 / 1.4).abs() < 1e-12);
    }
}

// ── Properties over random graphs ─────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use crate::{RouteError, shortest_path};

    const SEEDS: [u64; 6] = [1, 7, 42, 99, 2024, 31337];

    #[test]
    fn matches_all_pairs_reference() {
        for seed in SEEDS {
            let (g, _) = super::helpers::random_graph(seed, 25, 40);
            let reference = super::helpers::all_pairs(&g);
            for a in 0..g.node_count() {
                for c in 0..g.node_count() {
                    let (start, goal) = (g.node_at(a).id, g.node_at(c).id);
                    match shortest_path(&g, start, goal) {
                        Ok(r) => {
                            assert_eq!(r.total_distance, reference[a][c], "seed {seed}");
                            assert_eq!(r.start(), start);
                            assert_eq!(r.goal(), goal);
                            assert_eq!(r.edge_count + 1, r.nodes.len());
                        }
                        Err(RouteError::NoRoute { .. }) => {
                            assert!(reference[a][c].is_infinite(), "seed {seed}");
                        }
                        Err(e) => panic!("unexpected error {e}"),
                    }
                }
            }
        }
    }

    #[test]
    fn route_weights_sum_to_total() {
        for seed in SEEDS {
            let (g, ids) = super::helpers::random_graph(seed, 20, 45);
            for &a in &ids {
                for &c in &ids {
                    let Ok(r) = shortest_path(&g, a, c) else { continue };
                    let sum: f64 = r
                        .nodes
                        .windows(2)
                        .map(|w| {
                            g.neighbors(w[0])
                                .unwrap()
                                .find(|&(n, _)| n == w[1])
                                .map(|(_, wt)| wt)
                                .unwrap()
                        })
                        .sum();
                    assert_eq!(sum, r.total_distance);
                }
            }
        }
    }

    #[test]
    fn symmetric_on_undirected_graphs() {
        for seed in SEEDS {
            let (g, ids) = super::helpers::random_graph(seed, 20, 35);
            for &a in &ids {
                for &c in &ids {
                    let fwd = shortest_path(&g, a, c).map(|r| r.total_distance);
                    let rev = shortest_path(&g, c, a).map(|r| r.total_distance);
                    assert_eq!(fwd.is_ok(), rev.is_ok());
                    if let (Ok(x), Ok(y)) = (fwd, rev) {
                        assert_eq!(x, y);
                    }
                }
            }
        }
    }

    #[test]
    fn triangle_inequality() {
        for seed in SEEDS {
            let (g, ids) = super::helpers::random_graph(seed, 15, 30);
            let dist = |a, c| shortest_path(&g, a, c).map(|r| r.total_distance).unwrap_or(f64::INFINITY);
            for &a in &ids {
                for &b in &ids {
                    for &c in &ids {
                        assert!(dist(a, c) <= dist(a, b) + dist(b, c));
                    }
                }
            }
        }
    }

    #[test]
    fn repeated_queries_are_identical() {
        for seed in SEEDS {
            let (g, ids) = super::helpers::random_graph(seed, 20, 60);
            for &a in &ids {
                for &c in &ids {
                    assert_eq!(shortest_path(&g, a, c), shortest_path(&g, a, c));
                }
            }
        }
    }

    #[test]
    fn self_routes_are_trivial() {
        for seed in SEEDS {
            let (g, ids) = super::helpers::random_graph(seed, 10, 10);
            for &a in &ids {
                let r = shortest_path(&g, a, a).unwrap();
                assert_eq!(r.nodes, vec![a]);
                assert_eq!(r.total_distance, 0.0);
            }
        }
    }
}

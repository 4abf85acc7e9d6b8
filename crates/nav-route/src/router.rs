//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `nav-session` calls routing via the [`Router`] trait, so a kiosk can swap
//! in another search (A*, precomputed tables) without touching the session.
//! Any replacement must return the same minimum total weight as
//! [`DijkstraRouter`].
//!
//! # Determinism
//!
//! The frontier pops the smallest tentative cost first and breaks exact
//! ties by lowest `NodeId`.  When two ways of reaching a node cost the same
//! to within [`COST_EPSILON`], the one arriving from the lower `NodeId` is
//! kept, so repeated queries always return the same node sequence even when
//! several shortest paths exist.  The epsilon only picks between
//! equal-cost alternatives; the reported total is always the exact minimum.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;

use nav_core::{BuildingId, GeoPoint, NodeId};
use nav_graph::{GraphResult, GraphStore};

use crate::{RouteError, RouteResult};

/// Costs closer than this are treated as equal when choosing between
/// alternative predecessors.
pub const COST_EPSILON: f64 = 1e-9;

/// Average walking speed used by [`Route::walking_secs`].
pub const WALKING_SPEED_MPS: f64 = 1.4;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes to visit in order; first is the start, last is the goal.
    pub nodes: Vec<NodeId>,
    /// Sum of the edge weights along `nodes`.
    pub total_distance: f64,
    /// Number of edges traversed (`nodes.len() - 1`).
    pub edge_count: usize,
}

impl Route {
    /// The zero-length route from `node` to itself.
    pub fn trivial(node: NodeId) -> Self {
        Self { nodes: vec![node], total_distance: 0.0, edge_count: 0 }
    }

    /// `true` if the start and goal are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edge_count == 0
    }

    pub fn start(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn goal(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Coordinates of every node along the route, for drawing a polyline.
    pub fn coordinates(&self, graph: &GraphStore) -> GraphResult<Vec<GeoPoint>> {
        self.nodes.iter().map(|&n| graph.node_pos(n)).collect()
    }

    /// Walking time in seconds at `speed_mps`, assuming weights are metres.
    pub fn walking_secs(&self, speed_mps: f64) -> f64 {
        self.total_distance / speed_mps
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
pub trait Router {
    /// Compute a minimum-weight route from `start` to `goal`.
    ///
    /// `start == goal` yields [`Route::trivial`] rather than an error.
    fn shortest_path(&self, graph: &GraphStore, start: NodeId, goal: NodeId) -> RouteResult<Route>;

    /// Route from `start` to the entry node of `building`.
    fn shortest_path_to_building(
        &self,
        graph:    &GraphStore,
        start:    NodeId,
        building: BuildingId,
    ) -> RouteResult<Route> {
        let goal = graph.entry_node(building)?;
        self.shortest_path(graph, start, goal)
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Dijkstra's algorithm over the CSR campus graph.
///
/// Edge weights are non-negative by construction (the graph store rejects
/// anything else), so the first time the goal leaves the frontier its cost
/// is optimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn shortest_path(&self, graph: &GraphStore, start: NodeId, goal: NodeId) -> RouteResult<Route> {
        shortest_path(graph, start, goal)
    }
}

/// Minimum-weight route from `start` to `goal`.
///
/// Fails with [`RouteError::UnknownNode`] before searching if either end is
/// absent, and with [`RouteError::NoRoute`] when the goal is unreachable.
pub fn shortest_path(graph: &GraphStore, start: NodeId, goal: NodeId) -> RouteResult<Route> {
    let from = graph.slot(start).ok_or(RouteError::UnknownNode(start))?;
    let to   = graph.slot(goal).ok_or(RouteError::UnknownNode(goal))?;

    if from == to {
        return Ok(Route::trivial(start));
    }

    dijkstra(graph, from, to).ok_or(RouteError::NoRoute { start, goal })
}

/// Minimum-weight route from `start` to the entry node of `building`.
pub fn shortest_path_to_building(
    graph:    &GraphStore,
    start:    NodeId,
    building: BuildingId,
) -> RouteResult<Route> {
    DijkstraRouter.shortest_path_to_building(graph, start, building)
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

const NO_PREV: usize = usize::MAX;

/// Frontier entry.  Ordered so `BinaryHeap` (a max-heap) pops the smallest
/// cost first, then the lowest slot.
#[derive(Copy, Clone, Debug)]
struct Frontier {
    cost: f64,
    slot: usize,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.slot.cmp(&self.slot))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

fn dijkstra(graph: &GraphStore, from: usize, to: usize) -> Option<Route> {
    let n = graph.node_count();
    // dist[v] = best known cost to reach v.
    let mut dist    = vec![f64::INFINITY; n];
    // prev[v] = slot v was reached from; NO_PREV for the start and unreached nodes.
    let mut prev    = vec![NO_PREV; n];
    let mut settled = vec![false; n];

    dist[from] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(Frontier { cost: 0.0, slot: from });

    while let Some(Frontier { cost, slot }) = heap.pop() {
        if settled[slot] {
            continue;
        }
        settled[slot] = true;

        if slot == to {
            return Some(reconstruct(graph, &prev, to, cost));
        }

        for (next, weight) in graph.neighbors_at(slot) {
            if settled[next] {
                continue;
            }
            let candidate = cost + weight;
            let best      = dist[next];

            let improves  = candidate < best - COST_EPSILON;
            let equal     = !improves && (candidate - best).abs() <= COST_EPSILON;
            if improves || (equal && slot < prev[next]) {
                prev[next] = slot;
            }
            if candidate < best {
                dist[next] = candidate;
                heap.push(Frontier { cost: candidate, slot: next });
            }
        }
    }

    debug!(
        "frontier exhausted: {} unreachable from {}",
        graph.node_at(to).id,
        graph.node_at(from).id
    );
    None
}

fn reconstruct(graph: &GraphStore, prev: &[usize], to: usize, total: f64) -> Route {
    let mut nodes = Vec::new();
    let mut cur = to;
    loop {
        nodes.push(graph.node_at(cur).id);
        let p = prev[cur];
        if p == NO_PREV {
            break;
        }
        cur = p;
    }
    nodes.reverse();
    let edge_count = nodes.len() - 1;
    Route { nodes, total_distance: total, edge_count }
}

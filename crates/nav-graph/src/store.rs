//! Campus path graph representation and builder.
//!
//! # Data layout
//!
//! Nodes are stored sorted by `NodeId`; a node's position in that order is
//! its *slot*.  Because slots follow id order, "lowest slot" and "lowest
//! `NodeId`" are the same thing, which keeps every tie-break in the router
//! and the spatial index a plain integer comparison.
//!
//! Outgoing adjacency uses **Compressed Sparse Row (CSR)** format.  Given a
//! slot `s`, its outgoing entries occupy:
//!
//! ```text
//! adj_to[ out_start[s] .. out_start[s+1] ]
//! ```
//!
//! Each `(from, to)` pair appears at most once, carrying the minimum weight
//! of every edge that connects it, and entries within a row are sorted by
//! target slot.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over unit-sphere positions answers nearest-node
//! queries.  Chord distance on the unit sphere is monotonic in great-circle
//! distance, so the R-tree's Euclidean nearest neighbour is the great-circle
//! nearest neighbour up to rounding.  Chord lengths between metre-apart
//! points carry too much rounding noise to compare for ties, so the R-tree
//! only supplies candidates; the final choice is made on haversine metres.

use std::collections::BTreeMap;

use log::info;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use nav_core::{BuildingId, GeoPoint, NodeId, EARTH_RADIUS_M};

use crate::{GraphError, GraphResult, LoadError, LoadResult};

/// Snapping candidates whose great-circle distances differ by no more than
/// this many metres are equidistant; the lowest `NodeId` among them wins.
pub const SNAP_TIE_M: f64 = 1e-6;
/// Rounding noise in a chord length computed from f64 unit vectors.
const CHORD_NOISE: f64 = 1e-14;

// ── Node / Building ───────────────────────────────────────────────────────────

/// What a graph node represents on the ground.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A point along a walkway.
    #[default]
    #[serde(alias = "Waypoint")]
    Waypoint,
    /// The door a building is entered through.
    #[serde(alias = "BuildingEntrance")]
    BuildingEntrance,
}

/// A point in the campus path graph.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Node {
    pub id:   NodeId,
    pub pos:  GeoPoint,
    pub kind: NodeKind,
}

/// A campus building, reachable through its entry node.
#[derive(Clone, Debug, PartialEq)]
pub struct Building {
    pub id:    BuildingId,
    pub name:  String,
    pub entry: NodeId,
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a unit-sphere point with the
/// slot of the node it came from.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 3],
    slot:  u32,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared chord length between two unit-sphere points.
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── GraphStore ────────────────────────────────────────────────────────────────

/// Validated, immutable campus path graph plus a spatial index for snapping
/// coordinates to nodes.
///
/// Do not construct directly; use [`GraphBuilder`] or
/// [`GraphStore::load`](crate::GraphStore::load).
pub struct GraphStore {
    // ── Node data (indexed by slot) ───────────────────────────────────────
    nodes:   Vec<Node>,
    slot_of: FxHashMap<NodeId, u32>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Length = `node_count + 1`.
    out_start:  Vec<u32>,
    adj_to:     Vec<u32>,
    adj_weight: Vec<f64>,

    // ── Buildings (sorted by id) ──────────────────────────────────────────
    buildings:     Vec<Building>,
    building_slot: FxHashMap<BuildingId, u32>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl GraphStore {
    /// Construct a store with no nodes, edges, or buildings.
    ///
    /// Every spatial query against it fails with [`GraphError::EmptyGraph`].
    pub fn empty() -> Self {
        Self {
            nodes:         Vec::new(),
            slot_of:       FxHashMap::default(),
            out_start:     vec![0],
            adj_to:        Vec::new(),
            adj_weight:    Vec::new(),
            buildings:     Vec::new(),
            building_slot: FxHashMap::default(),
            spatial_idx:   RTree::new(),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed adjacency entries (an undirected edge counts twice).
    pub fn edge_count(&self) -> usize {
        self.adj_to.len()
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Node lookup ───────────────────────────────────────────────────────

    /// All nodes in ascending `NodeId` order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slot_of.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> GraphResult<&Node> {
        self.slot(id)
            .map(|s| &self.nodes[s])
            .ok_or(GraphError::UnknownNode(id))
    }

    pub fn node_pos(&self, id: NodeId) -> GraphResult<GeoPoint> {
        self.node(id).map(|n| n.pos)
    }

    // ── Slot-level access (router hot path) ───────────────────────────────

    /// Dense slot of `id`, or `None` if the node is absent.
    #[inline]
    pub fn slot(&self, id: NodeId) -> Option<usize> {
        self.slot_of.get(&id).map(|&s| s as usize)
    }

    /// Node stored at `slot`.
    ///
    /// # Panics
    /// Panics if `slot >= node_count()`.
    #[inline]
    pub fn node_at(&self, slot: usize) -> &Node {
        &self.nodes[slot]
    }

    /// `(target slot, weight)` for every outgoing entry of `slot`, in
    /// ascending target order.  A contiguous scan; no allocation.
    #[inline]
    pub fn neighbors_at(&self, slot: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let start = self.out_start[slot] as usize;
        let end   = self.out_start[slot + 1] as usize;
        (start..end).map(move |i| (self.adj_to[i] as usize, self.adj_weight[i]))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// `(neighbour, weight)` for every node directly reachable from `node`.
    pub fn neighbors(
        &self,
        node: NodeId,
    ) -> GraphResult<impl Iterator<Item = (NodeId, f64)> + '_> {
        let slot = self.slot(node).ok_or(GraphError::UnknownNode(node))?;
        Ok(self
            .neighbors_at(slot)
            .map(move |(to, w)| (self.nodes[to].id, w)))
    }

    pub fn out_degree(&self, node: NodeId) -> GraphResult<usize> {
        let slot = self.slot(node).ok_or(GraphError::UnknownNode(node))?;
        Ok((self.out_start[slot + 1] - self.out_start[slot]) as usize)
    }

    // ── Buildings ─────────────────────────────────────────────────────────

    /// All buildings in ascending `BuildingId` order.
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn building(&self, id: BuildingId) -> GraphResult<&Building> {
        self.building_slot
            .get(&id)
            .map(|&s| &self.buildings[s as usize])
            .ok_or(GraphError::UnknownBuilding(id))
    }

    /// The node a building is entered through.
    pub fn entry_node(&self, id: BuildingId) -> GraphResult<NodeId> {
        self.building(id).map(|b| b.entry)
    }

    /// Case-insensitive lookup by display name.
    pub fn building_by_name(&self, name: &str) -> Option<&Building> {
        let name = name.trim();
        self.buildings
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node closest to `pos` by great-circle distance.
    ///
    /// Equidistant candidates resolve to the lowest `NodeId`.  Fails with
    /// [`GraphError::EmptyGraph`] only when the store has no nodes, and with
    /// [`GraphError::InvalidCoordinate`] for NaN or infinite input.
    pub fn nearest_node(&self, pos: GeoPoint) -> GraphResult<NodeId> {
        if !pos.lat.is_finite() || !pos.lng.is_finite() {
            return Err(GraphError::InvalidCoordinate);
        }
        let query = pos.unit_vector();
        let mut candidates = self.spatial_idx.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best_d2) = candidates.next().ok_or(GraphError::EmptyGraph)?;

        // Chord length never grows faster than arc length, so every node
        // within SNAP_TIE_M of the nearest lies inside this chord radius.
        let reach = best_d2.sqrt() + SNAP_TIE_M / EARTH_RADIUS_M + CHORD_NOISE;
        let mut ranked = vec![(self.nodes[first.slot as usize].pos.distance_m(pos), first.slot)];
        for (entry, d2) in candidates {
            if d2.sqrt() > reach {
                break;
            }
            ranked.push((self.nodes[entry.slot as usize].pos.distance_m(pos), entry.slot));
        }

        let closest = ranked.iter().map(|&(m, _)| m).fold(f64::INFINITY, f64::min);
        let winner = ranked
            .iter()
            .filter(|&&(m, _)| m - closest <= SNAP_TIE_M)
            .map(|&(_, slot)| slot)
            .min()
            .unwrap_or(first.slot);
        Ok(self.nodes[winner as usize].id)
    }

    /// Up to `k` nodes nearest to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        if !pos.lat.is_finite() || !pos.lng.is_finite() {
            return Vec::new();
        }
        self.spatial_idx
            .nearest_neighbor_iter(&pos.unit_vector())
            .take(k)
            .map(|e| self.nodes[e.slot as usize].id)
            .collect()
    }
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// Collect nodes, edges, and buildings in any order, then call
/// [`build`](Self::build) to validate them and produce a [`GraphStore`].
///
/// # Example
///
/// ```
/// use nav_core::{GeoPoint, NodeId};
/// use nav_graph::{GraphBuilder, NodeKind};
///
/// let mut b = GraphBuilder::new();
/// let a = b.add_node(NodeId(1), GeoPoint::new(7.2523, 80.5925), NodeKind::Waypoint);
/// let c = b.add_node(NodeId(2), GeoPoint::new(7.2530, 80.5931), NodeKind::Waypoint);
/// b.add_path(a, c, 95.0);
/// let graph = b.build().unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
pub struct GraphBuilder {
    nodes:     Vec<Node>,
    raw_edges: Vec<RawEdge>,
    buildings: Vec<Building>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    /// `None` means "use the great-circle distance between the endpoints".
    weight:   Option<f64>,
    directed: bool,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new(), buildings: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
            buildings: Vec::new(),
        }
    }

    /// Add a node and return its id.
    pub fn add_node(&mut self, id: NodeId, pos: GeoPoint, kind: NodeKind) -> NodeId {
        self.nodes.push(Node { id, pos, kind });
        id
    }

    /// Add an edge.  `weight: None` falls back to the great-circle distance
    /// in metres between the endpoints.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: Option<f64>, directed: bool) {
        self.raw_edges.push(RawEdge { from, to, weight, directed });
    }

    /// Add a walkway usable in **both directions**.
    pub fn add_path(&mut self, a: NodeId, b: NodeId, weight: f64) {
        self.add_edge(a, b, Some(weight), false);
    }

    /// Add a one-way connection from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, weight: f64) {
        self.add_edge(from, to, Some(weight), true);
    }

    /// Add a two-way walkway weighted by its great-circle length.
    pub fn add_walkway(&mut self, a: NodeId, b: NodeId) {
        self.add_edge(a, b, None, false);
    }

    pub fn add_building(&mut self, id: BuildingId, name: impl Into<String>, entry: NodeId) {
        self.buildings.push(Building { id, name: name.into(), entry });
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder, validate every input, and produce a
    /// [`GraphStore`].
    ///
    /// Checks run nodes first, then edges in insertion order, then
    /// buildings, so the reported error is deterministic for a given input.
    pub fn build(self) -> LoadResult<GraphStore> {
        // ── Nodes ─────────────────────────────────────────────────────────
        if let Some(bad) = self.nodes.iter().find(|n| !n.pos.is_valid()) {
            return Err(LoadError::InvalidNodeCoordinate {
                node: bad.id,
                lat:  bad.pos.lat,
                lng:  bad.pos.lng,
            });
        }

        let mut nodes = self.nodes;
        nodes.sort_by_key(|n| n.id);
        if let Some(pair) = nodes.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(LoadError::DuplicateNodeId(pair[0].id));
        }
        let slot_of: FxHashMap<NodeId, u32> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i as u32))
            .collect();

        // ── Edges: keep the lightest weight per directed pair ─────────────
        let mut lightest: BTreeMap<(u32, u32), f64> = BTreeMap::new();
        for e in &self.raw_edges {
            if e.from == e.to {
                return Err(LoadError::SelfLoop(e.from));
            }
            let dangling = |missing| LoadError::DanglingEdgeReference { from: e.from, to: e.to, missing };
            let from = *slot_of.get(&e.from).ok_or_else(|| dangling(e.from))?;
            let to   = *slot_of.get(&e.to).ok_or_else(|| dangling(e.to))?;

            let weight = match e.weight {
                Some(w) => w,
                None => nodes[from as usize].pos.distance_m(nodes[to as usize].pos),
            };
            if !weight.is_finite() {
                return Err(LoadError::NonFiniteWeight { from: e.from, to: e.to });
            }
            if weight < 0.0 {
                return Err(LoadError::NegativeWeight { from: e.from, to: e.to, weight });
            }

            keep_lightest(&mut lightest, (from, to), weight);
            if !e.directed {
                keep_lightest(&mut lightest, (to, from), weight);
            }
        }

        if !lightest.values().sum::<f64>().is_finite() {
            return Err(LoadError::WeightOverflow);
        }

        // ── CSR arrays (BTreeMap iterates in (from, to) order) ────────────
        let node_count = nodes.len();
        let mut out_start = vec![0u32; node_count + 1];
        for &(from, _) in lightest.keys() {
            out_start[from as usize + 1] += 1;
        }
        for i in 1..=node_count {
            out_start[i] += out_start[i - 1];
        }
        let (adj_to, adj_weight): (Vec<u32>, Vec<f64>) =
            lightest.iter().map(|(&(_, to), &w)| (to, w)).unzip();
        debug_assert_eq!(out_start[node_count] as usize, adj_to.len());

        // ── Buildings ─────────────────────────────────────────────────────
        let mut buildings = self.buildings;
        buildings.sort_by_key(|b| b.id);
        if let Some(pair) = buildings.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(LoadError::DuplicateBuildingId(pair[0].id));
        }
        if let Some(b) = buildings.iter().find(|b| !slot_of.contains_key(&b.entry)) {
            return Err(LoadError::DanglingBuildingReference { building: b.id, node: b.entry });
        }
        let building_slot: FxHashMap<BuildingId, u32> = buildings
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id, i as u32))
            .collect();

        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| NodeEntry { point: n.pos.unit_vector(), slot: i as u32 })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        info!(
            "campus graph loaded: {} nodes, {} adjacency entries, {} buildings",
            node_count,
            adj_to.len(),
            buildings.len()
        );

        Ok(GraphStore {
            nodes,
            slot_of,
            out_start,
            adj_to,
            adj_weight,
            buildings,
            building_slot,
            spatial_idx,
        })
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn keep_lightest(map: &mut BTreeMap<(u32, u32), f64>, key: (u32, u32), weight: f64) {
    map.entry(key)
        .and_modify(|w| *w = w.min(weight))
        .or_insert(weight);
}

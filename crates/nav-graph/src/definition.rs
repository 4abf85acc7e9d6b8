//! Graph definition document and its loaders.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": 1, "lat": 7.25231, "lng": 80.59253, "kind": "waypoint" },
//!     { "id": 2, "lat": 7.25290, "lng": 80.59310, "kind": "building_entrance" }
//!   ],
//!   "edges": [
//!     { "from": 1, "to": 2, "weight": 95.0 },
//!     { "from": 2, "to": 1, "directed": true }
//!   ],
//!   "buildings": [
//!     { "id": 10, "name": "Library", "entryNodeId": 2 }
//!   ]
//! }
//! ```
//!
//! `kind` defaults to `waypoint`, `directed` to `false`.  An edge without a
//! `weight` is weighted by the great-circle distance between its endpoints
//! in metres.  `edges` and `buildings` may be omitted.
//!
//! # CSV format
//!
//! Three tables with headers:
//!
//! ```csv
//! id,lat,lng,kind
//! 1,7.25231,80.59253,waypoint
//! ```
//!
//! ```csv
//! from,to,weight,directed
//! 1,2,95.0,
//! 2,1,,true
//! ```
//!
//! ```csv
//! id,name,entryNodeId
//! 10,Library,2
//! ```
//!
//! Empty `kind`, `weight`, and `directed` cells take the same defaults as
//! the JSON form.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use nav_core::{BuildingId, GeoPoint, NodeId};

use crate::store::{GraphBuilder, GraphStore, NodeKind};
use crate::{LoadError, LoadResult};

// ── Document types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub id:   u32,
    pub lat:  f64,
    pub lng:  f64,
    #[serde(default)]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDef {
    pub from:     u32,
    pub to:       u32,
    #[serde(default)]
    pub weight:   Option<f64>,
    #[serde(default)]
    pub directed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingDef {
    pub id:            u32,
    pub name:          String,
    pub entry_node_id: u32,
}

/// A complete, not-yet-validated campus graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDefinition {
    pub nodes:     Vec<NodeDef>,
    #[serde(default)]
    pub edges:     Vec<EdgeDef>,
    #[serde(default)]
    pub buildings: Vec<BuildingDef>,
}

// ── CSV records (lenient about empty cells) ───────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:   u32,
    lat:  f64,
    lng:  f64,
    #[serde(default)]
    kind: Option<NodeKind>,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:     u32,
    to:       u32,
    #[serde(default)]
    weight:   Option<f64>,
    #[serde(default)]
    directed: Option<bool>,
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl GraphDefinition {
    /// Parse a JSON document from any `Read` source.
    pub fn from_json_reader<R: Read>(reader: R) -> LoadResult<Self> {
        serde_json::from_reader(reader).map_err(|e| LoadError::Parse(e.to_string()))
    }

    pub fn from_json_str(s: &str) -> LoadResult<Self> {
        serde_json::from_str(s).map_err(|e| LoadError::Parse(e.to_string()))
    }

    pub fn from_json_path(path: &Path) -> LoadResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    /// Parse the three CSV tables.  Pass `None` for `buildings` when the
    /// campus has no building bindings.
    pub fn from_csv_readers<N: Read, E: Read, B: Read>(
        nodes:     N,
        edges:     E,
        buildings: Option<B>,
    ) -> LoadResult<Self> {
        let nodes = csv::Reader::from_reader(nodes)
            .deserialize::<NodeRecord>()
            .map(|row| {
                let r = row.map_err(|e| LoadError::Parse(format!("nodes: {e}")))?;
                Ok(NodeDef { id: r.id, lat: r.lat, lng: r.lng, kind: r.kind.unwrap_or_default() })
            })
            .collect::<LoadResult<Vec<_>>>()?;

        let edges = csv::Reader::from_reader(edges)
            .deserialize::<EdgeRecord>()
            .map(|row| {
                let r = row.map_err(|e| LoadError::Parse(format!("edges: {e}")))?;
                Ok(EdgeDef {
                    from:     r.from,
                    to:       r.to,
                    weight:   r.weight,
                    directed: r.directed.unwrap_or(false),
                })
            })
            .collect::<LoadResult<Vec<_>>>()?;

        let buildings = match buildings {
            None => Vec::new(),
            Some(reader) => csv::Reader::from_reader(reader)
                .deserialize::<BuildingDef>()
                .map(|row| row.map_err(|e| LoadError::Parse(format!("buildings: {e}"))))
                .collect::<LoadResult<Vec<_>>>()?,
        };

        Ok(Self { nodes, edges, buildings })
    }

    /// Load `nodes.csv`, `edges.csv`, and (if present) `buildings.csv` from
    /// `dir`.
    pub fn from_csv_dir(dir: &Path) -> LoadResult<Self> {
        let nodes = std::fs::File::open(dir.join("nodes.csv"))?;
        let edges = std::fs::File::open(dir.join("edges.csv"))?;
        let buildings_path = dir.join("buildings.csv");
        let buildings = if buildings_path.exists() {
            Some(std::fs::File::open(buildings_path)?)
        } else {
            None
        };
        Self::from_csv_readers(nodes, edges, buildings)
    }

    /// Validate the document and build a [`GraphStore`].
    pub fn build(&self) -> LoadResult<GraphStore> {
        GraphStore::load(&self.nodes, &self.edges, &self.buildings)
    }
}

impl GraphStore {
    /// Validate raw node, edge, and building definitions and build the store.
    ///
    /// Fails with the [`LoadError`] variant matching the first malformed
    /// input.  An empty node list is accepted here; callers that need a
    /// routable graph reject it themselves.
    pub fn load(
        nodes:     &[NodeDef],
        edges:     &[EdgeDef],
        buildings: &[BuildingDef],
    ) -> LoadResult<GraphStore> {
        let mut b = GraphBuilder::with_capacity(nodes.len(), edges.len());
        for n in nodes {
            b.add_node(NodeId(n.id), GeoPoint::new(n.lat, n.lng), n.kind);
        }
        for e in edges {
            b.add_edge(NodeId(e.from), NodeId(e.to), e.weight, e.directed);
        }
        for bd in buildings {
            b.add_building(BuildingId(bd.id), bd.name.clone(), NodeId(bd.entry_node_id));
        }
        b.build()
    }
}

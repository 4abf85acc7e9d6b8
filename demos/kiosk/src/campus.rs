//! Embedded demo campus.
//!
//! A 9-node path graph laid out around the main gate used as the kiosk's
//! default position.  Both `kiosk` and `export_route` load it when no
//! graph file is given on the command line.

use std::path::Path;

use anyhow::{Context, Result};

use nav_graph::GraphDefinition;

/// Nodes, walkways, and buildings of the demo campus.  Walkways without a
/// `weight` are measured as great-circle metres.  Node 9 (the staff car
/// park) has no walkway, so routing there always fails.
pub const CAMPUS_JSON: &str = r#"{
  "nodes": [
    { "id": 1, "lat": 7.252310, "lng": 80.592530 },
    { "id": 2, "lat": 7.252800, "lng": 80.593100 },
    { "id": 3, "lat": 7.253400, "lng": 80.593600 },
    { "id": 4, "lat": 7.253950, "lng": 80.594100, "kind": "building_entrance" },
    { "id": 5, "lat": 7.253100, "lng": 80.594500, "kind": "building_entrance" },
    { "id": 6, "lat": 7.252200, "lng": 80.593800 },
    { "id": 7, "lat": 7.251800, "lng": 80.594400, "kind": "building_entrance" },
    { "id": 8, "lat": 7.254000, "lng": 80.592800, "kind": "building_entrance" },
    { "id": 9, "lat": 7.256000, "lng": 80.590000, "kind": "building_entrance" }
  ],
  "edges": [
    { "from": 1, "to": 2 },
    { "from": 2, "to": 3 },
    { "from": 3, "to": 4 },
    { "from": 3, "to": 5 },
    { "from": 2, "to": 6 },
    { "from": 6, "to": 7 },
    { "from": 6, "to": 5, "weight": 250.0 },
    { "from": 2, "to": 8 },
    { "from": 8, "to": 3, "weight": 40.0, "directed": true }
  ],
  "buildings": [
    { "id": 10, "name": "Library",          "entryNodeId": 4 },
    { "id": 11, "name": "Science Faculty",  "entryNodeId": 5 },
    { "id": 12, "name": "Exhibition Hall",  "entryNodeId": 7 },
    { "id": 13, "name": "Canteen",          "entryNodeId": 8 },
    { "id": 14, "name": "Staff Car Park",   "entryNodeId": 9 }
  ]
}"#;

/// Load the graph at `path`, or the embedded campus when `path` is `None`.
///
/// Directories are read as CSV tables; anything else as JSON.
pub fn load_definition(path: Option<&Path>) -> Result<GraphDefinition> {
    let def = match path {
        None => GraphDefinition::from_json_str(CAMPUS_JSON)?,
        Some(p) if p.is_dir() => GraphDefinition::from_csv_dir(p)
            .with_context(|| format!("loading CSV graph from {}", p.display()))?,
        Some(p) => GraphDefinition::from_json_path(p)
            .with_context(|| format!("loading JSON graph from {}", p.display()))?,
    };
    Ok(def)
}

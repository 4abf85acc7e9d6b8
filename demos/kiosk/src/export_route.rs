//! export_route — writes one route as GeoJSON for the web map to draw.
//!
//! Usage: `export_route <from-lat> <from-lng> <building name> [graph.json]`

mod campus;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde_json::json;

use nav_session::{NavigationSession, PositionAttempt, SessionConfig};

use campus::load_definition;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        bail!("usage: export_route <from-lat> <from-lng> <building name> [graph.json]");
    }
    let lat: f64 = args[0].parse().context("from-lat")?;
    let lng: f64 = args[1].parse().context("from-lng")?;
    let graph_path = args.get(3).map(PathBuf::from);

    let definition = load_definition(graph_path.as_deref())?;
    let mut session = NavigationSession::from_definition(SessionConfig::default(), &definition)?;

    let building = session
        .graph()
        .and_then(|g| g.building_by_name(&args[2]))
        .map(|b| b.id)
        .with_context(|| format!("no building named {:?}", args[2]))?;

    let route = session.request_route_to_building(PositionAttempt::fix(lat, lng), building)?;
    let graph = session.graph().context("session lost its graph")?;
    let line: Vec<[f64; 2]> = route
        .coordinates(graph)?
        .into_iter()
        .map(|p| [p.lng, p.lat]) // GeoJSON order
        .collect();

    let feature = json!({
        "type": "Feature",
        "geometry": { "type": "LineString", "coordinates": line },
        "properties": {
            "building": args[2],
            "nodes": route.nodes.iter().map(|n| n.0).collect::<Vec<_>>(),
            "totalDistance": route.total_distance,
            "edgeCount": route.edge_count,
        }
    });

    std::fs::create_dir_all("output/kiosk")?;
    let path = "output/kiosk/route.geojson";
    std::fs::write(path, serde_json::to_string_pretty(&feature)?)?;
    println!("Wrote {path} ({} points)", line.len());
    Ok(())
}

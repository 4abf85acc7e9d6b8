//! kiosk — drives a navigation session the way the kiosk's map view does.
//!
//! Usage: `kiosk [graph.json | graph_dir/] [session.json]`
//!
//! With no arguments the embedded demo campus and the default campus-entrance
//! fallback are used.  Set `RUST_LOG=debug` to watch the session's state
//! transitions.

mod campus;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Result;
use log::info;

use nav_core::NodeId;
use nav_graph::GraphStore;
use nav_route::{Route, WALKING_SPEED_MPS};
use nav_session::{
    Destination, NavError, NavigationSession, PositionAttempt, ResolvedPosition, RouteListener,
    SessionConfig,
};

use campus::load_definition;

/// Destination drawn as soon as the map opens.
const DEFAULT_DESTINATION: NodeId = NodeId(4);

// ── Renderer stand-in ─────────────────────────────────────────────────────────

/// Prints what a map renderer would draw.
struct ConsoleRenderer;

impl RouteListener for ConsoleRenderer {
    fn on_position(&mut self, position: &ResolvedPosition) {
        println!(
            "  marker at {} → start node {} ({:?})",
            position.coordinate, position.node.0, position.source
        );
    }

    fn on_route(&mut self, route: &Route, graph: &GraphStore) {
        let ids: Vec<String> = route.nodes.iter().map(|n| n.0.to_string()).collect();
        println!(
            "  route {}  ({:.0} m, {} edges, ~{:.0} s walk)",
            ids.join(" → "),
            route.total_distance,
            route.edge_count,
            route.walking_secs(WALKING_SPEED_MPS)
        );
        if let Ok(line) = route.coordinates(graph) {
            for p in line {
                println!("    {p}");
            }
        }
    }

    fn on_route_failed(&mut self, error: &NavError) {
        println!("  no route drawn: {error}");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let graph_path = args.next().map(PathBuf::from);
    let config = match args.next() {
        Some(p) => SessionConfig::from_json_reader(BufReader::new(File::open(p)?))?,
        None => SessionConfig::default(),
    };

    println!("=== kiosk — campus navigation ===");
    println!("Fallback position: {}", config.fallback);
    println!();

    // 1. Load the graph definition and open a session.
    let definition = load_definition(graph_path.as_deref())?;
    let mut session = NavigationSession::new(config);
    session.initialize(&definition)?;
    // The map view re-runs its setup on re-render; the second call is a no-op.
    session.initialize(&definition)?;
    session.set_listener(Box::new(ConsoleRenderer));

    let graph = session.graph().ok_or(NavError::NotInitialized)?;
    info!(
        "{} nodes, {} buildings",
        graph.node_count(),
        graph.building_count()
    );
    let buildings: Vec<_> = graph.buildings().iter().map(|b| (b.id, b.name.clone())).collect();

    // 2. Map opens: no location permission, route to the default destination.
    println!("Map opened (location denied), destination node {}:", DEFAULT_DESTINATION.0);
    report(session.request_route_from_position(PositionAttempt::Denied, DEFAULT_DESTINATION));
    println!();

    // 3. The visitor clicks each building in turn.
    for (id, name) in &buildings {
        println!("Clicked {name}:");
        report(session.on_building_click(*id));
        println!();
    }

    // 4. Two clicks race; the position for the first arrives last and wins.
    if let [(first, _), (second, _), ..] = buildings.as_slice() {
        println!("Overlapping requests:");
        let slow = session.begin_route(Destination::Building(*first))?;
        let fast = session.begin_route(Destination::Building(*second))?;
        report(session.complete_route(fast, PositionAttempt::TimedOut));
        report(session.complete_route(slow, PositionAttempt::fix(7.25280, 80.59310)));
        println!();
    }

    // 5. Summary.
    println!("Session state: {:?}", session.state());
    if let Some(route) = session.last_route() {
        println!(
            "Current route: node {} → node {} ({:.0} m)",
            route.start().0,
            route.goal().0,
            route.total_distance
        );
    }

    Ok(())
}

/// Request errors are shown to the visitor, not fatal to the kiosk.
fn report(result: Result<Route, NavError>) {
    if let Err(e) = result {
        info!("request failed: {e}");
    }
}

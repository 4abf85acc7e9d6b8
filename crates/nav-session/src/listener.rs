//! Callbacks the rendering layer registers with a session.

use nav_graph::GraphStore;
use nav_route::Route;

use crate::{NavError, ResolvedPosition};

/// Notifications delivered by a [`NavigationSession`](crate::NavigationSession)
/// whenever a request completes.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  A session holds one listener at a
/// time.
///
/// # Example — draw every new route
///
/// ```rust,ignore
/// struct Renderer { map: MapHandle }
///
/// impl RouteListener for Renderer {
///     fn on_route(&mut self, route: &Route, graph: &GraphStore) {
///         if let Ok(line) = route.coordinates(graph) {
///             self.map.draw_polyline(&line);
///         }
///     }
/// }
/// ```
pub trait RouteListener {
    /// A start position was resolved (called before `on_route`).
    fn on_position(&mut self, _position: &ResolvedPosition) {}

    /// A request completed and `route` is now the session's current route.
    fn on_route(&mut self, _route: &Route, _graph: &GraphStore) {}

    /// A request failed; the session's previous route is unchanged.
    fn on_route_failed(&mut self, _error: &NavError) {}
}

/// A [`RouteListener`] that ignores every notification.
pub struct NoopListener;

impl RouteListener for NoopListener {}

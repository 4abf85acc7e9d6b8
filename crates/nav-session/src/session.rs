//! The per-map-view navigation session.
//!
//! # States
//!
//! ```text
//! Uninitialized ──initialize──▶ Ready ──begin_route──▶ Resolving ──complete──▶ Routed
//!                                 ▲                                              │
//!                                 └────────────────── reset ─────────────────────┘
//! ```
//!
//! One-shot requests (`request_route_*`, `on_building_click`) pass through
//! `Resolving` within the call.  The two-phase form (`begin_route` then
//! `complete_route`) keeps the session in `Resolving` while the position
//! source is working; any number of requests may be outstanding, and each
//! one that completes replaces `last_route` and `last_position` together.
//! The most recently *completed* request therefore always wins.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info};

use nav_core::{BuildingId, NodeId};
use nav_graph::{GraphDefinition, GraphStore, LoadError};
use nav_route::{DijkstraRouter, Route, Router};

use crate::position::{self, NoPosition, PositionAttempt, PositionProvider, ResolvedPosition};
use crate::{NavError, NavResult, NoopListener, RouteListener, SessionConfig};

/// Source of per-session identities, so a ticket is only honoured by the
/// session that issued it.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(0);

/// Lifecycle state of a [`NavigationSession`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No graph loaded yet (or loading failed).
    Uninitialized,
    /// Graph loaded; no current route.
    Ready,
    /// At least one route request is waiting on a position.
    Resolving,
    /// A route is available in [`NavigationSession::last_route`].
    Routed,
}

/// What a route request is heading for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    Node(NodeId),
    Building(BuildingId),
}

/// An outstanding two-phase request, returned by
/// [`NavigationSession::begin_route`].
#[derive(Debug)]
#[must_use = "a pending route must be completed or abandoned"]
pub struct PendingRoute {
    session:     u64,
    ticket:      u64,
    destination: Destination,
}

impl PendingRoute {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }
}

/// Owns the campus graph for one map view and tracks its current route.
pub struct NavigationSession<R: Router = DijkstraRouter> {
    config:        SessionConfig,
    router:        R,
    id:            u64,
    graph:         Option<GraphStore>,
    init_failed:   bool,
    state:         SessionState,
    last_route:    Option<Route>,
    last_position: Option<ResolvedPosition>,
    provider:      Box<dyn PositionProvider>,
    listener:      Box<dyn RouteListener>,
    next_ticket:   u64,
    in_flight:     BTreeSet<u64>,
}

impl NavigationSession<DijkstraRouter> {
    /// An uninitialized session using [`DijkstraRouter`].
    pub fn new(config: SessionConfig) -> Self {
        Self::with_router(config, DijkstraRouter)
    }

    /// Create a session and load `definition` in one step.
    pub fn from_definition(config: SessionConfig, definition: &GraphDefinition) -> NavResult<Self> {
        let mut session = Self::new(config);
        session.initialize(definition)?;
        Ok(session)
    }
}

impl<R: Router> NavigationSession<R> {
    pub fn with_router(config: SessionConfig, router: R) -> Self {
        Self {
            config,
            router,
            id:            NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            graph:         None,
            init_failed:   false,
            state:         SessionState::Uninitialized,
            last_route:    None,
            last_position: None,
            provider:      Box::new(NoPosition),
            listener:      Box::new(NoopListener),
            next_ticket:   0,
            in_flight:     BTreeSet::new(),
        }
    }

    /// Replace the position source used by [`on_building_click`](Self::on_building_click)
    /// and [`request_route_here`](Self::request_route_here).
    pub fn set_position_provider(&mut self, provider: Box<dyn PositionProvider>) {
        self.provider = provider;
    }

    /// Register the listener for route notifications, replacing any
    /// previously registered one.
    pub fn set_listener(&mut self, listener: Box<dyn RouteListener>) {
        self.listener = listener;
    }

    // ── Initialization ────────────────────────────────────────────────────

    /// Build the graph from `definition`.
    ///
    /// Calling this on a session that already has a graph does nothing: the
    /// map view may run its setup more than once, and the graph is only
    /// ever built the first time.  A failed load is final; later calls
    /// return [`NavError::InitializationFailed`].
    pub fn initialize(&mut self, definition: &GraphDefinition) -> NavResult<()> {
        if self.guard_initialize()? {
            return Ok(());
        }
        let built = definition.build();
        self.finish_initialize(built)
    }

    /// Like [`initialize`](Self::initialize) but adopts an already built
    /// store.
    pub fn initialize_with_graph(&mut self, graph: GraphStore) -> NavResult<()> {
        if self.guard_initialize()? {
            return Ok(());
        }
        self.finish_initialize(Ok(graph))
    }

    /// `Ok(true)` when initialization should be skipped as redundant.
    fn guard_initialize(&self) -> NavResult<bool> {
        if self.graph.is_some() {
            debug!("session already initialized; ignoring repeated initialize");
            return Ok(true);
        }
        if self.init_failed {
            return Err(NavError::InitializationFailed);
        }
        Ok(false)
    }

    fn finish_initialize(&mut self, built: Result<GraphStore, LoadError>) -> NavResult<()> {
        let result = self.config.validate().and_then(|()| {
            let graph = built?;
            if graph.is_empty() {
                return Err(NavError::Load(LoadError::EmptyGraph));
            }
            Ok(graph)
        });
        match result {
            Ok(graph) => {
                info!(
                    "navigation session ready: {} nodes, {} buildings",
                    graph.node_count(),
                    graph.building_count()
                );
                self.graph = Some(graph);
                self.state = SessionState::Ready;
                Ok(())
            }
            Err(e) => {
                self.init_failed = true;
                Err(e)
            }
        }
    }

    // ── One-shot requests ─────────────────────────────────────────────────

    /// Route from wherever `attempt` resolves to, to `goal`.
    pub fn request_route_from_position(
        &mut self,
        attempt: PositionAttempt,
        goal:    NodeId,
    ) -> NavResult<Route> {
        self.route_from_attempt(&attempt, Destination::Node(goal))
    }

    /// Route from wherever `attempt` resolves to, to `building`'s entrance.
    pub fn request_route_to_building(
        &mut self,
        attempt:  PositionAttempt,
        building: BuildingId,
    ) -> NavResult<Route> {
        self.route_from_attempt(&attempt, Destination::Building(building))
    }

    /// Ask the position provider for a fresh fix, then route to `destination`.
    pub fn request_route_here(&mut self, destination: Destination) -> NavResult<Route> {
        self.require_graph()?;
        let attempt = self.provider.request_position();
        self.route_from_attempt(&attempt, destination)
    }

    /// Entry point for a building click on the map.
    ///
    /// Starts from the last resolved position when there is one; otherwise
    /// asks the position provider first.
    pub fn on_building_click(&mut self, building: BuildingId) -> NavResult<Route> {
        self.require_graph()?;
        debug!("building {building} clicked");
        match self.last_position {
            Some(start) => {
                let outcome = self.route_from(start, Destination::Building(building));
                self.apply(outcome)
            }
            None => self.request_route_here(Destination::Building(building)),
        }
    }

    // ── Two-phase requests ────────────────────────────────────────────────

    /// Start a request whose position is not known yet.
    ///
    /// The session stays `Resolving` until every outstanding request has
    /// been completed or abandoned.
    pub fn begin_route(&mut self, destination: Destination) -> NavResult<PendingRoute> {
        self.require_graph()?;
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight.insert(ticket);
        self.state = SessionState::Resolving;
        debug!("route request {ticket} to {destination:?} waiting for position");
        Ok(PendingRoute { session: self.id, ticket, destination })
    }

    /// Finish `pending` with the position the provider eventually produced.
    ///
    /// On success the result replaces the session's route and position,
    /// even if a request begun later has already completed.
    pub fn complete_route(
        &mut self,
        pending: PendingRoute,
        attempt: PositionAttempt,
    ) -> NavResult<Route> {
        if !self.take_ticket(&pending) {
            return Err(NavError::UnknownRequest(pending.ticket));
        }
        self.route_from_attempt(&attempt, pending.destination)
    }

    /// Drop `pending` without applying anything.
    pub fn abandon(&mut self, pending: PendingRoute) {
        if self.take_ticket(&pending) {
            debug!("route request {} abandoned", pending.ticket);
            self.settle_state();
        }
    }

    /// Number of two-phase requests still waiting for a position.
    pub fn pending_count(&self) -> usize {
        self.in_flight.len()
    }

    // ── View teardown ─────────────────────────────────────────────────────

    /// Forget the current route, position, and outstanding requests.  The
    /// graph is kept.
    pub fn reset(&mut self) {
        self.last_route = None;
        self.last_position = None;
        self.in_flight.clear();
        self.state = if self.graph.is_some() {
            SessionState::Ready
        } else {
            SessionState::Uninitialized
        };
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.graph.is_some()
    }

    pub fn graph(&self) -> Option<&GraphStore> {
        self.graph.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn last_route(&self) -> Option<&Route> {
        self.last_route.as_ref()
    }

    pub fn last_position(&self) -> Option<&ResolvedPosition> {
        self.last_position.as_ref()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Remove `pending` from the in-flight set if this session issued it.
    fn take_ticket(&mut self, pending: &PendingRoute) -> bool {
        pending.session == self.id && self.in_flight.remove(&pending.ticket)
    }

    fn require_graph(&self) -> NavResult<&GraphStore> {
        self.graph.as_ref().ok_or(NavError::NotInitialized)
    }

    fn route_from_attempt(
        &mut self,
        attempt:     &PositionAttempt,
        destination: Destination,
    ) -> NavResult<Route> {
        let graph = self.require_graph()?;
        let outcome = position::resolve(attempt, graph, self.config.fallback)
            .map_err(NavError::from)
            .and_then(|start| self.route_from(start, destination));
        self.apply(outcome)
    }

    fn route_from(
        &self,
        start:       ResolvedPosition,
        destination: Destination,
    ) -> NavResult<(ResolvedPosition, Route)> {
        let graph = self.require_graph()?;
        let route = match destination {
            Destination::Node(goal) => self.router.shortest_path(graph, start.node, goal)?,
            Destination::Building(b) => self.router.shortest_path_to_building(graph, start.node, b)?,
        };
        Ok((start, route))
    }

    /// Commit a finished request: both fields change together or not at all.
    fn apply(&mut self, outcome: NavResult<(ResolvedPosition, Route)>) -> NavResult<Route> {
        match outcome {
            Ok((position, route)) => {
                if let Some(graph) = self.graph.as_ref() {
                    self.listener.on_position(&position);
                    self.listener.on_route(&route, graph);
                }
                self.last_position = Some(position);
                self.last_route = Some(route.clone());
                self.settle_state();
                Ok(route)
            }
            Err(e) => {
                self.listener.on_route_failed(&e);
                self.settle_state();
                Err(e)
            }
        }
    }

    fn settle_state(&mut self) {
        self.state = if self.graph.is_none() {
            SessionState::Uninitialized
        } else if !self.in_flight.is_empty() {
            SessionState::Resolving
        } else if self.last_route.is_some() {
            SessionState::Routed
        } else {
            SessionState::Ready
        };
    }
}

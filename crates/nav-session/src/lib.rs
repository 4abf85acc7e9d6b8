//! `nav-session` — turns positioning attempts into routes for one map view.
//!
//! # Flow
//!
//! ```text
//! PositionAttempt ──resolve──▶ start NodeId ──Router──▶ Route ──▶ RouteListener
//!        ▲                                                 │
//!        └── PositionProvider (device GPS, may fail)       └─▶ last_route
//! ```
//!
//! A failed or denied position never becomes an error: the session routes
//! from [`SessionConfig::fallback`] instead.  Routing errors (unknown ids,
//! disconnected graph) are returned to the caller and leave the session's
//! previous route and position untouched.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nav_session::{NavigationSession, PositionAttempt, SessionConfig};
//!
//! let mut session = NavigationSession::new(SessionConfig::default());
//! session.initialize(&definition)?;
//! session.set_listener(Box::new(renderer));
//! let route = session.request_route_to_building(PositionAttempt::Denied, library)?;
//! ```

pub mod config;
pub mod error;
pub mod listener;
pub mod position;
pub mod session;


pub use config::{CAMPUS_ENTRANCE, SessionConfig};
pub use error::{NavError, NavResult};
pub use listener::{NoopListener, RouteListener};
pub use position::{
    FixedPosition, NoPosition, PositionAttempt, PositionProvider, PositionSource,
    ResolvedPosition, resolve,
};
pub use session::{Destination, NavigationSession, PendingRoute, SessionState};

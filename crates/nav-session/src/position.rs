//! Positioning input and its resolution to a graph node.
//!
//! The device's position source sits outside the engine and may be slow,
//! denied, or simply wrong.  Whatever it reports, [`resolve`] produces a
//! start node: a valid fix snaps to the nearest node, anything else snaps
//! the configured fallback coordinate instead.

use log::warn;

use nav_core::{GeoPoint, NodeId};
use nav_graph::{GraphResult, GraphStore};

// ── PositionAttempt ───────────────────────────────────────────────────────────

/// Outcome of one request to the device's position source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PositionAttempt {
    /// The source reported a coordinate.  It may still be invalid (NaN or
    /// out of range), in which case it is treated like a failure.
    Fix(GeoPoint),
    /// The user or platform refused location access.
    Denied,
    /// No position could be determined.
    Unavailable,
    /// The source did not answer within the application's timeout.
    TimedOut,
}

impl PositionAttempt {
    pub fn fix(lat: f64, lng: f64) -> Self {
        PositionAttempt::Fix(GeoPoint::new(lat, lng))
    }

    /// The reported coordinate, if there is one and it is usable.
    pub fn coordinate(&self) -> Option<GeoPoint> {
        match *self {
            PositionAttempt::Fix(p) if p.is_valid() => Some(p),
            _ => None,
        }
    }
}

// ── ResolvedPosition ──────────────────────────────────────────────────────────

/// Where a resolved start position came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PositionSource {
    Device,
    Fallback,
}

/// A positioning attempt after snapping to the graph.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResolvedPosition {
    /// The coordinate that was snapped (device fix or fallback).
    pub coordinate: GeoPoint,
    /// The graph node nearest to `coordinate`.
    pub node: NodeId,
    pub source: PositionSource,
}

/// Snap a positioning attempt to the graph.
///
/// Positioning failures never surface here; they select `fallback`.  The
/// only errors are those of [`GraphStore::nearest_node`] (an empty graph or
/// an unusable fallback), which a session rules out when it initializes.
pub fn resolve(
    attempt:  &PositionAttempt,
    graph:    &GraphStore,
    fallback: GeoPoint,
) -> GraphResult<ResolvedPosition> {
    let (coordinate, source) = match attempt.coordinate() {
        Some(p) => (p, PositionSource::Device),
        None => {
            warn!("positioning gave {attempt:?}; routing from fallback {fallback}");
            (fallback, PositionSource::Fallback)
        }
    };
    let node = graph.nearest_node(coordinate)?;
    Ok(ResolvedPosition { coordinate, node, source })
}

// ── PositionProvider ──────────────────────────────────────────────────────────

/// The device's position source.
///
/// Implementations own their timeout: a request that takes too long must
/// come back as [`PositionAttempt::TimedOut`] rather than block.
pub trait PositionProvider {
    fn request_position(&mut self) -> PositionAttempt;
}

impl<F: FnMut() -> PositionAttempt> PositionProvider for F {
    fn request_position(&mut self) -> PositionAttempt {
        self()
    }
}

/// A provider that always reports the same coordinate.
#[derive(Copy, Clone, Debug)]
pub struct FixedPosition(pub GeoPoint);

impl PositionProvider for FixedPosition {
    fn request_position(&mut self) -> PositionAttempt {
        PositionAttempt::Fix(self.0)
    }
}

/// A provider for kiosks without location hardware: every request is
/// [`PositionAttempt::Unavailable`].
#[derive(Copy, Clone, Debug, Default)]
pub struct NoPosition;

impl PositionProvider for NoPosition {
    fn request_position(&mut self) -> PositionAttempt {
        PositionAttempt::Unavailable
    }
}

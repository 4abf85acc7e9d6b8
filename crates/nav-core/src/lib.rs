//! `nav-core` — foundational types for the campus navigation engine.
//!
//! This crate is a dependency of every other `nav-*` crate.  It has no
//! `nav-*` dependencies and no required external ones (only optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module  | Contents                                               |
//! |---------|--------------------------------------------------------|
//! | [`ids`] | `NodeId`, `BuildingId`                                 |
//! | [`geo`] | `GeoPoint`, haversine distance, coordinate validity    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.    |

pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::{EARTH_RADIUS_M, GeoPoint};
pub use ids::{BuildingId, NodeId};

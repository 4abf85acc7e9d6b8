//! `nav-route` — minimum-weight path search over the campus graph.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                    |
//! |------------|-------------------------------------------------------------|
//! | [`router`] | `Router` trait, `Route`, `DijkstraRouter`, free functions   |
//! | [`error`]  | `RouteError`, `RouteResult<T>`                              |

pub mod error;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{RouteError, RouteResult};
pub use router::{
    COST_EPSILON, DijkstraRouter, Route, Router, WALKING_SPEED_MPS, shortest_path,
    shortest_path_to_building,
};

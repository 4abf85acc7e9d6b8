//! `nav-graph` — the campus path graph, its spatial index, and loaders.
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`store`]      | `GraphStore` (CSR + R-tree), `GraphBuilder`, `Node`, `Building` |
//! | [`definition`] | `GraphDefinition` document, JSON and CSV loaders      |
//! | [`error`]      | `LoadError`, `GraphError`, result aliases             |
//!
//! A store is built once and never mutated afterwards; every query takes
//! `&self`.

pub mod definition;
pub mod error;
pub mod store;


pub use definition::{BuildingDef, EdgeDef, GraphDefinition, NodeDef};
pub use error::{GraphError, GraphResult, LoadError, LoadResult};
pub use store::{Building, GraphBuilder, GraphStore, Node, NodeKind, SNAP_TIE_M};

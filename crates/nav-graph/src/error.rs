//! Graph-store error types.
//!
//! [`LoadError`] covers malformed graph definitions and is fatal to whoever
//! tried to load them.  [`GraphError`] covers queries against a loaded store
//! and is recoverable.

use thiserror::Error;

use nav_core::{BuildingId, NodeId};

/// Errors produced while validating or parsing a graph definition.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("duplicate node id {0}")]
    DuplicateNodeId(NodeId),

    #[error("duplicate building id {0}")]
    DuplicateBuildingId(BuildingId),

    #[error("edge {from} -> {to} references missing node {missing}")]
    DanglingEdgeReference { from: NodeId, to: NodeId, missing: NodeId },

    #[error("building {building} references missing entry node {node}")]
    DanglingBuildingReference { building: BuildingId, node: NodeId },

    #[error("edge {from} -> {to} has negative weight {weight}")]
    NegativeWeight { from: NodeId, to: NodeId, weight: f64 },

    #[error("edge {from} -> {to} has a non-finite weight")]
    NonFiniteWeight { from: NodeId, to: NodeId },

    #[error("edge weights sum past the largest finite distance")]
    WeightOverflow,

    #[error("self-loop on node {0}")]
    SelfLoop(NodeId),

    #[error("node {node} has invalid coordinate ({lat}, {lng})")]
    InvalidNodeCoordinate { node: NodeId, lat: f64, lng: f64 },

    #[error("graph definition contains no nodes")]
    EmptyGraph,

    #[error("graph definition parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced by queries against a loaded [`GraphStore`](crate::GraphStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0} not found in graph")]
    UnknownNode(NodeId),

    #[error("building {0} not found in graph")]
    UnknownBuilding(BuildingId),

    #[error("graph holds no nodes")]
    EmptyGraph,

    #[error("query coordinate is not a finite lat/lng pair")]
    InvalidCoordinate,
}

pub type LoadResult<T> = Result<T, LoadError>;
pub type GraphResult<T> = Result<T, GraphError>;

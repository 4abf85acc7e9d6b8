//! Routing error type.

use thiserror::Error;

use nav_core::{BuildingId, NodeId};
use nav_graph::GraphError;

/// Errors produced by `nav-route`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no route from {start} to {goal}")]
    NoRoute { start: NodeId, goal: NodeId },

    #[error("node {0} not found in graph")]
    UnknownNode(NodeId),

    #[error("building {0} not found in graph")]
    UnknownBuilding(BuildingId),

    #[error(transparent)]
    Graph(GraphError),
}

impl From<GraphError> for RouteError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::UnknownNode(id)     => RouteError::UnknownNode(id),
            GraphError::UnknownBuilding(id) => RouteError::UnknownBuilding(id),
            other                           => RouteError::Graph(other),
        }
    }
}

pub type RouteResult<T> = Result<T, RouteError>;

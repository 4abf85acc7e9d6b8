use thiserror::Error;

use nav_graph::{GraphError, LoadError};
use nav_route::RouteError;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("graph load failed: {0}")]
    Load(#[from] LoadError),

    #[error("routing failed: {0}")]
    Route(#[from] RouteError),

    #[error("position resolution failed: {0}")]
    Graph(#[from] GraphError),

    #[error("session has no graph loaded")]
    NotInitialized,

    #[error("session initialization failed earlier; create a new session")]
    InitializationFailed,

    #[error("route request {0} is not pending on this session")]
    UnknownRequest(u64),

    #[error("session configuration error: {0}")]
    Config(String),
}

pub type NavResult<T> = Result<T, NavError>;

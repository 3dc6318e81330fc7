//! Spatial-subsystem error type.

use thiserror::Error;

use ec_core::{CoreError, LinkId, NodeId};

/// Errors produced by `ec-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// An event referenced a link the topology does not know.  Always fatal:
    /// it means the events and the network come from different scenarios.
    #[error("link {0} not found in network")]
    LinkNotFound(LinkId),

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("duplicate node {0}")]
    DuplicateNode(NodeId),

    #[error("duplicate link {0}")]
    DuplicateLink(LinkId),

    #[error("grid configuration error: {0}")]
    Grid(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SpatialResult<T> = Result<T, SpatialError>;

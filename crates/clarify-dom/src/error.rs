//! Document errors.

use thiserror::Error;

use crate::node::NodeId;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomError {
    #[error("Node {0:?} does not belong to this document")]
    UnknownNode(NodeId),

    #[error("Node {0:?} cannot have children")]
    NotAContainer(NodeId),

    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),

    #[error("Node {0:?} is not attached to the document")]
    Detached(NodeId),

    #[error("Offset {offset} out of bounds for node of length {len}")]
    InvalidOffset { offset: usize, len: usize },

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Back-reference could not be decoded: {0}")]
    Decode(String),
}

use crate::key::NodeKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeKey),

    #[error("The root node cannot be removed or replaced")]
    RootImmutable,

    #[error("Node {0} is not an element")]
    NotAnElement(NodeKey),

    #[error("Node {0} is not a text node")]
    NotText(NodeKey),

    #[error("A {child} node cannot be a child of a {parent} node")]
    InvalidChild {
        parent: &'static str,
        child: &'static str,
    },

    #[error("Offset {offset} is out of range for node {key}")]
    OffsetOutOfRange { key: NodeKey, offset: usize },

    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Node type already registered: {0}")]
    DuplicateNodeType(String),

    #[error("Invalid {node_type} node: {reason}")]
    InvalidNode { node_type: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DocumentError {
    pub fn invalid_node(node_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNode {
            node_type: node_type.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocumentError>;

//! Error types for the editor

use stencil_document::DocumentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Node type {0:?} is not registered on this editor")]
    NodeNotRegistered(String),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

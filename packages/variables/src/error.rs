//! Error types for variables and their sources

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VariableError {
    #[error("Variable name must not be empty")]
    EmptyName,
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog: {0}")]
    Json(#[from] serde_json::Error),
}

//! Error types.

use thiserror::Error;

use crate::parser::ParseError;

#[derive(Debug, Error)]
pub enum WalkError {
    /// A raw value of the wrong shape was given to a typed node operation.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// The node (or one of its ancestors) was removed from its tree.
    #[error("node is detached from its tree")]
    Detached,
    #[error("invalid path: {0}")]
    InvalidPath(#[from] ParseError),
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WalkError>;

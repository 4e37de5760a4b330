//! Error types for the opsmith library
//!
//! This module provides error handling for all library operations: document
//! parsing, path compilation, tree traversal, op application, and the file
//! I/O helpers used by the CLI.

use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum OpsmithError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed document, ops, or variables input
    #[error("failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Structurally invalid document (e.g. non-string mapping keys)
    #[error("invalid document: {reason}")]
    InvalidDocument { reason: String },

    /// Malformed path string
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// A path segment cannot be resolved against the current tree shape
    #[error("cannot resolve {segment} in path: {reason}")]
    Traversal { segment: String, reason: String },

    /// A malformed op definition (unknown type, missing or forbidden value)
    #[error("invalid op {index}: {reason}")]
    InvalidOp { index: usize, reason: String },

    /// An op failed to apply; carries the op index and declared path
    #[error("failed to apply op {index} with path {path:?}: {source}")]
    OpApplication {
        index: usize,
        path: String,
        #[source]
        source: Box<OpsmithError>,
    },

    /// The result tree cannot be rendered back to text
    #[error("failed to serialize document: {0}")]
    Serialization(#[source] serde_yaml::Error),

    /// Regular expression errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, OpsmithError>;

impl OpsmithError {
    /// Create a new parse error for the named input
    pub fn parse(what: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::Parse {
            what: what.into(),
            source,
        }
    }

    /// Create a new invalid document error
    pub fn invalid_document(reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            reason: reason.into(),
        }
    }

    /// Create a new invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new traversal error
    pub fn traversal(segment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Traversal {
            segment: segment.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid op error
    pub fn invalid_op(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidOp {
            index,
            reason: reason.into(),
        }
    }

    /// Wrap an underlying failure with the offending op's index and path
    pub fn op_application(index: usize, path: impl Into<String>, source: OpsmithError) -> Self {
        Self::OpApplication {
            index,
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Check whether this error (or its cause chain) is a traversal failure
    pub fn is_traversal(&self) -> bool {
        match self {
            Self::Traversal { .. } => true,
            Self::OpApplication { source, .. } => source.is_traversal(),
            _ => false,
        }
    }
}

//! Error types for semantic-tree construction and configuration.
//!
//! Only structural faults are errors. Ceilings, unresolved traces and empty
//! trees degrade the output and are logged instead.

use crate::sem_tree::NodeId;
use layered_syntax::{SynId, SyntaxError};
use std::path::PathBuf;
use thiserror::Error;

/// Faults that abort proposition finding for one sentence.
#[derive(Debug, Error)]
pub enum SemTreeError {
    /// A syntax node is flagged as carrying a mention but the mention set has none.
    #[error("syntax node {node} has a mention flag but no mention in the set")]
    MissingMention { node: SynId },

    /// An argument slot holds a node with no recognised semantic type.
    #[error("{context}: {message}")]
    UnrecognizedArgument {
        context: &'static str,
        message: String,
    },

    /// Generic internal-consistency violation.
    #[error("inconsistent sem tree in {context}: {message}")]
    Inconsistent {
        context: &'static str,
        message: String,
    },

    /// Node id from an earlier sentence.
    #[error("stale sem node {0:?}")]
    StaleNode(NodeId),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Result type for semantic-tree operations.
pub type SemTreeResult<T> = Result<T, SemTreeError>;

/// Errors loading a [`PropositionConfig`](crate::PropositionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// A required boolean flag is absent.
    #[error("missing required flag `{name}`")]
    MissingFlag { name: &'static str },
}

//! Error types for syntax trees and mention sets.

use crate::SynId;
use thiserror::Error;

/// Errors that can occur while building or querying syntactic input.
#[derive(Debug, Error)]
pub enum SyntaxError {
    /// Error reading a bracketed parse.
    #[error("parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    /// A node id that does not belong to the tree.
    #[error("unknown syntax node {0:?}")]
    UnknownNode(SynId),

    /// A second mention was attached to a node that already has one.
    #[error("node {node:?} already carries mention {existing}")]
    DuplicateMention { node: SynId, existing: usize },

    /// A mention index that does not belong to the set.
    #[error("unknown mention index {0}")]
    UnknownMention(usize),
}

/// Result type for syntax operations.
pub type SyntaxResult<T> = Result<T, SyntaxError>;

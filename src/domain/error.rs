//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::element::NodeId;

/// Structural invariant violations found by [`crate::domain::Tree::check_invariants`].
///
/// Editing operations never produce these; they indicate a tree that was
/// assembled or modified outside the editing API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("root node {0:?} has a parent or sibling link")]
    RootLinked(NodeId),

    #[error("node {0:?} is referenced but not stored")]
    MissingNode(NodeId),

    #[error("node {node:?} appears more than once in the tree")]
    DuplicateChild { node: NodeId },

    #[error("node {node:?} has parent {actual:?}, expected {expected:?}")]
    WrongParent {
        node: NodeId,
        expected: NodeId,
        actual: Option<NodeId>,
    },

    #[error("node {node:?} has broken sibling links")]
    BrokenSiblings { node: NodeId },

    #[error("{count} node(s) are not reachable from the root")]
    OrphanNodes { count: usize },

    #[error("selected node {0:?} is not reachable from the root")]
    SelectionUnreachable(NodeId),

    #[error("cursor part {part} out of range (max {max})")]
    PartOutOfRange { part: usize, max: usize },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

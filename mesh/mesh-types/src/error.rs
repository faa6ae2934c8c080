//! Error types for mesh construction and lookup.

use std::fmt;

use thiserror::Error;

use crate::ElementType;

/// Result type for mesh data model operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// The kind of mesh item an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// A mesh node.
    Node,
    /// A mesh edge.
    Edge,
    /// A mesh face.
    Face,
    /// A mesh element.
    Element,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Face => "face",
            Self::Element => "element",
        };
        f.write_str(name)
    }
}

/// Errors raised by the mesh data model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MeshError {
    /// An element type has no registered rule for the requested operation.
    #[error("element type {element_type} is not supported by {operation}")]
    UnsupportedElementType {
        /// The offending element type.
        element_type: ElementType,
        /// The operation that needed a rule for this type.
        operation: &'static str,
    },

    /// An index points outside the current array bounds.
    #[error("invalid {kind} index {index} (mesh has {count} {kind}s)")]
    InvalidReference {
        /// Which array the index refers to.
        kind: ItemKind,
        /// The invalid index.
        index: usize,
        /// Current length of the referenced array.
        count: usize,
    },

    /// The connectivity list length does not match the element type.
    #[error("{element_type} expects {expected} nodes, got {actual}")]
    NodeCountMismatch {
        /// The element type being created.
        element_type: ElementType,
        /// Number of nodes the type requires.
        expected: usize,
        /// Number of nodes supplied.
        actual: usize,
    },
}

impl MeshError {
    /// Shorthand for an [`MeshError::InvalidReference`].
    #[must_use]
    pub const fn invalid(kind: ItemKind, index: usize, count: usize) -> Self {
        Self::InvalidReference { kind, index, count }
    }
}

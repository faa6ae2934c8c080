//! Error types for mesh editing.

use mesh_topology::TopologyError;
use mesh_types::{FaceType, ItemKind, MeshError};
use thiserror::Error;

/// Result type for edit operations.
pub type EditResult<T> = Result<T, EditError>;

/// Errors that can occur while editing a mesh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EditError {
    /// Rebuilding the topology after the edit failed.
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// The mesh data model rejected an element type or an index.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// A face type has no rule for the requested operation.
    #[error("face type {face_type} is not supported by {operation}")]
    UnsupportedFaceType {
        /// The offending face type.
        face_type: FaceType,
        /// The operation that needed a rule for this type.
        operation: &'static str,
    },

    /// No item carries the requested tag.
    #[error("no {kind} is tagged {tag}")]
    EmptySelection {
        /// Which array was searched.
        kind: ItemKind,
        /// The tag that matched nothing.
        tag: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_errors_pass_through() {
        let err: EditError = MeshError::invalid(ItemKind::Node, 7, 2).into();
        assert_eq!(err.to_string(), "invalid node index 7 (mesh has 2 nodes)");

        let err: EditError = TopologyError::from(MeshError::invalid(ItemKind::Face, 1, 0)).into();
        assert!(matches!(err, EditError::Topology(TopologyError::Mesh(_))));
    }

    #[test]
    fn selection_message() {
        let err = EditError::EmptySelection {
            kind: ItemKind::Element,
            tag: 1,
        };
        assert_eq!(err.to_string(), "no element is tagged 1");
    }
}

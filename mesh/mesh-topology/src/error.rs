//! Error types for topology building.

use mesh_types::MeshError;
use thiserror::Error;

/// Result type for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors that can occur while deriving mesh topology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TopologyError {
    /// The mesh data model rejected an element type or an index.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Several candidates matched one neighbor slot and strict mode is on.
    #[error(
        "non-manifold topology: {elements} ambiguous element neighbor slot(s), {faces} ambiguous face neighbor slot(s)"
    )]
    NonManifoldAmbiguity {
        /// Element neighbor slots with more than one candidate.
        elements: usize,
        /// Face neighbor slots with more than one candidate.
        faces: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{ElementType, ItemKind};

    #[test]
    fn mesh_errors_pass_through() {
        let err: TopologyError = MeshError::invalid(ItemKind::Edge, 3, 1).into();
        assert_eq!(err.to_string(), "invalid edge index 3 (mesh has 1 edges)");

        let err: TopologyError = MeshError::UnsupportedElementType {
            element_type: ElementType::Tet20,
            operation: "shape lookup",
        }
        .into();
        assert!(err.to_string().contains("tet20"));
    }

    #[test]
    fn ambiguity_message() {
        let err = TopologyError::NonManifoldAmbiguity {
            elements: 2,
            faces: 0,
        };
        assert!(err.to_string().starts_with("non-manifold topology: 2"));
    }
}

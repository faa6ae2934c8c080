//! Finite-element mesh topology, partitioning, and editing.
//!
//! This umbrella crate re-exports the mesh-* crates under one roof. Callers
//! describe a mesh by its nodes and elements; everything else (neighbors,
//! faces, edges, and the part / surface / curve / point partitions) is
//! derived and kept up to date by the edit operations.
//!
//! # Quick Start
//!
//! ```
//! use mesh::prelude::*;
//!
//! // A 4x2x1 block of HEX8 elements
//! let mut mesh = hex_block(4, 2, 1);
//!
//! // Derive faces, edges, and partitions
//! let builder = MeshBuilder::default();
//! let summary = builder.rebuild(&mut mesh).unwrap();
//! assert_eq!(summary.face_partitions, 6);
//!
//! // Split the first column of elements into its own part
//! mesh.elements[0].tag = 1;
//! mesh.elements[4].tag = 1;
//! let part = mesh::edit::partition_element_selection(&mut mesh, 1, None, &builder).unwrap();
//! assert_eq!(part, 1);
//!
//! assert!(validate_topology(&mesh).is_consistent());
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Data model: `FeMesh`, `Node`, `Edge`, `Face`, `Element`,
//!   element shapes, item lists, transforms
//! - [`topology`] - Lookup tables, neighbors, face and edge synthesis,
//!   partitioning, the rebuild pipeline, validation
//! - [`edit`] - Attach, weld, delete, invert, detach, duplicate removal,
//!   selection partitioning
//!
//! # Feature Flags
//!
//! - `serde` - Serialization of the data model

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Data model: `FeMesh`, `Node`, `Edge`, `Face`, `Element`, element shapes.
pub use mesh_types as types;

/// Adjacency, face/edge synthesis, partitioning, and validation.
pub use mesh_topology as topology;

/// Attach, weld, delete, invert, detach, and selection partitioning.
pub use mesh_edit as edit;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for building and editing meshes.
///
/// # Usage
///
/// ```
/// use mesh::prelude::*;
/// ```
pub mod prelude {
    // Data model
    pub use mesh_types::{
        Edge, Element, ElementRegistry, ElementType, Face, FaceType, FeMesh, ItemKind,
        MeshError, MeshTransform, Node, Point3, Vector3, hex_block,
    };

    // Topology
    pub use mesh_topology::{
        MeshBuilder, RebuildParams, RebuildSummary, TopologyError, TopologyReport,
        validate_topology,
    };

    // Editing
    pub use mesh_edit::{EditError, WeldSummary, attach, attach_and_weld};
}

// =============================================================================
// Tests
// =============================================================================

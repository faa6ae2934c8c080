//! Editing operations for finite-element meshes.
//!
//! Every operation here changes nodes or elements and then re-derives the
//! topology it invalidated, either by running a full
//! [`MeshBuilder::rebuild`](mesh_topology::MeshBuilder::rebuild) or by
//! calling the individual passes of `mesh-topology`.
//!
//! - [`attach`] and [`attach_and_weld`] combine meshes
//! - [`delete_tagged_elements`] and friends delete with cascade
//! - [`invert_tagged_elements`] and [`invert_tagged_faces`] flip orientation
//! - [`detach_tagged_elements`] splits a selection into its own mesh
//! - [`remove_duplicate_faces`] and [`remove_duplicate_edges`] clean up
//! - the `partition_*` functions reassign tagged items to new partitions
//!
//! Selections use the scratch `tag` field of each item. Operations that
//! can fail check their input before touching the mesh.
//!
//! # Example
//!
//! ```
//! use mesh_edit::{attach_and_weld, detach_tagged_elements};
//! use mesh_topology::MeshBuilder;
//! use mesh_types::{MeshTransform, Vector3, hex_block};
//!
//! let builder = MeshBuilder::default();
//! let mut mesh = hex_block(2, 1, 1);
//! builder.rebuild(&mut mesh).unwrap();
//!
//! let mut block = hex_block(1, 1, 1);
//! builder.rebuild(&mut block).unwrap();
//! block.transform = MeshTransform::from_translation(Vector3::new(2.0, 0.0, 0.0));
//!
//! let summary = attach_and_weld(&mut mesh, &block, 1e-6, &builder).unwrap();
//! assert_eq!(summary.nodes_merged, 4);
//!
//! mesh.elements[2].tag = 1;
//! let part = detach_tagged_elements(&mut mesh, 1, &builder).unwrap().unwrap();
//! assert_eq!(part.element_count(), 1);
//! assert_eq!(mesh.element_count(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod attach;
mod delete;
mod detach;
mod duplicates;
mod error;
mod invert;
mod select;
mod weld;

pub use attach::{AttachOffsets, attach};
pub use delete::{
    delete_parts, delete_tagged_elements, delete_tagged_faces, delete_tagged_nodes,
    remove_isolated_nodes,
};
pub use detach::detach_tagged_elements;
pub use duplicates::{remove_duplicate_edges, remove_duplicate_faces};
pub use error::{EditError, EditResult};
pub use invert::{invert_tagged_elements, invert_tagged_faces};
pub use select::{
    add_triangles, partition_edge_selection, partition_element_selection,
    partition_face_selection, partition_node, partition_nodes,
};
pub use weld::{WeldSummary, attach_and_weld};

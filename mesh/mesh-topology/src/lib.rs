//! Adjacency, face/edge synthesis, and partitioning for finite-element meshes.
//!
//! Given the nodes and elements of an [`FeMesh`](mesh_types::FeMesh), this
//! crate derives everything else:
//!
//! - Node-to-element, node-to-face, and node-to-edge lookup tables
//! - Element neighbors across solid faces, shell edges, and beam ends
//! - Boundary and interface faces with their owning elements
//! - Feature edges between surfaces and along beams
//! - Partitions: parts, surfaces, feature curves, and feature points
//!
//! [`MeshBuilder::rebuild`] runs the whole pipeline. The individual passes
//! are public so edit operations can re-derive only what they invalidate.
//!
//! # Non-manifold input
//!
//! When more than one candidate fits a neighbor slot, the first one in
//! node-table order wins. Such slots are counted in the
//! [`RebuildSummary`]; set [`RebuildParams::strict_manifold`] to turn them
//! into an error instead.
//!
//! # Example
//!
//! ```
//! use mesh_topology::{MeshBuilder, RebuildParams, validate_topology};
//! use mesh_types::hex_block;
//!
//! let mut mesh = hex_block(4, 2, 1);
//! let params = RebuildParams::default().with_smoothing_angle(45.0);
//! let builder = MeshBuilder::default().with_params(params);
//! let summary = builder.rebuild(&mut mesh).unwrap();
//!
//! println!("{summary}");
//! assert_eq!(summary.face_partitions, 6);
//! assert!(validate_topology(&mesh).is_consistent());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod builder;
mod edges;
mod error;
mod faces;
mod lookup;
mod neighbors;
mod partition;
mod validate;

pub use builder::{MeshBuilder, RebuildParams, RebuildSummary};
pub use edges::{
    build_edges, mark_exterior_edges, rebuild_edge_data, update_edge_element_table,
    update_edge_neighbors,
};
pub use error::{TopologyError, TopologyResult};
pub use faces::{
    FaceBuildReport, build_faces, is_valid_face_neighbor, mark_exterior_faces, rebuild_face_data,
    update_face_element_table, update_face_neighbors,
};
pub use lookup::{NodeLookup, NodeRef};
pub use neighbors::{
    NeighborReport, mark_exterior_elements, mark_exterior_nodes, update_element_neighbors,
};
pub use partition::{
    auto_partition_edge_set, auto_partition_edges, auto_partition_elements,
    auto_partition_face_set, auto_partition_nodes, auto_partition_surface,
    update_edge_partitions, update_element_partitions, update_face_partitions,
    update_node_partitions, update_smoothing_groups,
};
pub use validate::{TopologyReport, validate_topology};

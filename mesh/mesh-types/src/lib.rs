//! Finite-element mesh data model.
//!
//! This crate provides the foundational types for mixed solid/shell/beam
//! meshes:
//!
//! - [`FeMesh`] - Flat arrays of nodes, edges, faces, and elements
//! - [`Node`], [`Edge`], [`Face`], [`Element`] - Mesh items with partition ids
//! - [`ElementType`] - Closed set of element types with a solid/shell/beam class
//! - [`ElementShape`] / [`ElementRegistry`] - Per-type topology tables
//! - [`MeshTransform`] - Placement of a mesh in the global frame
//! - [`NodeSet`], [`EdgeSet`], [`Surface`], [`ElementSet`] - Named item lists
//!
//! # Partition ids
//!
//! Every item carries a `gid` partition id; `-1` means unassigned. Element
//! partitions are parts, face partitions are surfaces, edge partitions are
//! feature curves, and node partitions are feature points.
//!
//! # Derived data
//!
//! Only nodes and elements are authored. Faces, edges, neighbor slots, and
//! the face/edge/node partitions are derived by `mesh-topology` and must be
//! rebuilt after any node or element edit.
//!
//! # Example
//!
//! ```
//! use mesh_types::{ElementRegistry, hex_block};
//!
//! let mesh = hex_block(2, 2, 2);
//! let shapes = ElementRegistry::standard().resolve(&mesh).unwrap();
//! assert_eq!(shapes.len(), 8);
//! assert_eq!(shapes.get(0).face_count(), 6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod edge;
mod element;
mod element_type;
mod error;
mod face;
mod item_list;
mod mesh;
mod node;
mod registry;
mod shape;
mod traits;
mod transform;

pub use edge::{Edge, EdgeNodes};
pub use element::{Element, ElementNodes, MAX_SLOTS};
pub use element_type::{EdgeType, ElementClass, ElementType, FaceType};
pub use error::{ItemKind, MeshError, MeshResult};
pub use face::{Face, FaceNodes, FaceOwner};
pub use item_list::{
    EdgeKind, EdgeSet, ElementKind, ElementSet, FaceKind, IndexMap, ItemList, ListKind, NodeKind,
    NodeSet, Surface,
};
pub use mesh::{FeMesh, hex_block};
pub use node::Node;
pub use registry::{ElementRegistry, ShapeTable};
pub use shape::{ElementShape, LocalFace, builtin_shape};
pub use traits::{
    Partitioned, Tagged, compact_ids, compact_partitions, count_partitions, tag_all,
};
pub use transform::MeshTransform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3};

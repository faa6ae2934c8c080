//! The finite-element mesh container.

use nalgebra::{Point3, Vector3};

use crate::traits::count_partitions;
use crate::{
    Edge, EdgeSet, Element, ElementSet, ElementType, Face, IndexMap, ItemKind, MeshError,
    MeshResult, MeshTransform, Node, NodeSet, Surface,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mixed solid/shell/beam finite-element mesh.
///
/// Nodes and elements are authored; edges, faces, neighbor slots, and
/// partition ids below the element level are derived by the topology
/// builder and become stale after any node or element edit.
///
/// # Example
///
/// ```
/// use mesh_types::{ElementType, FeMesh, Point3};
///
/// let mut mesh = FeMesh::new();
/// for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]] {
///     mesh.add_node(Point3::from(p));
/// }
/// mesh.add_element(ElementType::Tet4, &[0, 1, 2, 3]).unwrap();
///
/// assert_eq!(mesh.node_count(), 4);
/// assert_eq!(mesh.element_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeMesh {
    /// Nodes.
    pub nodes: Vec<Node>,
    /// Synthesized edges.
    pub edges: Vec<Edge>,
    /// Synthesized faces.
    pub faces: Vec<Face>,
    /// Elements.
    pub elements: Vec<Element>,
    /// Placement of the mesh in the global frame.
    pub transform: MeshTransform,
    /// Named node sets. Nodes listed here survive isolated-node removal.
    pub node_sets: Vec<NodeSet>,
    /// Named edge sets.
    pub edge_sets: Vec<EdgeSet>,
    /// Named surfaces.
    pub surfaces: Vec<Surface>,
    /// Named element sets.
    pub element_sets: Vec<ElementSet>,
}

impl FeMesh {
    /// Create an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh with room for the given numbers of nodes and elements.
    #[must_use]
    pub fn with_capacity(nodes: usize, elements: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            elements: Vec::with_capacity(elements),
            ..Self::default()
        }
    }

    /// Number of nodes.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Length of the array `kind` refers to.
    #[must_use]
    pub fn count(&self, kind: ItemKind) -> usize {
        match kind {
            ItemKind::Node => self.nodes.len(),
            ItemKind::Edge => self.edges.len(),
            ItemKind::Face => self.faces.len(),
            ItemKind::Element => self.elements.len(),
        }
    }

    /// Returns `true` if the mesh has no nodes and no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.elements.is_empty()
    }

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    /// Append a node. It becomes its own node partition and is exterior.
    ///
    /// Returns the new node's index.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn add_node(&mut self, position: Point3<f64>) -> usize {
        let mut node = Node::new(position);
        node.gid = self.count_node_partitions() as i32;
        node.exterior = true;
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Append an element in partition 0.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NodeCountMismatch`] if `nodes` has the wrong
    /// length for `element_type`, or [`MeshError::InvalidReference`] if a
    /// node index is out of range.
    pub fn add_element(&mut self, element_type: ElementType, nodes: &[usize]) -> MeshResult<usize> {
        self.push_element(Element::new(element_type, nodes))
    }

    /// Append a prepared element after checking its connectivity.
    ///
    /// # Errors
    ///
    /// Same as [`FeMesh::add_element`].
    pub fn push_element(&mut self, element: Element) -> MeshResult<usize> {
        self.check_element(&element)?;
        self.elements.push(element);
        Ok(self.elements.len() - 1)
    }

    fn check_element(&self, element: &Element) -> MeshResult<()> {
        let expected = element.element_type.node_count();
        if element.nodes.len() != expected {
            return Err(MeshError::NodeCountMismatch {
                element_type: element.element_type,
                expected,
                actual: element.nodes.len(),
            });
        }
        let count = self.nodes.len();
        match element.nodes.iter().find(|&&n| n >= count) {
            Some(&index) => Err(MeshError::invalid(ItemKind::Node, index, count)),
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------------
    // Partition counts
    // ------------------------------------------------------------------------

    /// Number of node partitions (max gid + 1).
    #[must_use]
    pub fn count_node_partitions(&self) -> usize {
        count_partitions(&self.nodes)
    }

    /// Number of edge partitions.
    #[must_use]
    pub fn count_edge_partitions(&self) -> usize {
        count_partitions(&self.edges)
    }

    /// Number of face partitions.
    #[must_use]
    pub fn count_face_partitions(&self) -> usize {
        count_partitions(&self.faces)
    }

    /// Number of element partitions.
    #[must_use]
    pub fn count_element_partitions(&self) -> usize {
        count_partitions(&self.elements)
    }

    /// Number of smoothing groups (max sid + 1).
    #[must_use]
    pub fn count_smoothing_groups(&self) -> usize {
        self.faces
            .iter()
            .map(|f| f.sid)
            .max()
            .and_then(|m| usize::try_from(m + 1).ok())
            .unwrap_or(0)
    }

    // ------------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------------

    /// Unit normal of face `index`, from the sum of corner cross products.
    ///
    /// Degenerate faces give the zero vector.
    #[must_use]
    pub fn face_normal(&self, index: usize) -> Vector3<f64> {
        let face = &self.faces[index];
        let corners = face.corners();
        let n = corners.len();
        let mut sum = Vector3::zeros();
        for j in 0..n {
            let a = self.nodes[corners[j]].position.coords;
            let b = self.nodes[corners[(j + 1) % n]].position.coords;
            sum += a.cross(&b);
        }
        sum.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
    }

    /// Centroid of the corner nodes of face `index`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn face_centroid(&self, index: usize) -> Point3<f64> {
        let corners = self.faces[index].corners();
        let sum: Vector3<f64> = corners
            .iter()
            .map(|&n| self.nodes[n].position.coords)
            .sum();
        Point3::from(sum / corners.len() as f64)
    }

    /// Position of node `index` in the global frame.
    #[must_use]
    pub fn global_position(&self, index: usize) -> Point3<f64> {
        self.transform.local_to_global(&self.nodes[index].position)
    }

    // ------------------------------------------------------------------------
    // Topology bookkeeping
    // ------------------------------------------------------------------------

    /// Drop faces and edges and reset every element's neighbor slots.
    pub fn clear_topology(&mut self) {
        self.faces.clear();
        self.edges.clear();
        for el in &mut self.elements {
            el.clear_topology();
        }
    }

    /// Check that every stored index is within bounds.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidReference`] for the first dangling
    /// node, face, edge, or element reference found.
    pub fn validate_references(&self) -> MeshResult<()> {
        let nn = self.nodes.len();
        let ne = self.elements.len();
        let nf = self.faces.len();
        let ned = self.edges.len();
        let check = |kind, index: usize, count| {
            if index < count {
                Ok(())
            } else {
                Err(MeshError::invalid(kind, index, count))
            }
        };

        for el in &self.elements {
            for &n in &el.nodes {
                check(ItemKind::Node, n, nn)?;
            }
            for &e in el.nbr.iter().flatten() {
                check(ItemKind::Element, e, ne)?;
            }
            for &f in el.faces.iter().flatten() {
                check(ItemKind::Face, f, nf)?;
            }
        }
        for face in &self.faces {
            for &n in &face.nodes {
                check(ItemKind::Node, n, nn)?;
            }
            for &f in face.nbr.iter().flatten() {
                check(ItemKind::Face, f, nf)?;
            }
            for owner in face.owners.iter().flatten() {
                check(ItemKind::Element, owner.element, ne)?;
            }
        }
        for edge in &self.edges {
            for &n in &edge.nodes {
                check(ItemKind::Node, n, nn)?;
            }
            for &e in edge.nbr.iter().flatten() {
                check(ItemKind::Edge, e, ned)?;
            }
            if let Some(el) = edge.element {
                check(ItemKind::Element, el, ne)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Compaction
    // ------------------------------------------------------------------------

    /// Keep the nodes flagged in `keep` and rewrite node references.
    ///
    /// References to removed nodes are left as they were; callers remove
    /// the referencing items first.
    pub fn retain_nodes(&mut self, keep: &[bool]) -> IndexMap {
        let map = IndexMap::from_keep(keep);
        retain_flagged(&mut self.nodes, keep);

        let remap = |n: &mut usize| {
            if let Some(m) = map.get(*n) {
                *n = m;
            }
        };
        for el in &mut self.elements {
            el.nodes.iter_mut().for_each(remap);
        }
        for face in &mut self.faces {
            face.nodes.iter_mut().for_each(remap);
        }
        for edge in &mut self.edges {
            edge.nodes.iter_mut().for_each(remap);
        }
        for set in &mut self.node_sets {
            set.remap(&map);
        }
        map
    }

    /// Keep the elements flagged in `keep`.
    ///
    /// Neighbor slots pointing at removed elements are cleared, face owners
    /// are packed toward slot 0, and beam edges lose their owner.
    pub fn retain_elements(&mut self, keep: &[bool]) -> IndexMap {
        let map = IndexMap::from_keep(keep);
        retain_flagged(&mut self.elements, keep);

        for el in &mut self.elements {
            for slot in &mut el.nbr {
                *slot = slot.and_then(|e| map.get(e));
            }
        }
        for face in &mut self.faces {
            let owners: Vec<_> = face
                .owners
                .iter()
                .flatten()
                .filter_map(|o| map.get(o.element).map(|e| crate::FaceOwner::new(e, o.local)))
                .collect();
            face.clear_owners();
            for (slot, owner) in face.owners.iter_mut().zip(owners) {
                *slot = Some(owner);
            }
        }
        for edge in &mut self.edges {
            edge.element = edge.element.and_then(|e| map.get(e));
        }
        for set in &mut self.element_sets {
            set.remap(&map);
        }
        map
    }

    /// Keep the faces flagged in `keep`, rewriting face references.
    pub fn retain_faces(&mut self, keep: &[bool]) -> IndexMap {
        let map = IndexMap::from_keep(keep);
        retain_flagged(&mut self.faces, keep);

        for face in &mut self.faces {
            for slot in &mut face.nbr {
                *slot = slot.and_then(|f| map.get(f));
            }
        }
        for el in &mut self.elements {
            for slot in &mut el.faces {
                *slot = slot.and_then(|f| map.get(f));
            }
        }
        for set in &mut self.surfaces {
            set.remap(&map);
        }
        map
    }

    /// Keep the edges flagged in `keep`, rewriting edge references.
    pub fn retain_edges(&mut self, keep: &[bool]) -> IndexMap {
        let map = IndexMap::from_keep(keep);
        retain_flagged(&mut self.edges, keep);

        for edge in &mut self.edges {
            for slot in &mut edge.nbr {
                *slot = slot.and_then(|e| map.get(e));
            }
        }
        for set in &mut self.edge_sets {
            set.remap(&map);
        }
        map
    }
}

fn retain_flagged<T>(items: &mut Vec<T>, keep: &[bool]) {
    let mut i = 0;
    items.retain(|_| {
        let k = keep.get(i).copied().unwrap_or(true);
        i += 1;
        k
    });
}

/// Build a structured block of `nx * ny * nz` unit HEX8 elements.
///
/// Nodes are laid out x-fastest; all elements are in partition 0.
///
/// # Example
///
/// ```
/// use mesh_types::hex_block;
///
/// let mesh = hex_block(2, 1, 1);
/// assert_eq!(mesh.node_count(), 12);
/// assert_eq!(mesh.element_count(), 2);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn hex_block(nx: usize, ny: usize, nz: usize) -> FeMesh {
    let mut mesh = FeMesh::with_capacity((nx + 1) * (ny + 1) * (nz + 1), nx * ny * nz);
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                mesh.nodes
                    .push(Node::from_coords(i as f64, j as f64, k as f64));
            }
        }
    }

    let id = |i: usize, j: usize, k: usize| (k * (ny + 1) + j) * (nx + 1) + i;
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let nodes = [
                    id(i, j, k),
                    id(i + 1, j, k),
                    id(i + 1, j + 1, k),
                    id(i, j + 1, k),
                    id(i, j, k + 1),
                    id(i + 1, j, k + 1),
                    id(i + 1, j + 1, k + 1),
                    id(i, j + 1, k + 1),
                ];
                mesh.elements.push(Element::new(ElementType::Hex8, &nodes));
            }
        }
    }
    mesh
}

//! Node-to-item lookup tables in compressed sparse row layout.
//!
//! Each table is built in two passes: count how many items touch every node
//! and turn the counts into offsets, then scatter the (item, local node)
//! pairs into their buckets. Building is linear in the number of node
//! references.

use mesh_types::FeMesh;

/// One occurrence of a node inside an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef {
    /// Item index (element, face, or edge).
    pub item: usize,
    /// Position of the node in the item's node list.
    pub local: usize,
}

/// Node-to-item table.
///
/// # Example
///
/// ```
/// use mesh_topology::NodeLookup;
/// use mesh_types::hex_block;
///
/// let mesh = hex_block(2, 1, 1);
/// let table = NodeLookup::for_elements(&mesh);
///
/// // Nodes on the shared face belong to both hexes.
/// assert_eq!(table.valence(1), 2);
/// assert_eq!(table.valence(0), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NodeLookup {
    offsets: Vec<usize>,
    refs: Vec<NodeRef>,
}

impl NodeLookup {
    /// Build a table from per-item node lists.
    ///
    /// `nodes_of(i)` returns the nodes of item `i`, or `None` to leave the
    /// item out. Node indices at or beyond `node_count` are ignored.
    pub fn build<'a, F>(node_count: usize, item_count: usize, nodes_of: F) -> Self
    where
        F: Fn(usize) -> Option<&'a [usize]>,
    {
        let mut offsets = vec![0usize; node_count + 1];
        for i in 0..item_count {
            if let Some(nodes) = nodes_of(i) {
                for &n in nodes.iter().filter(|&&n| n < node_count) {
                    offsets[n + 1] += 1;
                }
            }
        }
        for n in 0..node_count {
            offsets[n + 1] += offsets[n];
        }

        let mut cursor = offsets.clone();
        let mut refs = vec![NodeRef { item: 0, local: 0 }; offsets[node_count]];
        for i in 0..item_count {
            if let Some(nodes) = nodes_of(i) {
                for (local, &n) in nodes.iter().enumerate() {
                    if n < node_count {
                        refs[cursor[n]] = NodeRef { item: i, local };
                        cursor[n] += 1;
                    }
                }
            }
        }

        Self { offsets, refs }
    }

    /// Node-to-element table.
    #[must_use]
    pub fn for_elements(mesh: &FeMesh) -> Self {
        Self::build(mesh.node_count(), mesh.element_count(), |i| {
            Some(mesh.elements[i].nodes.as_slice())
        })
    }

    /// Node-to-face table.
    #[must_use]
    pub fn for_faces(mesh: &FeMesh) -> Self {
        Self::build(mesh.node_count(), mesh.face_count(), |i| {
            Some(mesh.faces[i].nodes.as_slice())
        })
    }

    /// Node-to-edge table over the two end nodes of each edge.
    ///
    /// With `exterior_only`, interior edges are left out.
    #[must_use]
    pub fn for_edges(mesh: &FeMesh, exterior_only: bool) -> Self {
        Self::build(mesh.node_count(), mesh.edge_count(), |i| {
            let edge = &mesh.edges[i];
            (!exterior_only || edge.exterior).then(|| &edge.nodes[..2])
        })
    }

    /// All references to `node`, in item order.
    #[inline]
    #[must_use]
    pub fn refs(&self, node: usize) -> &[NodeRef] {
        match (self.offsets.get(node), self.offsets.get(node + 1)) {
            (Some(&start), Some(&end)) => &self.refs[start..end],
            _ => &[],
        }
    }

    /// Item indices that reference `node`.
    pub fn items(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.refs(node).iter().map(|r| r.item)
    }

    /// Number of items that reference `node`.
    #[inline]
    #[must_use]
    pub fn valence(&self, node: usize) -> usize {
        self.refs(node).len()
    }

    /// Number of nodes covered by the table.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Total number of references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Returns `true` if the table holds no references.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

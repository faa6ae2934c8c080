//! Appending one mesh to another.

use mesh_types::{FeMesh, ItemList, ListKind, Partitioned};
use tracing::debug;

/// Where the attached mesh's items start in the combined arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachOffsets {
    /// Index of the first attached node.
    pub nodes: usize,
    /// Index of the first attached edge.
    pub edges: usize,
    /// Index of the first attached face.
    pub faces: usize,
    /// Index of the first attached element.
    pub elements: usize,
}

/// Offset added to the attached items' assigned partition ids: the current
/// largest id plus one.
fn gid_offset<T: Partitioned>(items: &[T]) -> i32 {
    items.iter().map(Partitioned::gid).max().map_or(0, |g| g.max(-1) + 1)
}

fn shift_gid(gid: i32, offset: i32) -> i32 {
    if gid >= 0 { gid + offset } else { gid }
}

fn shifted_lists<K: ListKind>(lists: &[ItemList<K>], offset: usize) -> Vec<ItemList<K>> {
    lists
        .iter()
        .map(|list| {
            ItemList::new(
                list.name.clone(),
                list.items.iter().map(|&i| i + offset).collect(),
            )
        })
        .collect()
}

/// Append `other` to `mesh`.
///
/// Every index in the attached items is offset by the current array
/// lengths, and every assigned partition id by the current largest id plus
/// one, so the two meshes keep separate parts, surfaces, curves, and feature
/// points. Node positions are mapped through `other`'s local-to-global
/// transform and then `mesh`'s global-to-local transform. Named item lists
/// are carried over.
///
/// The seam is not merged and no topology is rebuilt; see
/// [`attach_and_weld`](crate::attach_and_weld) for that.
///
/// # Example
///
/// ```
/// use mesh_edit::attach;
/// use mesh_types::hex_block;
///
/// let mut mesh = hex_block(1, 1, 1);
/// let offsets = attach(&mut mesh, &hex_block(2, 1, 1));
///
/// assert_eq!(offsets.nodes, 8);
/// assert_eq!(mesh.node_count(), 20);
/// assert_eq!(mesh.elements[1].gid, 1);
/// ```
pub fn attach(mesh: &mut FeMesh, other: &FeMesh) -> AttachOffsets {
    let offsets = AttachOffsets {
        nodes: mesh.node_count(),
        edges: mesh.edge_count(),
        faces: mesh.face_count(),
        elements: mesh.element_count(),
    };
    let node_gid = gid_offset(&mesh.nodes);
    let edge_gid = gid_offset(&mesh.edges);
    let face_gid = gid_offset(&mesh.faces);
    let element_gid = gid_offset(&mesh.elements);

    let to_local = mesh.transform;
    mesh.nodes.extend(other.nodes.iter().map(|n| {
        let mut node = n.clone();
        node.position = to_local.global_to_local(&other.transform.local_to_global(&n.position));
        node.gid = shift_gid(n.gid, node_gid);
        node
    }));

    let shift = |slot: Option<usize>, by: usize| slot.map(|i| i + by);

    mesh.elements.extend(other.elements.iter().map(|e| {
        let mut el = e.clone();
        el.gid = shift_gid(e.gid, element_gid);
        el.nodes.iter_mut().for_each(|n| *n += offsets.nodes);
        el.nbr = e.nbr.map(|s| shift(s, offsets.elements));
        el.faces = e.faces.map(|s| shift(s, offsets.faces));
        el
    }));

    mesh.faces.extend(other.faces.iter().map(|f| {
        let mut face = f.clone();
        face.gid = shift_gid(f.gid, face_gid);
        face.nodes.iter_mut().for_each(|n| *n += offsets.nodes);
        face.nbr = f.nbr.map(|s| shift(s, offsets.faces));
        for owner in face.owners.iter_mut().flatten() {
            owner.element += offsets.elements;
        }
        face
    }));

    mesh.edges.extend(other.edges.iter().map(|e| {
        let mut edge = e.clone();
        edge.gid = shift_gid(e.gid, edge_gid);
        edge.nodes.iter_mut().for_each(|n| *n += offsets.nodes);
        edge.nbr = e.nbr.map(|s| shift(s, offsets.edges));
        edge.element = shift(e.element, offsets.elements);
        edge
    }));

    mesh.node_sets.extend(shifted_lists(&other.node_sets, offsets.nodes));
    mesh.edge_sets.extend(shifted_lists(&other.edge_sets, offsets.edges));
    mesh.surfaces.extend(shifted_lists(&other.surfaces, offsets.faces));
    mesh.element_sets.extend(shifted_lists(&other.element_sets, offsets.elements));

    debug!(
        "Attached {} nodes and {} elements",
        other.node_count(),
        other.element_count()
    );
    offsets
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_topology::{MeshBuilder, validate_topology};
    use mesh_types::{MeshTransform, NodeSet, Vector3, hex_block};

    fn rebuilt(nx: usize) -> FeMesh {
        let mut mesh = hex_block(nx, 1, 1);
        MeshBuilder::default().rebuild(&mut mesh).unwrap();
        mesh
    }

    #[test]
    fn offsets_indices_and_partitions() {
        let mut mesh = rebuilt(1);
        let other = rebuilt(2);
        let before = (mesh.count_face_partitions(), mesh.count_node_partitions());

        let offsets = attach(&mut mesh, &other);
        assert_eq!(offsets.elements, 1);
        assert_eq!(mesh.element_count(), 3);
        assert_eq!(mesh.elements[2].nodes[0], 8 + other.elements[1].nodes[0]);
        assert_eq!(mesh.elements[2].nbr[3], Some(1));
        assert_eq!(mesh.elements[1].gid, 1);

        let face = &mesh.faces[offsets.faces];
        assert_eq!(face.gid, other.faces[0].gid + i32::try_from(before.0).unwrap());
        assert_eq!(
            face.owners[0].unwrap().element,
            1 + other.faces[0].owners[0].unwrap().element
        );
        let first_node_gid = i32::try_from(before.1).unwrap();
        assert!(mesh.nodes[8..].iter().all(|n| n.gid == -1 || n.gid >= first_node_gid));

        // both halves stay internally consistent
        assert!(validate_topology(&mesh).is_consistent());
    }

    #[test]
    fn unassigned_ids_stay_unassigned() {
        let mut mesh = hex_block(1, 1, 1);
        attach(&mut mesh, &hex_block(1, 1, 1));
        assert!(mesh.nodes.iter().all(|n| n.gid == -1));
    }

    #[test]
    fn maps_positions_between_frames() {
        let mut mesh = hex_block(1, 1, 1);
        mesh.transform = MeshTransform::from_translation(Vector3::new(10.0, 0.0, 0.0));
        let mut other = hex_block(1, 1, 1);
        other.transform = MeshTransform::from_translation(Vector3::new(11.0, 0.0, 0.0));

        attach(&mut mesh, &other);
        // other's origin sits one unit along x in mesh's frame
        assert_relative_eq!(mesh.nodes[8].position.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.nodes[9].position.x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn carries_item_lists() {
        let mut mesh = hex_block(1, 1, 1);
        let mut other = hex_block(1, 1, 1);
        other.node_sets.push(NodeSet::new("fixed", vec![0, 3]));

        attach(&mut mesh, &other);
        assert_eq!(mesh.node_sets.len(), 1);
        assert_eq!(mesh.node_sets[0].items, vec![8, 11]);
        assert!(mesh.node_sets[0].validate(&mesh).is_ok());
    }
}

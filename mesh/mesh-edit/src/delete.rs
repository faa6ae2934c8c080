//! Deletion with cascade, and isolated node cleanup.
//!
//! Deleting a node deletes the elements that use it, and deleting a face
//! deletes its owners, so every entry point funnels into element deletion.
//! Faces, edges, and nodes that lose their last element go with it.

use mesh_topology::{
    MeshBuilder, NodeLookup, mark_exterior_elements, rebuild_edge_data, rebuild_face_data,
    update_edge_partitions, update_element_neighbors, update_element_partitions,
    update_face_partitions, update_node_partitions,
};
use mesh_types::{Face, FeMesh, IndexMap};
use tracing::{debug, info, warn};

use crate::EditResult;

/// Nodes listed in any node set.
fn listed_nodes(mesh: &FeMesh) -> Vec<bool> {
    let mut listed = vec![false; mesh.node_count()];
    for &n in mesh.node_sets.iter().flat_map(|set| set.items.iter()) {
        if let Some(l) = listed.get_mut(n) {
            *l = true;
        }
    }
    listed
}

fn element_use(mesh: &FeMesh) -> Vec<bool> {
    let mut used = vec![false; mesh.node_count()];
    for el in &mesh.elements {
        for &n in &el.nodes {
            if let Some(u) = used.get_mut(n) {
                *u = true;
            }
        }
    }
    used
}

/// Remove nodes that no element references.
///
/// Nodes with an assigned partition and nodes listed in a node set are kept.
/// Element, face, edge, and node set references are remapped and node
/// partitions renumbered. The returned map gives each old node's new index;
/// [`IndexMap::removed_count`] is the number of removed nodes.
///
/// # Example
///
/// ```
/// use mesh_edit::remove_isolated_nodes;
/// use mesh_types::{Point3, hex_block};
///
/// let mut mesh = hex_block(1, 1, 1);
/// mesh.nodes.insert(0, Point3::new(5.0, 5.0, 5.0).into());
/// for n in mesh.elements[0].nodes.iter_mut() {
///     *n += 1;
/// }
///
/// let map = remove_isolated_nodes(&mut mesh);
/// assert_eq!(map.removed_count(), 1);
/// assert_eq!(mesh.elements[0].nodes[0], 0);
/// ```
pub fn remove_isolated_nodes(mesh: &mut FeMesh) -> IndexMap {
    let used = element_use(mesh);
    let listed = listed_nodes(mesh);
    let keep: Vec<bool> = (0..mesh.node_count())
        .map(|i| used[i] || listed[i] || mesh.nodes[i].gid >= 0)
        .collect();

    let map = mesh.retain_nodes(&keep);
    update_node_partitions(mesh);
    debug!("Removed {} isolated nodes", map.removed_count());
    map
}

/// Delete the elements tagged `tag` and rebuild the topology.
///
/// Nodes used only by deleted elements are removed unless listed in a node
/// set. Element partitions are renumbered. Returns the number of deleted
/// elements; nothing changes when no element is tagged.
///
/// # Errors
///
/// Returns an error if an element type is not registered with `builder`;
/// the mesh is not modified in that case.
pub fn delete_tagged_elements(
    mesh: &mut FeMesh,
    tag: i32,
    builder: &MeshBuilder,
) -> EditResult<usize> {
    builder.shapes(mesh)?;

    let doomed: Vec<bool> = mesh.elements.iter().map(|el| el.tag == tag).collect();
    let count = doomed.iter().filter(|&&d| d).count();
    if count == 0 {
        return Ok(0);
    }

    let mut orphaned = vec![false; mesh.node_count()];
    for (el, _) in mesh.elements.iter().zip(&doomed).filter(|(_, d)| **d) {
        for &n in &el.nodes {
            if let Some(o) = orphaned.get_mut(n) {
                *o = true;
            }
        }
    }

    mesh.clear_topology();
    let keep: Vec<bool> = doomed.iter().map(|d| !d).collect();
    mesh.retain_elements(&keep);
    update_element_partitions(mesh);

    let used = element_use(mesh);
    let listed = listed_nodes(mesh);
    let keep_nodes: Vec<bool> = (0..mesh.node_count())
        .map(|i| !orphaned[i] || used[i] || listed[i])
        .collect();
    mesh.retain_nodes(&keep_nodes);

    builder.rebuild(mesh)?;
    info!("Deleted {} elements", count);
    Ok(count)
}

/// Delete the owners of every face tagged `tag`.
///
/// Returns the number of deleted elements.
///
/// # Errors
///
/// Returns an error if an element type is not registered with `builder`.
pub fn delete_tagged_faces(
    mesh: &mut FeMesh,
    tag: i32,
    builder: &MeshBuilder,
) -> EditResult<usize> {
    for el in &mut mesh.elements {
        el.tag = 0;
    }
    let owners: Vec<usize> = mesh
        .faces
        .iter()
        .filter(|f| f.tag == tag)
        .flat_map(Face::owner_elements)
        .collect();
    for e in owners {
        match mesh.elements.get_mut(e) {
            Some(el) => el.tag = 1,
            None => warn!("Skipping stale face owner {}", e),
        }
    }
    delete_tagged_elements(mesh, 1, builder)
}

/// Delete every element that uses a node tagged `tag`.
///
/// Returns the number of deleted elements.
///
/// # Errors
///
/// Returns an error if an element type is not registered with `builder`.
pub fn delete_tagged_nodes(
    mesh: &mut FeMesh,
    tag: i32,
    builder: &MeshBuilder,
) -> EditResult<usize> {
    let FeMesh { nodes, elements, .. } = mesh;
    for el in elements.iter_mut() {
        let hit = el
            .nodes
            .iter()
            .any(|&n| nodes.get(n).is_some_and(|node| node.tag == tag));
        el.tag = i32::from(hit);
    }
    delete_tagged_elements(mesh, 1, builder)
}

/// Return a copy of `mesh` without the elements in partitions `parts`.
///
/// Unlike [`delete_tagged_elements`], the surviving faces and edges keep
/// their partitions. Removed are:
///
/// - faces whose owners all lie in deleted parts
/// - edges used only by deleted elements
/// - nodes used only by deleted elements
///
/// Element, face, edge, and node data are then re-derived. Nodes at the
/// cut ends of feature curves become feature points, and all partitions are
/// renumbered.
///
/// # Errors
///
/// Returns an error if an element type is not registered with `builder`.
///
/// # Example
///
/// ```
/// use mesh_edit::delete_parts;
/// use mesh_topology::MeshBuilder;
/// use mesh_types::hex_block;
///
/// let mut mesh = hex_block(2, 1, 1);
/// mesh.elements[1].gid = 1;
/// let builder = MeshBuilder::default();
/// builder.rebuild(&mut mesh).unwrap();
///
/// let rest = delete_parts(&mesh, &[1], &builder).unwrap();
/// assert_eq!(rest.element_count(), 1);
/// assert_eq!(rest.node_count(), 8);
/// assert_eq!(rest.face_count(), 6);
/// ```
pub fn delete_parts(mesh: &FeMesh, parts: &[i32], builder: &MeshBuilder) -> EditResult<FeMesh> {
    builder.shapes(mesh)?;
    let mut mesh = mesh.clone();

    let doomed: Vec<bool> = mesh.elements.iter().map(|el| parts.contains(&el.gid)).collect();
    let count = doomed.iter().filter(|&&d| d).count();

    // nodes and edges survive if any kept element uses them
    let mut node_state: Vec<Option<bool>> = vec![None; mesh.node_count()];
    for (el, &d) in mesh.elements.iter().zip(&doomed) {
        for &n in &el.nodes {
            if let Some(state) = node_state.get_mut(n) {
                *state = Some(state.unwrap_or(true) && d);
            }
        }
    }
    let keep_nodes: Vec<bool> = node_state.iter().map(|s| s != &Some(true)).collect();

    let lookup = NodeLookup::for_elements(&mesh);
    let keep_edges: Vec<bool> = mesh
        .edges
        .iter()
        .map(|edge| {
            let (a, b) = (edge.n0(), edge.n1());
            let mut users = lookup
                .items(a)
                .filter(|&k| mesh.elements[k].has_node(b))
                .peekable();
            users.peek().is_none() || users.any(|k| !doomed[k])
        })
        .collect();

    let keep_faces: Vec<bool> = mesh
        .faces
        .iter()
        .map(|face| !face.owner_elements().all(|k| doomed.get(k).copied().unwrap_or(true)))
        .collect();

    let keep_elements: Vec<bool> = doomed.iter().map(|d| !d).collect();
    mesh.retain_elements(&keep_elements);
    mesh.retain_faces(&keep_faces);
    mesh.retain_edges(&keep_edges);
    mesh.retain_nodes(&keep_nodes);

    let shapes = builder.shapes(&mesh)?;
    update_element_neighbors(&mut mesh, &shapes);
    mark_exterior_elements(&mut mesh, &shapes);
    rebuild_face_data(&mut mesh, &shapes);
    rebuild_edge_data(&mut mesh);

    let mut next = i32::try_from(mesh.count_node_partitions()).unwrap_or(i32::MAX);
    for i in 0..mesh.edge_count() {
        let edge = &mesh.edges[i];
        if edge.gid < 0 {
            continue;
        }
        let open: Vec<usize> = (0..2)
            .filter(|&j| edge.nbr[j].is_none())
            .map(|j| edge.nodes[j])
            .collect();
        for n in open {
            let node = &mut mesh.nodes[n];
            if node.gid < 0 {
                node.gid = next;
                next += 1;
            }
        }
    }
    builder.rebuild_node_data(&mut mesh);

    update_element_partitions(&mut mesh);
    update_face_partitions(&mut mesh);
    update_edge_partitions(&mut mesh);
    update_node_partitions(&mut mesh);

    info!(
        "Deleted {} elements in {} parts, {} remain",
        count,
        parts.len(),
        mesh.element_count()
    );
    Ok(mesh)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mesh_topology::validate_topology;
    use mesh_types::{ElementRegistry, ElementType, MeshError, NodeSet, Point3, hex_block};

    fn rebuilt(mut mesh: FeMesh) -> FeMesh {
        MeshBuilder::default().rebuild(&mut mesh).unwrap();
        mesh
    }

    fn two_parts() -> FeMesh {
        let mut mesh = hex_block(2, 1, 1);
        mesh.elements[1].gid = 1;
        rebuilt(mesh)
    }

    #[test]
    fn isolated_nodes_are_removed_unless_protected() {
        let mut mesh = hex_block(1, 1, 1);
        mesh.add_node(Point3::new(9.0, 0.0, 0.0));
        mesh.nodes[8].gid = -1;
        mesh.add_node(Point3::new(9.0, 1.0, 0.0));
        mesh.nodes[9].gid = 4;
        mesh.add_node(Point3::new(9.0, 2.0, 0.0));
        mesh.nodes[10].gid = -1;
        mesh.node_sets.push(NodeSet::new("sensor", vec![10]));

        let map = remove_isolated_nodes(&mut mesh);
        assert_eq!(map.removed_count(), 1);
        assert_eq!(mesh.node_count(), 10);
        // the surviving feature node is renumbered to partition 0
        assert_eq!(mesh.nodes[8].gid, 0);
        assert_eq!(mesh.node_sets[0].items, vec![9]);
    }

    #[test]
    fn deleting_elements_cascades() {
        let mut mesh = two_parts();
        mesh.elements[1].tag = 1;

        let deleted = delete_tagged_elements(&mut mesh, 1, &MeshBuilder::default()).unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(mesh.element_count(), 1);
        assert_eq!(mesh.node_count(), 8);
        assert_eq!(mesh.face_count(), 6);
        assert!(mesh.elements.iter().all(|e| e.gid == 0));
        assert!(validate_topology(&mesh).is_consistent());
    }

    #[test]
    fn nothing_tagged_is_a_no_op() {
        let mut mesh = two_parts();
        let faces = mesh.faces.clone();
        assert_eq!(delete_tagged_elements(&mut mesh, 7, &MeshBuilder::default()).unwrap(), 0);
        assert_eq!(mesh.faces, faces);
    }

    #[test]
    fn unregistered_type_aborts_before_mutation() {
        let mut mesh = two_parts();
        mesh.elements[0].tag = 1;
        let builder = MeshBuilder::new(ElementRegistry::standard().without(ElementType::Hex8));

        let err = delete_tagged_elements(&mut mesh, 1, &builder).unwrap_err();
        assert!(matches!(
            err,
            crate::EditError::Topology(mesh_topology::TopologyError::Mesh(
                MeshError::UnsupportedElementType { .. }
            ))
        ));
        assert_eq!(mesh.element_count(), 2);
    }

    #[test]
    fn deleting_a_face_deletes_its_owners() {
        let mut mesh = two_parts();
        let interface = mesh.faces.iter().position(|f| !f.exterior).unwrap();
        mesh.faces[interface].tag = 3;

        let deleted = delete_tagged_faces(&mut mesh, 3, &MeshBuilder::default()).unwrap();
        assert_eq!(deleted, 2);
        assert!(mesh.is_empty());
    }

    #[test]
    fn deleting_a_node_deletes_its_elements() {
        let mut mesh = rebuilt(hex_block(3, 1, 1));
        // node 0 belongs to the first element only
        mesh.nodes[0].tag = 1;

        let deleted = delete_tagged_nodes(&mut mesh, 1, &MeshBuilder::default()).unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(mesh.element_count(), 2);
        assert_eq!(mesh.node_count(), 12);
    }

    #[test]
    fn delete_parts_keeps_the_original() {
        let mesh = two_parts();
        let rest = delete_parts(&mesh, &[0], &MeshBuilder::default()).unwrap();

        assert_eq!(mesh.element_count(), 2);
        assert_eq!(rest.element_count(), 1);
        assert_eq!(rest.elements[0].gid, 0);
        // the interface face survives as the new boundary
        assert_eq!(rest.face_count(), 6);
        assert!(rest.faces.iter().all(|f| f.exterior && f.owner_count() == 1));
        assert!(validate_topology(&rest).is_consistent());
    }

    #[test]
    fn delete_parts_leaves_no_trace_of_the_part() {
        let mut mesh = hex_block(3, 1, 1);
        mesh.elements[1].gid = 1;
        mesh.elements[2].gid = 2;
        let mesh = rebuilt(mesh);

        let rest = delete_parts(&mesh, &[1], &MeshBuilder::default()).unwrap();
        assert_eq!(rest.element_count(), 2);
        assert_eq!(rest.node_count(), 16);
        assert_eq!(rest.count_element_partitions(), 2);
        assert!(rest.faces.iter().all(|f| f.owner_count() == 1));
        assert!(validate_topology(&rest).is_consistent());
    }
}

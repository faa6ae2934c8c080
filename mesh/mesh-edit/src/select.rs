//! Partitioning driven by a tagged selection, and shell construction.
//!
//! Each operation assigns the tagged items to a new partition, or to an
//! existing one when a valid id is given, and then re-derives whatever
//! depends on that partition: edges after faces, nodes after edges. Node
//! partitions that existed beforehand keep their ids where possible.

// Partition ids are i32 by data model; counts never approach i32::MAX.
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use mesh_topology::{
    MeshBuilder, RebuildSummary, auto_partition_edges, auto_partition_nodes, build_edges,
    mark_exterior_nodes, update_edge_neighbors, update_edge_partitions,
    update_element_partitions, update_face_element_table, update_face_neighbors,
    update_face_partitions, update_node_partitions,
};
use mesh_types::{ElementType, FeMesh, ItemKind, MeshError};
use tracing::{debug, info};

use crate::{EditError, EditResult};

/// `gid` when it names an existing partition, otherwise a fresh id.
fn target_id(gid: Option<i32>, count: usize) -> i32 {
    let count = count as i32;
    gid.filter(|g| (0..count).contains(g)).unwrap_or(count)
}

/// Move the faces tagged `tag` into one surface.
///
/// Face partitions are renumbered, then edges are rebuilt and partitioned
/// into curves and feature nodes re-derived. Returns the surface id.
///
/// # Errors
///
/// Returns [`EditError::EmptySelection`] if no face is tagged.
pub fn partition_face_selection(mesh: &mut FeMesh, tag: i32, gid: Option<i32>) -> EditResult<i32> {
    let Some(first) = mesh.faces.iter().position(|f| f.tag == tag) else {
        return Err(EditError::EmptySelection {
            kind: ItemKind::Face,
            tag,
        });
    };

    let id = target_id(gid, mesh.count_face_partitions());
    for face in mesh.faces.iter_mut().filter(|f| f.tag == tag) {
        face.gid = id;
    }
    update_face_partitions(mesh);

    build_edges(mesh);
    auto_partition_edges(mesh, None);
    auto_partition_nodes(mesh);
    mark_exterior_nodes(mesh);

    let id = mesh.faces[first].gid;
    info!("Face selection moved to surface {}", id);
    Ok(id)
}

/// Move the edges tagged `tag` into one feature curve.
///
/// The edges become exterior, edge partitions are renumbered, edge neighbors
/// re-linked, and feature nodes re-derived. Returns the curve id.
///
/// # Errors
///
/// Returns [`EditError::EmptySelection`] if no edge is tagged.
pub fn partition_edge_selection(mesh: &mut FeMesh, tag: i32, gid: Option<i32>) -> EditResult<i32> {
    let Some(first) = mesh.edges.iter().position(|e| e.tag == tag) else {
        return Err(EditError::EmptySelection {
            kind: ItemKind::Edge,
            tag,
        });
    };

    let id = target_id(gid, mesh.count_edge_partitions());
    for edge in mesh.edges.iter_mut().filter(|e| e.tag == tag) {
        edge.gid = id;
        edge.exterior = true;
    }
    update_edge_partitions(mesh);
    update_edge_neighbors(mesh);
    auto_partition_nodes(mesh);
    mark_exterior_nodes(mesh);

    let id = mesh.edges[first].gid;
    info!("Edge selection moved to curve {}", id);
    Ok(id)
}

/// Move the elements tagged `tag` into one part.
///
/// Where a selected solid now meets an element of another part, an
/// interface face is created; interfaces between elements that now share a
/// part are dropped. The selection's existing faces are split off into
/// surfaces of their own and new interfaces are grouped by connectivity.
/// Edges are rebuilt, and node partitions that existed before keep their
/// ids while new feature nodes are numbered after them. Returns the part id.
///
/// # Errors
///
/// Returns [`EditError::EmptySelection`] if no element is tagged, or an
/// error if an element type is not registered with `builder`. Nothing is
/// modified in either case.
pub fn partition_element_selection(
    mesh: &mut FeMesh,
    tag: i32,
    gid: Option<i32>,
    builder: &MeshBuilder,
) -> EditResult<i32> {
    let shapes = builder.shapes(mesh)?;
    let selected: Vec<bool> = mesh.elements.iter().map(|e| e.tag == tag).collect();
    let Some(first) = selected.iter().position(|&s| s) else {
        return Err(EditError::EmptySelection {
            kind: ItemKind::Element,
            tag,
        });
    };
    let is_selected = |e: usize| selected.get(e).copied().unwrap_or(false);

    let id = target_id(gid, mesh.count_element_partitions());
    let surfaces = mesh.count_face_partitions() as i32;
    for face in &mut mesh.faces {
        if face.gid >= 0 && face.owner_elements().any(is_selected) {
            face.gid += surfaces;
        }
    }
    for el in mesh.elements.iter_mut().filter(|e| e.tag == tag) {
        el.gid = id;
    }

    // interfaces that no longer separate two parts
    let keep: Vec<bool> = mesh
        .faces
        .iter()
        .map(|f| {
            let owners: Vec<usize> = f.owner_elements().collect();
            owners.len() < 2
                || owners.iter().any(|&e| !mesh.elements[e].is_solid())
                || owners.iter().any(|&e| mesh.elements[e].gid != id)
        })
        .collect();
    let dropped = mesh.retain_faces(&keep).removed_count();

    let mut added = Vec::new();
    for (i, el) in mesh.elements.iter().enumerate() {
        if !selected[i] || !el.is_solid() {
            continue;
        }
        let shape = shapes.get(i);
        for j in 0..shape.face_count() {
            let open = el.faces[j].is_none();
            let other_part = el.nbr[j].is_some_and(|k| mesh.elements[k].gid != id);
            if !(open && other_part) {
                continue;
            }
            if let Some(mut face) = el.local_face(shape, j) {
                face.gid = -1;
                added.push(face);
            }
        }
    }
    debug!(
        "Selection adds {} interface faces and drops {}",
        added.len(),
        dropped
    );
    mesh.faces.extend(added);

    update_element_partitions(mesh);
    update_face_element_table(mesh, &shapes);
    update_face_neighbors(mesh);
    group_unassigned_faces(mesh);
    update_face_partitions(mesh);

    build_edges(mesh);
    auto_partition_edges(mesh, None);

    let before: Vec<i32> = mesh.nodes.iter().map(|n| n.gid).collect();
    let offset = mesh.count_node_partitions() as i32;
    auto_partition_nodes(mesh);
    for (node, &old) in mesh.nodes.iter_mut().zip(&before) {
        if old >= 0 {
            node.gid = old;
        } else if node.gid >= 0 {
            node.gid += offset;
        }
    }
    update_node_partitions(mesh);
    mark_exterior_nodes(mesh);

    let id = mesh.elements[first].gid;
    info!("Element selection moved to part {}", id);
    Ok(id)
}

/// Give every connected group of unassigned faces a new surface id.
fn group_unassigned_faces(mesh: &mut FeMesh) {
    let mut next = mesh.faces.iter().map(|f| f.gid).max().unwrap_or(-1) + 1;
    let mut stack = Vec::new();
    for seed in 0..mesh.face_count() {
        if mesh.faces[seed].gid != -1 {
            continue;
        }
        mesh.faces[seed].gid = next;
        stack.push(seed);
        while let Some(i) = stack.pop() {
            for k in mesh.faces[i].nbr.into_iter().flatten() {
                if mesh.faces[k].gid == -1 {
                    mesh.faces[k].gid = next;
                    stack.push(k);
                }
            }
        }
        next += 1;
    }
}

/// Make node `index` a feature point.
///
/// The node takes the next node partition id. If a feature curve runs
/// through it, the curve is cut there and the part beyond the cut becomes a
/// new curve. Returns `Ok(false)` if the node already was a feature point.
///
/// # Errors
///
/// Returns [`MeshError::InvalidReference`] if `index` is out of range.
pub fn partition_node(mesh: &mut FeMesh, index: usize) -> EditResult<bool> {
    let count = mesh.node_count();
    let node = mesh
        .nodes
        .get(index)
        .ok_or(MeshError::invalid(ItemKind::Node, index, count))?;
    if node.gid >= 0 {
        return Ok(false);
    }
    mesh.nodes[index].gid = mesh.count_node_partitions() as i32;

    let through = mesh
        .edges
        .iter()
        .enumerate()
        .filter(|(_, e)| e.gid >= 0)
        .find_map(|(i, e)| e.endpoint_slot(index).map(|s| (i, s)));
    let Some((cut, slot)) = through else {
        return Ok(true);
    };
    let Some(next) = mesh.edges[cut].nbr[slot].take() else {
        return Ok(true);
    };
    let back = &mut mesh.edges[next];
    for s in 0..2 {
        if back.nbr[s] == Some(cut) && back.nodes[s] == index {
            back.nbr[s] = None;
        }
    }

    let curve = mesh.edges[cut].gid;
    let split = mesh.count_edge_partitions() as i32;
    let (mut current, mut from) = (next, index);
    for _ in 0..mesh.edge_count() {
        let edge = &mut mesh.edges[current];
        if edge.gid != curve {
            break;
        }
        edge.gid = split;
        let Some(s) = edge.endpoint_slot(from) else {
            break;
        };
        from = edge.nodes[1 - s];
        match edge.nbr[1 - s] {
            Some(k) => current = k,
            None => break,
        }
    }
    update_edge_partitions(mesh);
    debug!("Node {} split curve {}", index, curve);
    Ok(true)
}

/// Apply [`partition_node`] to every listed node.
///
/// Returns the number of nodes that became feature points.
///
/// # Errors
///
/// Returns [`MeshError::InvalidReference`] if a listed node is out of
/// range; nothing is modified in that case.
pub fn partition_nodes(mesh: &mut FeMesh, nodes: &[usize]) -> EditResult<usize> {
    let count = mesh.node_count();
    if let Some(&bad) = nodes.iter().find(|&&n| n >= count) {
        return Err(MeshError::invalid(ItemKind::Node, bad, count).into());
    }
    let mut created = 0;
    for &n in nodes {
        created += usize::from(partition_node(mesh, n)?);
    }
    Ok(created)
}

/// Append TRI3 shells, three node indices each, and rebuild the topology.
///
/// # Errors
///
/// Returns [`MeshError::NodeCountMismatch`] if the list length is not a
/// multiple of three, [`MeshError::InvalidReference`] for an out-of-range
/// node, or an error from the rebuild. Nothing is added on a list error.
///
/// # Example
///
/// ```
/// use mesh_edit::add_triangles;
/// use mesh_topology::MeshBuilder;
/// use mesh_types::{FeMesh, Point3};
///
/// let mut mesh = FeMesh::new();
/// for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]] {
///     mesh.add_node(Point3::from(p));
/// }
/// let summary = add_triangles(&mut mesh, &[0, 1, 2, 0, 2, 3], &MeshBuilder::default()).unwrap();
/// assert_eq!(summary.elements, 2);
/// assert_eq!(summary.faces, 2);
/// ```
pub fn add_triangles(
    mesh: &mut FeMesh,
    nodes: &[usize],
    builder: &MeshBuilder,
) -> EditResult<RebuildSummary> {
    let rest = nodes.len() % 3;
    if rest != 0 {
        return Err(MeshError::NodeCountMismatch {
            element_type: ElementType::Tri3,
            expected: 3,
            actual: rest,
        }
        .into());
    }
    let count = mesh.node_count();
    if let Some(&bad) = nodes.iter().find(|&&n| n >= count) {
        return Err(MeshError::invalid(ItemKind::Node, bad, count).into());
    }

    for tri in nodes.chunks_exact(3) {
        mesh.add_element(ElementType::Tri3, tri)?;
    }
    Ok(builder.rebuild(mesh)?)
}

//! Partitioning of elements, faces, edges, and nodes.
//!
//! Every pass is a connected-component labeling with an explicit stack:
//! reset the candidates to unassigned, flood from the next unassigned item
//! through neighbor links that pass a gating test, then move to the next
//! label. The renumbering passes close the gaps deletions leave behind.

// Partition ids are i32 by data model; counts never approach i32::MAX.
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use mesh_types::{
    ElementClass, FeMesh, ItemKind, MeshError, ShapeTable, compact_ids, compact_partitions,
};
use nalgebra::Vector3;
use tracing::debug;

use crate::{TopologyResult, build_edges, mark_exterior_nodes, rebuild_edge_data};

/// Slack on cosine thresholds so coplanar faces survive rounding.
const COS_TOLERANCE: f64 = 1e-12;

fn cos_threshold(angle_deg: f64) -> f64 {
    angle_deg.to_radians().cos() - COS_TOLERANCE
}

// ============================================================================
// Renumbering
// ============================================================================

/// Renumber node partitions to `0..N`. Returns N.
pub fn update_node_partitions(mesh: &mut FeMesh) -> usize {
    compact_partitions(&mut mesh.nodes)
}

/// Renumber edge partitions to `0..N`. Returns N.
pub fn update_edge_partitions(mesh: &mut FeMesh) -> usize {
    compact_partitions(&mut mesh.edges)
}

/// Renumber face partitions to `0..N`. Returns N.
pub fn update_face_partitions(mesh: &mut FeMesh) -> usize {
    compact_partitions(&mut mesh.faces)
}

/// Renumber element partitions to `0..N`. Returns N.
pub fn update_element_partitions(mesh: &mut FeMesh) -> usize {
    compact_partitions(&mut mesh.elements)
}

/// Renumber face smoothing ids to `0..N`. Returns N.
pub fn update_smoothing_groups(mesh: &mut FeMesh) -> usize {
    compact_ids(&mut mesh.faces, |f| f.sid, |f, sid| f.sid = sid)
}

// ============================================================================
// Elements
// ============================================================================

/// Assign element partitions by connectivity.
///
/// Solids flood through their face slots and shells through their edge
/// slots. Beams are never flooded through; they all join one extra
/// partition after the rest. Returns the partition count.
pub fn auto_partition_elements(mesh: &mut FeMesh, shapes: &ShapeTable) -> usize {
    for el in &mut mesh.elements {
        el.gid = -1;
    }

    let mut label = 0i32;
    let mut stack = Vec::new();
    for seed in 0..mesh.element_count() {
        let el = &mesh.elements[seed];
        if el.gid != -1 || el.is_beam() {
            continue;
        }
        mesh.elements[seed].gid = label;
        stack.push(seed);
        while let Some(i) = stack.pop() {
            let slots = shapes.get(i).neighbor_slots();
            for j in 0..slots {
                let Some(k) = mesh.elements[i].nbr[j] else {
                    continue;
                };
                let pe = &mut mesh.elements[k];
                if pe.gid == -1 && pe.class() != ElementClass::Beam {
                    pe.gid = label;
                    stack.push(k);
                }
            }
        }
        label += 1;
    }

    let mut has_beams = false;
    for el in mesh.elements.iter_mut().filter(|el| el.is_beam()) {
        el.gid = label;
        has_beams = true;
    }
    if has_beams {
        label += 1;
    }

    let count = update_element_partitions(mesh);
    debug!("Auto-partitioned elements into {} parts ({} before compaction)", count, label);
    count
}

// ============================================================================
// Faces
// ============================================================================

fn owner_gid(mesh: &FeMesh, face: usize, slot: usize) -> i32 {
    mesh.faces[face].owners[slot].map_or(-1, |o| mesh.elements[o.element].gid)
}

/// Assign face partitions by connectivity and dihedral angle.
///
/// Two neighboring faces merge when they have the same pair of owner
/// partitions and the angle between their normals is at most
/// `smoothing_angle` degrees. When both faces are interior and
/// `crease_internal` is off, the angle test is skipped. Returns the
/// partition count.
pub fn auto_partition_surface(
    mesh: &mut FeMesh,
    smoothing_angle: f64,
    crease_internal: bool,
) -> usize {
    let eps = cos_threshold(smoothing_angle);
    let normals: Vec<Vector3<f64>> = (0..mesh.face_count()).map(|i| mesh.face_normal(i)).collect();

    for face in &mut mesh.faces {
        face.gid = -1;
    }

    let mut label = 0i32;
    let mut stack = Vec::new();
    for seed in 0..mesh.face_count() {
        if mesh.faces[seed].gid != -1 {
            continue;
        }
        mesh.faces[seed].gid = -2;
        stack.push(seed);
        while let Some(i) = stack.pop() {
            mesh.faces[i].gid = label;
            let parts = (owner_gid(mesh, i, 0), owner_gid(mesh, i, 1));
            let exterior = mesh.faces[i].exterior;

            for j in 0..mesh.faces[i].edge_count() {
                let Some(k) = mesh.faces[i].nbr[j] else {
                    continue;
                };
                if mesh.faces[k].gid != -1 {
                    continue;
                }
                let smooth = normals[i].dot(&normals[k]) >= eps;
                let both_interior = !exterior && !mesh.faces[k].exterior;
                let angle_ok = (both_interior && !crease_internal) || smooth;
                let same_parts = parts == (owner_gid(mesh, k, 0), owner_gid(mesh, k, 1));
                if angle_ok && same_parts {
                    mesh.faces[k].gid = -2;
                    stack.push(k);
                }
            }
        }
        label += 1;
    }

    debug!(
        "Auto-partitioned surface into {} groups at {} degrees",
        label, smoothing_angle
    );
    label as usize
}

/// Split a subset of faces into new partitions by seed-normal angle.
///
/// Each unvisited listed face seeds a partition and floods to listed
/// neighbors whose normal is within `angle` degrees of the seed's normal and
/// whose primary owner is in the same part. Edges and nodes are re-derived
/// afterwards. Returns `Ok(false)` for an empty list.
///
/// # Errors
///
/// Returns [`MeshError::InvalidReference`] if a listed face is out of range.
pub fn auto_partition_face_set(
    mesh: &mut FeMesh,
    angle: f64,
    faces: &[usize],
) -> TopologyResult<bool> {
    let count = mesh.face_count();
    if let Some(&bad) = faces.iter().find(|&&f| f >= count) {
        return Err(MeshError::invalid(ItemKind::Face, bad, count).into());
    }
    if faces.is_empty() {
        return Ok(false);
    }

    let mut pending = vec![false; count];
    for &f in faces {
        pending[f] = true;
    }

    let eps = cos_threshold(angle);
    let mut label = mesh.count_face_partitions() as i32;
    let mut stack = Vec::new();
    for &seed in faces {
        if !pending[seed] {
            continue;
        }
        let normal = mesh.face_normal(seed);
        let part = owner_gid(mesh, seed, 0);
        pending[seed] = false;
        stack.push(seed);
        while let Some(i) = stack.pop() {
            mesh.faces[i].gid = label;
            for j in 0..mesh.faces[i].edge_count() {
                let Some(k) = mesh.faces[i].nbr[j] else {
                    continue;
                };
                if pending[k]
                    && normal.dot(&mesh.face_normal(k)) >= eps
                    && owner_gid(mesh, k, 0) == part
                {
                    pending[k] = false;
                    stack.push(k);
                }
            }
        }
        label += 1;
    }

    update_face_partitions(mesh);
    build_edges(mesh);
    auto_partition_edges(mesh, None);
    auto_partition_nodes(mesh);
    mark_exterior_nodes(mesh);
    Ok(true)
}

// ============================================================================
// Edges
// ============================================================================

fn tangent(mesh: &FeMesh, edge: usize) -> Vector3<f64> {
    let e = &mesh.edges[edge];
    let d = mesh.nodes[e.n1()].position - mesh.nodes[e.n0()].position;
    d.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
}

/// Tangent of neighbor `k` reached through end slot `j` of edge `i`,
/// oriented to continue the direction of `i`.
fn continued_tangent(mesh: &FeMesh, i: usize, j: usize, k: usize) -> Vector3<f64> {
    let t = tangent(mesh, k);
    if mesh.edges[k].nodes[j] == mesh.edges[i].nodes[j] {
        -t
    } else {
        t
    }
}

/// Assign edge partitions along feature curves.
///
/// Only edges with an assigned partition take part. They flood through their
/// neighbor links, and with a `feature_angle` only while the tangents of
/// consecutive edges stay within that many degrees. Links between edges
/// that land in different curves are cleared afterwards. Edges with gid -1
/// are left alone. Returns the partition count.
pub fn auto_partition_edges(mesh: &mut FeMesh, feature_angle: Option<f64>) -> usize {
    let cw = feature_angle.map(cos_threshold);
    let candidate: Vec<bool> = mesh.edges.iter().map(|e| e.gid >= 0).collect();
    let mut visited = vec![false; mesh.edge_count()];

    let mut label = 0i32;
    let mut stack = Vec::new();
    for seed in 0..mesh.edge_count() {
        if !candidate[seed] || visited[seed] {
            continue;
        }
        visited[seed] = true;
        stack.push(seed);
        while let Some(i) = stack.pop() {
            mesh.edges[i].gid = label;
            for j in 0..2 {
                let Some(k) = mesh.edges[i].nbr[j] else {
                    continue;
                };
                if !candidate.get(k).copied().unwrap_or(false) || visited[k] {
                    continue;
                }
                let straight = cw.is_none_or(|cw| {
                    tangent(mesh, i).dot(&continued_tangent(mesh, i, j, k)) >= cw
                });
                if straight {
                    visited[k] = true;
                    stack.push(k);
                }
            }
        }
        label += 1;
    }
    let cut = unlink_across_curves(mesh);

    debug!("Auto-partitioned edges into {} curves, cut {} links", label, cut);
    label as usize
}

/// Clear edge links whose two sides ended up in different curves.
///
/// Returns the number of cleared link slots.
fn unlink_across_curves(mesh: &mut FeMesh) -> usize {
    let mut cut = 0;
    for i in 0..mesh.edge_count() {
        let gid = mesh.edges[i].gid;
        for j in 0..2 {
            let Some(k) = mesh.edges[i].nbr[j] else {
                continue;
            };
            if mesh.edges.get(k).is_none_or(|e| e.gid != gid) {
                mesh.edges[i].nbr[j] = None;
                cut += 1;
            }
        }
    }
    cut
}

/// Split one feature curve into new curves by tangent angle.
///
/// Every listed edge must belong to the same assigned curve; otherwise the
/// call does nothing and returns `Ok(false)`, as it does for an empty list.
/// New curves are numbered after the existing ones, then edge data and node
/// partitions are re-derived.
///
/// # Errors
///
/// Returns [`MeshError::InvalidReference`] if a listed edge is out of range.
pub fn auto_partition_edge_set(
    mesh: &mut FeMesh,
    angle: f64,
    edges: &[usize],
) -> TopologyResult<bool> {
    let count = mesh.edge_count();
    if let Some(&bad) = edges.iter().find(|&&e| e >= count) {
        return Err(MeshError::invalid(ItemKind::Edge, bad, count).into());
    }
    let Some(&first) = edges.first() else {
        return Ok(false);
    };
    let gid = mesh.edges[first].gid;
    if gid == -1 || edges.iter().any(|&e| mesh.edges[e].gid != gid) {
        return Ok(false);
    }

    let cw = cos_threshold(angle);
    let mut label = mesh.count_edge_partitions() as i32;
    let mut visited = vec![false; count];
    let mut stack = Vec::new();
    for &seed in edges {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        stack.push(seed);
        while let Some(i) = stack.pop() {
            mesh.edges[i].gid = label;
            let t = tangent(mesh, i);
            for j in 0..2 {
                let Some(k) = mesh.edges[i].nbr[j] else {
                    continue;
                };
                if !visited[k] && continued_tangent(mesh, i, j, k).dot(&t) >= cw {
                    visited[k] = true;
                    stack.push(k);
                }
            }
        }
        label += 1;
    }

    update_edge_partitions(mesh);
    rebuild_edge_data(mesh);
    auto_partition_nodes(mesh);
    mark_exterior_nodes(mesh);
    Ok(true)
}

// ============================================================================
// Nodes
// ============================================================================

/// Assign node partitions at the ends of feature curves.
///
/// A node gets a fresh id when it ends a curve: the edge has no neighbor at
/// that end, or the neighbor is in another curve. All other nodes become
/// unassigned. Returns the partition count.
pub fn auto_partition_nodes(mesh: &mut FeMesh) -> usize {
    for node in &mut mesh.nodes {
        node.gid = -1;
    }

    let mut next = 0i32;
    for i in 0..mesh.edge_count() {
        let edge = &mesh.edges[i];
        if edge.gid < 0 {
            continue;
        }
        let gid = edge.gid;
        let ends: [(usize, Option<usize>); 2] =
            [(edge.nodes[0], edge.nbr[0]), (edge.nodes[1], edge.nbr[1])];
        for (node, nbr) in ends {
            let open = nbr.is_none_or(|k| mesh.edges[k].gid != gid);
            if let Some(n) = mesh.nodes.get_mut(node).filter(|n| open && n.gid == -1) {
                n.gid = next;
                next += 1;
            }
        }
    }

    debug!("Auto-partitioned {} feature nodes", next);
    next as usize
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{build_faces, update_element_neighbors};
    use mesh_types::{Element, ElementRegistry, ElementType, Point3, hex_block};

    fn prepared(mut mesh: FeMesh) -> (FeMesh, ShapeTable) {
        let shapes = ElementRegistry::standard().resolve(&mesh).unwrap();
        update_element_neighbors(&mut mesh, &shapes);
        build_faces(&mut mesh, &shapes);
        (mesh, shapes)
    }

    fn cube_features() -> FeMesh {
        let (mut mesh, _) = prepared(hex_block(2, 2, 2));
        auto_partition_surface(&mut mesh, 30.0, true);
        build_edges(&mut mesh);
        auto_partition_edges(&mut mesh, None);
        auto_partition_nodes(&mut mesh);
        mesh
    }

    #[test]
    fn update_partitions_close_gaps() {
        let mut mesh = hex_block(3, 1, 1);
        mesh.elements[0].gid = 5;
        mesh.elements[1].gid = 2;
        mesh.elements[2].gid = 5;
        assert_eq!(update_element_partitions(&mut mesh), 2);
        let gids: Vec<i32> = mesh.elements.iter().map(|e| e.gid).collect();
        assert_eq!(gids, vec![1, 0, 1]);
    }

    #[test]
    fn smoothing_groups_are_compacted() {
        let (mut mesh, _) = prepared(hex_block(1, 1, 1));
        for (i, face) in mesh.faces.iter_mut().enumerate() {
            face.sid = if i % 2 == 0 { 4 } else { 9 };
        }
        assert_eq!(update_smoothing_groups(&mut mesh), 2);
        assert_eq!(mesh.count_smoothing_groups(), 2);
    }

    #[test]
    fn elements_split_by_connectivity() {
        let mut mesh = hex_block(2, 1, 1);
        // a second, detached hex
        let base = mesh.node_count();
        for k in 0..2 {
            for j in 0..2 {
                for i in 0..2 {
                    mesh.add_node(Point3::new(
                        10.0 + f64::from(i),
                        f64::from(j),
                        f64::from(k),
                    ));
                }
            }
        }
        let nodes: Vec<usize> = [0, 1, 3, 2, 4, 5, 7, 6].iter().map(|n| base + n).collect();
        mesh.add_element(ElementType::Hex8, &nodes).unwrap();
        mesh.push_element(Element::new(ElementType::Beam2, &[0, base]))
            .unwrap();

        let (mut mesh, shapes) = prepared(mesh);
        assert_eq!(auto_partition_elements(&mut mesh, &shapes), 3);
        let gids: Vec<i32> = mesh.elements.iter().map(|e| e.gid).collect();
        assert_eq!(gids, vec![0, 0, 1, 2]);
    }

    #[test]
    fn cube_surface_at_small_angle_has_six_groups() {
        let (mut mesh, _) = prepared(hex_block(2, 2, 2));
        assert_eq!(auto_partition_surface(&mut mesh, 0.0, true), 6);
        assert_eq!(mesh.count_face_partitions(), 6);
    }

    #[test]
    fn cube_surface_at_straight_angle_is_one_group() {
        let (mut mesh, _) = prepared(hex_block(2, 2, 2));
        assert_eq!(auto_partition_surface(&mut mesh, 180.0, true), 1);
    }

    #[test]
    fn different_parts_never_share_a_surface() {
        let mut mesh = hex_block(2, 1, 1);
        mesh.elements[1].gid = 1;
        let (mut mesh, _) = prepared(mesh);
        // two outer shells plus the interface
        assert_eq!(auto_partition_surface(&mut mesh, 180.0, true), 3);
    }

    #[test]
    fn cube_features_have_twelve_curves_and_eight_corners() {
        let mesh = cube_features();
        assert_eq!(mesh.count_edge_partitions(), 12);
        assert_eq!(mesh.count_node_partitions(), 8);
        let assigned = mesh.nodes.iter().filter(|n| n.gid >= 0).count();
        assert_eq!(assigned, 8);
    }

    #[test]
    fn feature_angle_splits_curves_at_corners() {
        // 2x2 quad patch: its open boundary is a square of eight edges
        let mut mesh = FeMesh::new();
        for j in 0..3 {
            for i in 0..3 {
                mesh.add_node(Point3::new(f64::from(i), f64::from(j), 0.0));
            }
        }
        for quad in [[0, 1, 4, 3], [1, 2, 5, 4], [3, 4, 7, 6], [4, 5, 8, 7]] {
            mesh.add_element(ElementType::Quad4, &quad).unwrap();
        }
        let (mut mesh, _) = prepared(mesh);
        assert_eq!(auto_partition_surface(&mut mesh, 10.0, true), 1);
        build_edges(&mut mesh);

        // the open boundary forms one loop
        assert_eq!(auto_partition_edges(&mut mesh, None), 1);
        // corners break it into the four sides
        assert_eq!(auto_partition_edges(&mut mesh, Some(30.0)), 4);

        // links never cross from one side to the next
        for edge in &mesh.edges {
            for &k in edge.nbr.iter().flatten() {
                assert_eq!(mesh.edges[k].gid, edge.gid);
            }
        }
        assert_eq!(auto_partition_nodes(&mut mesh), 4);
    }

    #[test]
    fn edge_set_split_renumbers_after_existing_curves() {
        let mut mesh = cube_features();
        let curve = mesh.edges.iter().position(|e| e.gid == 0).unwrap();
        let before = mesh.count_edge_partitions();
        assert!(auto_partition_edge_set(&mut mesh, 10.0, &[curve]).unwrap());
        assert_eq!(mesh.count_edge_partitions(), before);

        assert!(!auto_partition_edge_set(&mut mesh, 10.0, &[]).unwrap());
        assert!(auto_partition_edge_set(&mut mesh, 10.0, &[999]).is_err());
    }

    #[test]
    fn mixed_curves_are_rejected() {
        let mut mesh = cube_features();
        let a = mesh.edges.iter().position(|e| e.gid == 0).unwrap();
        let b = mesh.edges.iter().position(|e| e.gid == 1).unwrap();
        assert!(!auto_partition_edge_set(&mut mesh, 10.0, &[a, b]).unwrap());
    }

    #[test]
    fn face_set_gets_new_partitions() {
        let (mut mesh, _) = prepared(hex_block(1, 1, 1));
        auto_partition_surface(&mut mesh, 180.0, true);
        assert_eq!(mesh.count_face_partitions(), 1);

        let all: Vec<usize> = (0..mesh.face_count()).collect();
        assert!(auto_partition_face_set(&mut mesh, 10.0, &all).unwrap());
        assert_eq!(mesh.count_face_partitions(), 6);
        assert_eq!(mesh.count_edge_partitions(), 12);
        assert_eq!(mesh.count_node_partitions(), 8);
    }
}

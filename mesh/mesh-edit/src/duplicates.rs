//! Removal of duplicate faces and edges.

// Partition ids are i32 by data model; counts never approach i32::MAX.
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use hashbrown::HashMap;
use mesh_topology::{
    MeshBuilder, update_edge_neighbors, update_edge_partitions, update_face_element_table,
    update_face_neighbors, update_face_partitions,
};
use mesh_types::{FaceType, FeMesh};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::EditResult;

type NodeKey = SmallVec<[usize; 10]>;

fn sorted_key(nodes: &[usize]) -> NodeKey {
    let mut key: NodeKey = nodes.iter().copied().collect();
    key.sort_unstable();
    key
}

/// Remove faces that repeat an earlier face, keeping the later copy.
///
/// Copies are found regardless of winding or starting node. The face-element
/// table, face neighbors, and face partitions are re-derived afterward.
/// Returns the number of faces removed.
///
/// # Errors
///
/// Returns an error if an element type is not registered with `builder`;
/// the mesh is not modified in that case.
pub fn remove_duplicate_faces(mesh: &mut FeMesh, builder: &MeshBuilder) -> EditResult<usize> {
    let shapes = builder.shapes(mesh)?;

    let mut buckets: HashMap<(FaceType, NodeKey), Vec<usize>> = HashMap::new();
    let mut keep = vec![true; mesh.face_count()];
    for (i, face) in mesh.faces.iter().enumerate() {
        let bucket = buckets
            .entry((face.face_type, sorted_key(&face.nodes)))
            .or_default();
        match bucket.iter().position(|&k| mesh.faces[k].matches(face)) {
            Some(slot) => {
                keep[bucket[slot]] = false;
                bucket[slot] = i;
            }
            None => bucket.push(i),
        }
    }

    let removed = mesh.retain_faces(&keep).removed_count();
    if removed == 0 {
        return Ok(0);
    }

    update_face_element_table(mesh, &shapes);
    update_face_neighbors(mesh);
    update_face_partitions(mesh);
    info!("Removed {} duplicate faces", removed);
    Ok(removed)
}

/// Remove edges that repeat an earlier edge, merging their curve ids.
///
/// For each duplicate pair, with `n` the edge partition count beforehand:
///
/// - if the earlier copy is unassigned it is removed, and the later copy
///   moves to id `gid + n` when assigned
/// - if only the later copy is unassigned it is removed, and the earlier
///   copy moves to id `gid + n`
/// - if both are assigned the earlier copy is removed, and the later one
///   takes the combined id `(g0 + 1) * n + g1`
///
/// Edge neighbors are then re-derived and edge partitions renumbered.
/// Returns the number of edges removed.
pub fn remove_duplicate_edges(mesh: &mut FeMesh) -> usize {
    let ng = mesh.count_edge_partitions() as i32;

    let mut buckets: HashMap<NodeKey, Vec<usize>> = HashMap::new();
    let mut keep = vec![true; mesh.edge_count()];
    for j in 0..mesh.edge_count() {
        let bucket = buckets.entry(sorted_key(&mesh.edges[j].nodes)).or_default();
        let Some(slot) = bucket.iter().position(|&i| mesh.edges[i].matches(&mesh.edges[j])) else {
            bucket.push(j);
            continue;
        };
        let i = bucket[slot];
        let (gi, gj) = (mesh.edges[i].gid, mesh.edges[j].gid);

        if gi < 0 {
            keep[i] = false;
            bucket[slot] = j;
            if gj >= 0 {
                mesh.edges[j].gid = gj + ng;
            }
        } else if gj < 0 {
            keep[j] = false;
            mesh.edges[i].gid = gi + ng;
        } else {
            keep[i] = false;
            bucket[slot] = j;
            mesh.edges[j].gid = (gi + 1) * ng + gj;
        }
        debug!("Edge {} duplicates edge {}", j, i);
    }

    let removed = mesh.retain_edges(&keep).removed_count();
    if removed > 0 {
        update_edge_neighbors(mesh);
        update_edge_partitions(mesh);
        info!("Removed {} duplicate edges", removed);
    }
    removed
}

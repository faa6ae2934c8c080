//! Splitting a selection off into its own mesh.

use mesh_topology::{MeshBuilder, update_element_partitions};
use mesh_types::{Element, FeMesh};
use tracing::info;

use crate::{EditResult, delete_tagged_elements};

/// Move the elements tagged `tag` into a new, independent mesh.
///
/// The new mesh holds copies of the tagged elements and of the nodes they
/// reference, renumbered densely in the original node order. Element type,
/// part, shell thickness, and orientation carry over, as does the source's
/// transform. The tagged elements are then deleted from `mesh` and both
/// meshes are rebuilt.
///
/// Returns `None`, leaving `mesh` untouched, when no element or every
/// element is tagged.
///
/// # Errors
///
/// Returns an error if an element type is not registered with `builder`;
/// `mesh` is not modified in that case.
///
/// # Example
///
/// ```
/// use mesh_edit::detach_tagged_elements;
/// use mesh_topology::MeshBuilder;
/// use mesh_types::hex_block;
///
/// let mut mesh = hex_block(2, 1, 1);
/// mesh.elements[1].tag = 1;
///
/// let part = detach_tagged_elements(&mut mesh, 1, &MeshBuilder::default())
///     .unwrap()
///     .unwrap();
/// assert_eq!(part.node_count(), 8);
/// assert_eq!(mesh.node_count(), 8);
/// ```
pub fn detach_tagged_elements(
    mesh: &mut FeMesh,
    tag: i32,
    builder: &MeshBuilder,
) -> EditResult<Option<FeMesh>> {
    builder.shapes(mesh)?;

    let selected: Vec<bool> = mesh.elements.iter().map(|e| e.tag == tag).collect();
    let count = selected.iter().filter(|&&s| s).count();
    if count == 0 || count == mesh.element_count() {
        return Ok(None);
    }

    let mut used = vec![false; mesh.node_count()];
    for (el, _) in mesh.elements.iter().zip(&selected).filter(|(_, s)| **s) {
        for &n in &el.nodes {
            if let Some(u) = used.get_mut(n) {
                *u = true;
            }
        }
    }

    let mut part = FeMesh::new();
    part.transform = mesh.transform;
    let mut new_index = vec![usize::MAX; mesh.node_count()];
    for (i, node) in mesh.nodes.iter().enumerate().filter(|(i, _)| used[*i]) {
        new_index[i] = part.nodes.len();
        part.nodes.push(node.clone());
    }

    for (el, _) in mesh.elements.iter().zip(&selected).filter(|(_, s)| **s) {
        let nodes: Vec<usize> = el.nodes.iter().map(|&n| new_index[n]).collect();
        let mut copy = Element::new(el.element_type, &nodes).with_gid(el.gid);
        copy.thickness.clone_from(&el.thickness);
        copy.orientation = el.orientation;
        part.push_element(copy)?;
    }
    update_element_partitions(&mut part);
    builder.rebuild(&mut part)?;

    delete_tagged_elements(mesh, tag, builder)?;
    info!(
        "Detached {} elements and {} nodes",
        part.element_count(),
        part.node_count()
    );
    Ok(Some(part))
}

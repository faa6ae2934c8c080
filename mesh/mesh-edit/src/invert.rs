//! Orientation flips.

use mesh_topology::{
    MeshBuilder, update_element_neighbors, update_face_element_table, update_face_neighbors,
};
use mesh_types::{FeMesh, MeshError, ShapeTable};
use tracing::info;

use crate::{EditError, EditResult};

/// Re-derive the links that depend on node order.
fn relink(mesh: &mut FeMesh, shapes: &ShapeTable) {
    update_element_neighbors(mesh, shapes);
    update_face_element_table(mesh, shapes);
    update_face_neighbors(mesh);
}

/// Invert the elements tagged `tag`.
///
/// Each element's nodes are permuted with its type's inversion table. Every
/// face whose primary owner was inverted then copies the nodes of the
/// owner's local face with the same node set, so it keeps facing the way
/// its owner does. Element neighbors and the face tables are re-derived.
/// Returns the number of elements inverted.
///
/// # Errors
///
/// Returns [`MeshError::UnsupportedElementType`] if a tagged element's type
/// has no inversion table, or an error if a type is not registered with
/// `builder`. Nothing is modified in either case.
pub fn invert_tagged_elements(
    mesh: &mut FeMesh,
    tag: i32,
    builder: &MeshBuilder,
) -> EditResult<usize> {
    let shapes = builder.shapes(mesh)?;
    let selected: Vec<bool> = mesh.elements.iter().map(|e| e.tag == tag).collect();

    for (i, el) in mesh.elements.iter().enumerate() {
        if selected[i] && shapes.get(i).inversion.is_none() {
            return Err(MeshError::UnsupportedElementType {
                element_type: el.element_type,
                operation: "invert",
            }
            .into());
        }
    }

    let mut count = 0;
    for (i, el) in mesh.elements.iter_mut().enumerate() {
        if selected[i] && el.invert(shapes.get(i)) {
            count += 1;
        }
    }
    if count == 0 {
        return Ok(0);
    }

    for face in &mut mesh.faces {
        let Some(owner) = face.owners[0].filter(|o| selected.get(o.element) == Some(&true)) else {
            continue;
        };
        let el = &mesh.elements[owner.element];
        let local = if el.is_shell() {
            el.shell_face()
        } else {
            let shape = shapes.get(owner.element);
            el.find_face(shape, face).and_then(|l| el.local_face(shape, l))
        };
        if let Some(local) = local {
            face.nodes = local.nodes;
        }
    }

    relink(mesh, &shapes);
    info!("Inverted {} elements", count);
    Ok(count)
}

/// Invert the faces tagged `tag`, then re-derive the face tables.
///
/// Returns the number of faces inverted.
///
/// # Errors
///
/// Returns [`EditError::UnsupportedFaceType`] if a tagged face's type has
/// no inversion table, or an error if an element type is not registered
/// with `builder`. Nothing is modified in either case.
pub fn invert_tagged_faces(
    mesh: &mut FeMesh,
    tag: i32,
    builder: &MeshBuilder,
) -> EditResult<usize> {
    if let Some(face) = mesh
        .faces
        .iter()
        .find(|f| f.tag == tag && f.face_type.inversion().is_none())
    {
        return Err(EditError::UnsupportedFaceType {
            face_type: face.face_type,
            operation: "invert",
        });
    }
    let shapes = builder.shapes(mesh)?;

    let mut count = 0;
    for face in mesh.faces.iter_mut().filter(|f| f.tag == tag) {
        if face.invert() {
            count += 1;
        }
    }
    if count > 0 {
        relink(mesh, &shapes);
        info!("Inverted {} faces", count);
    }
    Ok(count)
}

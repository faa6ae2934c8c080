//! Face synthesis, face ownership, and face neighbor links.

use mesh_types::{Face, FaceOwner, FeMesh, MAX_SLOTS, ShapeTable};
use tracing::{debug, warn};

use crate::NodeLookup;

/// Outcome of [`build_faces`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaceBuildReport {
    /// Faces synthesized.
    pub faces: usize,
    /// Faces among them that are exterior.
    pub exterior: usize,
    /// Face edge slots with more than one neighbor candidate.
    pub ambiguous_neighbors: usize,
}

/// Synthesize the face array from element neighbor slots.
///
/// A solid face is emitted when its slot is open (an exterior face), or when
/// the neighbor is a solid in a numerically greater partition (an interface
/// face). Every shell then emits its own face. Ownership and face neighbors
/// are derived afterwards through [`rebuild_face_data`].
///
/// Element neighbors must be up to date.
pub fn build_faces(mesh: &mut FeMesh, shapes: &ShapeTable) -> FaceBuildReport {
    let mut faces = Vec::new();

    for (i, el) in mesh.elements.iter().enumerate() {
        if !el.is_solid() {
            continue;
        }
        let shape = shapes.get(i);
        for j in 0..shape.face_count() {
            let exterior = match el.nbr[j] {
                None => true,
                Some(k) => {
                    let nbr = &mesh.elements[k];
                    if el.gid < nbr.gid && !nbr.is_shell() {
                        false
                    } else {
                        continue;
                    }
                }
            };
            if let Some(mut face) = el.local_face(shape, j) {
                face.exterior = exterior;
                faces.push(face);
            }
        }
    }

    for el in mesh.elements.iter().filter(|el| el.is_shell()) {
        if let Some(mut face) = el.shell_face() {
            face.exterior = true;
            faces.push(face);
        }
    }

    mesh.faces = faces;
    let ambiguous_neighbors = rebuild_face_data(mesh, shapes);

    let report = FaceBuildReport {
        faces: mesh.face_count(),
        exterior: mesh.faces.iter().filter(|f| f.exterior).count(),
        ambiguous_neighbors,
    };
    debug!(
        "Built {} faces ({} exterior)",
        report.faces, report.exterior
    );
    report
}

/// Re-derive face ownership and face neighbors.
///
/// Returns the number of ambiguous face neighbor slots.
pub fn rebuild_face_data(mesh: &mut FeMesh, shapes: &ShapeTable) -> usize {
    update_face_element_table(mesh, shapes);
    update_face_neighbors(mesh)
}

/// Link every face to its owning elements and every element to its faces.
///
/// A shell whose face matches takes the first owner slot. Solids follow,
/// ordered by element partition so the lower gid comes first, unless the
/// first slot holds a shell. A fourth owner is dropped with a warning.
/// Faces are then marked exterior when they have no second owner.
pub fn update_face_element_table(mesh: &mut FeMesh, shapes: &ShapeTable) {
    for face in &mut mesh.faces {
        face.clear_owners();
    }
    for el in &mut mesh.elements {
        el.faces = [None; MAX_SLOTS];
    }

    let lookup = NodeLookup::for_elements(mesh);
    let mut dropped = 0usize;

    for i in 0..mesh.face_count() {
        let face = &mesh.faces[i];
        let Some(&n0) = face.nodes.first() else {
            continue;
        };
        let mut owners: [Option<FaceOwner>; 3] = [None; 3];
        let mut slots: Vec<(usize, usize)> = Vec::new();
        let mut m = 0usize;

        let shell = lookup.items(n0).find(|&k| {
            mesh.elements[k]
                .shell_face()
                .is_some_and(|sf| sf.matches(face))
        });
        if let Some(k) = shell {
            owners[0] = Some(FaceOwner::new(k, 0));
            slots.push((k, 0));
            m = 1;
        }

        for k in lookup.items(n0) {
            let pe = &mesh.elements[k];
            if !pe.is_solid() {
                continue;
            }
            let shape = shapes.get(k);
            let local = (0..shape.face_count()).find(|&l| {
                pe.faces[l].is_none()
                    && pe
                        .local_face(shape, l)
                        .is_some_and(|lf| lf.matches(face))
            });
            let Some(l) = local else {
                continue;
            };
            let owner = FaceOwner::new(k, l);
            let gid_of = |o: Option<FaceOwner>| o.map_or(-1, |o| mesh.elements[o.element].gid);

            match m {
                0 => owners[0] = Some(owner),
                1 => {
                    let p0 = owners[0].map(|o| &mesh.elements[o.element]);
                    if gid_of(owners[0]) < pe.gid || p0.is_some_and(|p| p.is_shell()) {
                        owners[1] = Some(owner);
                    } else {
                        owners[1] = owners[0];
                        owners[0] = Some(owner);
                    }
                }
                2 => {
                    if gid_of(owners[1]) < pe.gid {
                        owners[2] = Some(owner);
                    } else {
                        owners[2] = owners[1];
                        owners[1] = Some(owner);
                    }
                }
                _ => {
                    dropped += 1;
                    continue;
                }
            }
            m += 1;
            slots.push((k, l));
        }

        mesh.faces[i].owners = owners;
        for (k, l) in slots {
            mesh.elements[k].faces[l] = Some(i);
        }
    }

    if dropped > 0 {
        warn!("{} face owner(s) beyond the third were dropped", dropped);
    }
    mark_exterior_faces(mesh);
}

/// Mark faces without a second owner as exterior. Returns the exterior count.
pub fn mark_exterior_faces(mesh: &mut FeMesh) -> usize {
    let mut count = 0;
    for face in &mut mesh.faces {
        face.exterior = face.owners[1].is_none();
        count += usize::from(face.exterior);
    }
    count
}

/// Label elements by connectivity through any neighbor slot, in either
/// direction. Returns one label per element, starting at 1.
pub(crate) fn element_components(mesh: &FeMesh) -> Vec<usize> {
    let n = mesh.element_count();
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, el) in mesh.elements.iter().enumerate() {
        for &k in el.nbr.iter().flatten() {
            if k < n {
                adjacency[i].push(k);
                adjacency[k].push(i);
            }
        }
    }

    let mut label = vec![0usize; n];
    let mut next = 1;
    let mut stack = Vec::new();
    for seed in 0..n {
        if label[seed] != 0 {
            continue;
        }
        label[seed] = next;
        stack.push(seed);
        while let Some(i) = stack.pop() {
            for &k in &adjacency[i] {
                if label[k] == 0 {
                    label[k] = next;
                    stack.push(k);
                }
            }
        }
        next += 1;
    }
    label
}

/// Two faces may be neighbors when they agree on exterior status, are not
/// copies of each other, and neither is a triangle lying inside the other.
#[must_use]
pub fn is_valid_face_neighbor(a: &Face, b: &Face) -> bool {
    a.exterior == b.exterior && !a.matches(b) && !a.lies_inside(b) && !b.lies_inside(a)
}

/// Link every face to the neighbor face across each of its edges.
///
/// A candidate shares the edge, sits in the same element connectivity
/// component, has the same smoothing id, and passes
/// [`is_valid_face_neighbor`]. The first candidate wins. Returns the number
/// of edge slots that had more than one candidate.
pub fn update_face_neighbors(mesh: &mut FeMesh) -> usize {
    let components = element_components(mesh);
    let component_of = |face: &Face| {
        face.owners[0]
            .and_then(|o| components.get(o.element).copied())
            .unwrap_or(0)
    };
    let face_component: Vec<usize> = mesh.faces.iter().map(component_of).collect();

    let lookup = NodeLookup::for_faces(mesh);
    let mut ambiguous = 0usize;
    let mut links: Vec<[Option<usize>; 4]> = Vec::with_capacity(mesh.face_count());

    for (i, face) in mesh.faces.iter().enumerate() {
        let mut nbr = [None; 4];
        for (j, slot) in nbr.iter_mut().enumerate().take(face.edge_count()) {
            let edge = face.edge_nodes(j);
            let (n0, n1) = (edge[0], edge[1]);
            let mut candidates = lookup.items(n0).filter(|&k| {
                let other = &mesh.faces[k];
                k != i
                    && other.has_edge(n0, n1)
                    && face_component[k] == face_component[i]
                    && other.sid == face.sid
                    && is_valid_face_neighbor(face, other)
            });
            *slot = candidates.next();
            if slot.is_some() && candidates.next().is_some() {
                ambiguous += 1;
            }
        }
        links.push(nbr);
    }

    for (face, nbr) in mesh.faces.iter_mut().zip(links) {
        face.nbr = nbr;
    }

    if ambiguous > 0 {
        warn!(
            "{} face edge(s) had more than one neighbor candidate; first match kept",
            ambiguous
        );
    }
    ambiguous
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::update_element_neighbors;
    use mesh_types::{ElementRegistry, ElementType, FaceType, Point3, hex_block};

    fn faces_of(mut mesh: FeMesh) -> FeMesh {
        let shapes = ElementRegistry::standard().resolve(&mesh).unwrap();
        update_element_neighbors(&mut mesh, &shapes);
        build_faces(&mut mesh, &shapes);
        mesh
    }

    #[test]
    fn single_hex_has_six_exterior_faces() {
        let mesh = faces_of(hex_block(1, 1, 1));
        assert_eq!(mesh.face_count(), 6);
        assert!(mesh.faces.iter().all(|f| f.exterior && f.owner_count() == 1));
        assert_eq!(mesh.elements[0].faces[..6].iter().flatten().count(), 6);
    }

    #[test]
    fn shared_face_inside_one_part_is_not_emitted() {
        let mesh = faces_of(hex_block(2, 1, 1));
        assert_eq!(mesh.face_count(), 10);
        assert_eq!(mesh.elements[0].faces[1], None);
    }

    #[test]
    fn interface_face_between_parts_has_two_owners() {
        let mut mesh = hex_block(2, 1, 1);
        mesh.elements[1].gid = 1;
        let mesh = faces_of(mesh);

        assert_eq!(mesh.face_count(), 11);
        let interface: Vec<&Face> = mesh.faces.iter().filter(|f| !f.exterior).collect();
        assert_eq!(interface.len(), 1);
        let owners: Vec<usize> = interface[0].owner_elements().collect();
        assert_eq!(owners, vec![0, 1]);
    }

    #[test]
    fn lower_partition_owns_first() {
        let mut mesh = hex_block(2, 1, 1);
        mesh.elements[0].gid = 3;
        mesh.elements[1].gid = 1;
        let mesh = faces_of(mesh);
        let interface = mesh.faces.iter().find(|f| !f.exterior).unwrap();
        assert_eq!(interface.owners[0].unwrap().element, 1);
        assert_eq!(interface.owners[1].unwrap().element, 0);
    }

    #[test]
    fn shell_on_solid_is_first_owner() {
        let mut mesh = hex_block(1, 1, 1);
        mesh.add_element(ElementType::Quad4, &[4, 5, 7, 6]).unwrap();
        let mesh = faces_of(mesh);

        // five solid faces plus the shell face
        assert_eq!(mesh.face_count(), 6);
        let shell_face = mesh.faces.iter().position(|f| f.is_owned_by(1)).unwrap();
        let face = &mesh.faces[shell_face];
        assert_eq!(face.owners[0], Some(FaceOwner::new(1, 0)));
        assert_eq!(face.owners[1], Some(FaceOwner::new(0, 5)));
        assert!(!face.exterior);
        assert_eq!(mesh.elements[1].faces[0], Some(shell_face));
    }

    #[test]
    fn block_faces_link_to_four_neighbors() {
        let mesh = faces_of(hex_block(2, 2, 2));
        assert_eq!(mesh.face_count(), 24);
        for (i, face) in mesh.faces.iter().enumerate() {
            for j in 0..4 {
                let k = face.nbr[j].unwrap();
                assert_ne!(k, i);
                assert!(mesh.faces[k].nbr.contains(&Some(i)));
            }
        }
    }

    #[test]
    fn smoothing_id_splits_neighbors() {
        let mut mesh = faces_of(hex_block(2, 1, 1));
        mesh.faces[0].sid = 1;
        update_face_neighbors(&mut mesh);
        let open = mesh.faces[0].nbr.iter().filter(|n| n.is_none()).count();
        assert_eq!(open, 4);
    }

    #[test]
    fn adjacent_triangles_link_across_shared_edge() {
        let mut mesh = FeMesh::new();
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]] {
            mesh.add_node(Point3::from(p));
        }
        mesh.add_element(ElementType::Tri3, &[0, 1, 2]).unwrap();
        mesh.add_element(ElementType::Tri3, &[1, 3, 2]).unwrap();
        let mesh = faces_of(mesh);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.faces[0].nbr[1], Some(1));
        assert_eq!(mesh.faces[0].face_type, FaceType::Tri3);
    }

    #[test]
    fn triangle_inside_quad_is_rejected() {
        let quad = Face::new(FaceType::Quad4, &[0, 1, 2, 3]);
        let tri = Face::new(FaceType::Tri3, &[0, 1, 2]);
        let other = Face::new(FaceType::Quad4, &[1, 4, 5, 2]);
        assert!(!is_valid_face_neighbor(&quad, &tri));
        assert!(!is_valid_face_neighbor(&quad, &quad.clone()));
        assert!(is_valid_face_neighbor(&quad, &other));
    }
}

//! Element neighbor resolution and exterior marking.
//!
//! Solids are matched face by face, shells edge by edge, and beams by their
//! end nodes. Candidates always come from the node-to-element table of the
//! first node of the face or edge being matched, so resolution never scans
//! the whole element array.

use mesh_types::{ElementClass, FeMesh, MAX_SLOTS, ShapeTable};
use tracing::{debug, warn};

use crate::NodeLookup;

/// Outcome of a neighbor resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborReport {
    /// Neighbor slots that were filled.
    pub linked: usize,
    /// Slots where more than one candidate matched. The first match was kept.
    pub ambiguous: usize,
}

/// Fill the neighbor slots of every element.
///
/// Existing neighbor and owned-face slots are reset first.
///
/// - Solid faces look for a shell whose face matches first. That link is one
///   way, since shell slots are per edge. Otherwise a solid with a matching
///   local face that is still unlinked becomes the neighbor and the link is
///   made mutual.
/// - Shell edges match other shells that share the edge and are not
///   duplicates of the shell itself. Links are mutual.
/// - Beam ends match another beam that starts or ends at the same node.
///
/// When several candidates match, the first one in node-table order wins and
/// the slot is counted in [`NeighborReport::ambiguous`]. Beam junctions are
/// not counted.
///
/// `shapes` must be resolved from the same mesh.
pub fn update_element_neighbors(mesh: &mut FeMesh, shapes: &ShapeTable) -> NeighborReport {
    for el in &mut mesh.elements {
        el.nbr = [None; MAX_SLOTS];
        el.faces = [None; MAX_SLOTS];
    }

    let lookup = NodeLookup::for_elements(mesh);
    let mut report = NeighborReport::default();

    for i in 0..mesh.element_count() {
        let shape = shapes.get(i);
        match shape.class() {
            ElementClass::Solid => {
                for j in 0..shape.face_count() {
                    if mesh.elements[i].nbr[j].is_some() {
                        continue;
                    }
                    let found = solid_face_neighbor(mesh, shapes, &lookup, i, j);
                    report.ambiguous += usize::from(found.ambiguous);
                    match found.link {
                        Some(Link::Shell(k)) => {
                            mesh.elements[i].nbr[j] = Some(k);
                            report.linked += 1;
                        }
                        Some(Link::Mutual(k, l)) => {
                            mesh.elements[i].nbr[j] = Some(k);
                            mesh.elements[k].nbr[l] = Some(i);
                            report.linked += 2;
                        }
                        None => {}
                    }
                }
            }
            ElementClass::Shell => {
                for j in 0..shape.neighbor_slots() {
                    if mesh.elements[i].nbr[j].is_some() {
                        continue;
                    }
                    let found = shell_edge_neighbor(mesh, shapes, &lookup, i, j);
                    report.ambiguous += usize::from(found.ambiguous);
                    if let Some(Link::Mutual(k, l)) = found.link {
                        mesh.elements[i].nbr[j] = Some(k);
                        mesh.elements[k].nbr[l] = Some(i);
                        report.linked += 2;
                    }
                }
            }
            ElementClass::Beam => {
                for j in 0..2 {
                    let Some(&node) = mesh.elements[i].nodes.get(j) else {
                        continue;
                    };
                    let other = lookup.items(node).find(|&k| {
                        let pe = &mesh.elements[k];
                        k != i && pe.is_beam() && (pe.nodes[0] == node || pe.nodes[1] == node)
                    });
                    if other.is_some() {
                        mesh.elements[i].nbr[j] = other;
                        report.linked += 1;
                    }
                }
            }
        }
    }

    if report.ambiguous > 0 {
        warn!(
            "{} element neighbor slot(s) had more than one candidate; first match kept",
            report.ambiguous
        );
    }
    debug!(
        "Resolved {} element neighbor links for {} elements",
        report.linked,
        mesh.element_count()
    );
    report
}

enum Link {
    /// One-way link from a solid face to a shell.
    Shell(usize),
    /// Mutual link with the other element's local slot.
    Mutual(usize, usize),
}

struct Candidate {
    link: Option<Link>,
    ambiguous: bool,
}

fn solid_face_neighbor(
    mesh: &FeMesh,
    shapes: &ShapeTable,
    lookup: &NodeLookup,
    i: usize,
    j: usize,
) -> Candidate {
    let el = &mesh.elements[i];
    let Some(face) = el.local_face(shapes.get(i), j) else {
        return Candidate {
            link: None,
            ambiguous: false,
        };
    };
    let n0 = face.nodes[0];

    let mut shells = lookup.items(n0).filter(|&k| {
        k != i
            && mesh.elements[k]
                .shell_face()
                .is_some_and(|shell| shell.matches(&face))
    });
    if let Some(k) = shells.next() {
        return Candidate {
            link: Some(Link::Shell(k)),
            ambiguous: shells.next().is_some(),
        };
    }

    let mut solids = lookup.items(n0).filter_map(|k| {
        let pe = &mesh.elements[k];
        if k == i || !pe.is_solid() {
            return None;
        }
        pe.find_face(shapes.get(k), &face)
            .filter(|&l| pe.nbr[l].is_none())
            .map(|l| (k, l))
    });
    let first = solids.next();
    Candidate {
        link: first.map(|(k, l)| Link::Mutual(k, l)),
        ambiguous: first.is_some() && solids.next().is_some(),
    }
}

fn shell_edge_neighbor(
    mesh: &FeMesh,
    shapes: &ShapeTable,
    lookup: &NodeLookup,
    i: usize,
    j: usize,
) -> Candidate {
    let el = &mesh.elements[i];
    let Some(edge) = el.shell_edge(shapes.get(i), j) else {
        return Candidate {
            link: None,
            ambiguous: false,
        };
    };

    let mut shells = lookup.items(edge.n0()).filter_map(|k| {
        let pe = &mesh.elements[k];
        if k == i || !pe.is_shell() || pe.matches(el) {
            return None;
        }
        pe.find_shell_edge(shapes.get(k), &edge).map(|l| (k, l))
    });
    let first = shells.next();
    Candidate {
        link: first.map(|(k, l)| Link::Mutual(k, l)),
        ambiguous: first.is_some() && shells.next().is_some(),
    }
}

/// Mark solids with an open face slot as exterior.
///
/// Shells and beams are always exterior. Returns the number of exterior
/// elements.
pub fn mark_exterior_elements(mesh: &mut FeMesh, shapes: &ShapeTable) -> usize {
    let mut count = 0;
    for (i, el) in mesh.elements.iter_mut().enumerate() {
        el.exterior = if el.is_solid() {
            el.nbr[..shapes.get(i).face_count()].iter().any(Option::is_none)
        } else {
            true
        };
        count += usize::from(el.exterior);
    }
    count
}

/// Mark the nodes of exterior faces and of beams as exterior.
///
/// Every other node is interior. Returns the number of exterior nodes.
pub fn mark_exterior_nodes(mesh: &mut FeMesh) -> usize {
    for node in &mut mesh.nodes {
        node.exterior = false;
    }

    let FeMesh {
        nodes,
        faces,
        elements,
        ..
    } = mesh;

    let boundary = faces
        .iter()
        .filter(|f| f.exterior)
        .flat_map(|f| f.nodes.iter());
    let beams = elements
        .iter()
        .filter(|el| el.is_beam())
        .flat_map(|el| el.nodes.iter());

    for &n in boundary.chain(beams) {
        if let Some(node) = nodes.get_mut(n) {
            node.exterior = true;
        }
    }
    nodes.iter().filter(|n| n.exterior).count()
}

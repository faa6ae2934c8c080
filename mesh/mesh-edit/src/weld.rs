//! Attaching with node welding across the seam.

use hashbrown::HashMap;
use mesh_topology::MeshBuilder;
use mesh_types::{FeMesh, Point3};
use tracing::{debug, info};

use crate::{AttachOffsets, EditResult, attach};

/// Statistics from [`attach_and_weld`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeldSummary {
    /// Nodes appended from the attached mesh.
    pub nodes_attached: usize,
    /// Elements appended from the attached mesh.
    pub elements_attached: usize,
    /// Nodes merged into a coincident partner and removed.
    pub nodes_merged: usize,
}

impl WeldSummary {
    /// Check if any nodes were merged.
    #[must_use]
    pub fn had_merges(&self) -> bool {
        self.nodes_merged > 0
    }
}

impl std::fmt::Display for WeldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Weld: {} nodes and {} elements attached, {} nodes merged",
            self.nodes_attached, self.elements_attached, self.nodes_merged
        )
    }
}

type Cell = (i64, i64, i64);

/// Convert position to spatial hash cell.
#[allow(clippy::cast_possible_truncation)]
fn pos_to_cell(pos: &Point3<f64>, cell_size: f64) -> Cell {
    (
        (pos.x / cell_size).floor() as i64,
        (pos.y / cell_size).floor() as i64,
        (pos.z / cell_size).floor() as i64,
    )
}

/// Nodes of the faces in `faces`, each listed once, in index order.
fn face_nodes(mesh: &FeMesh, faces: std::ops::Range<usize>) -> Vec<usize> {
    let mut flagged = vec![false; mesh.node_count()];
    for face in &mesh.faces[faces] {
        for &n in &face.nodes {
            if let Some(f) = flagged.get_mut(n) {
                *f = true;
            }
        }
    }
    (0..flagged.len()).filter(|&i| flagged[i]).collect()
}

/// Find coincident (source, target) node pairs within `tol`.
///
/// Pairs come back ordered by source, then target, which is the order an
/// all-pairs scan would visit them in.
fn coincident_pairs(
    mesh: &FeMesh,
    sources: &[usize],
    targets: &[usize],
    tol: f64,
) -> Vec<(usize, usize)> {
    let mut grid: HashMap<Cell, Vec<usize>> = HashMap::new();
    for &t in targets {
        grid.entry(pos_to_cell(&mesh.nodes[t].position, tol))
            .or_default()
            .push(t);
    }

    let tol2 = tol * tol;
    let mut pairs = Vec::new();
    let mut hits = Vec::new();
    for &s in sources {
        let p = &mesh.nodes[s].position;
        let cell = pos_to_cell(p, tol);

        hits.clear();
        // Check 3x3x3 neighborhood
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let key = (cell.0 + dx, cell.1 + dy, cell.2 + dz);
                    let Some(candidates) = grid.get(&key) else {
                        continue;
                    };
                    hits.extend(
                        candidates
                            .iter()
                            .copied()
                            .filter(|&t| (mesh.nodes[t].position - p).norm_squared() <= tol2),
                    );
                }
            }
        }
        hits.sort_unstable();
        pairs.extend(hits.iter().map(|&t| (s, t)));
    }
    pairs
}

/// Attach `other` to `mesh` and merge coincident boundary nodes.
///
/// The nodes of `mesh`'s faces are weld targets and the nodes of `other`'s
/// faces are sources, so both meshes should have their faces built. A source
/// and a target within `tol` of each other merge:
///
/// - a target that already carries a node partition absorbs the source
/// - otherwise the target is folded into the source
///
/// A feature point is therefore never discarded. Only face nodes take part:
/// interior nodes of solids are never merged, so two fully overlapping
/// meshes collapse to one node set only when every node lies on a face, as
/// in a shell mesh. References are remapped,
/// the orphaned duplicates removed, and the topology rebuilt with `builder`.
/// With `tol <= 0` the meshes are only attached, with no merge and no
/// rebuild.
///
/// # Errors
///
/// Returns an error if an element type of either mesh is not registered
/// with `builder`; neither mesh is modified in that case.
///
/// # Example
///
/// ```
/// use mesh_edit::attach_and_weld;
/// use mesh_topology::MeshBuilder;
/// use mesh_types::{MeshTransform, Vector3, hex_block};
///
/// let builder = MeshBuilder::default();
/// let mut left = hex_block(1, 1, 1);
/// builder.rebuild(&mut left).unwrap();
/// let mut right = left.clone();
/// right.transform = MeshTransform::from_translation(Vector3::new(1.0, 0.0, 0.0));
///
/// let summary = attach_and_weld(&mut left, &right, 1e-6, &builder).unwrap();
/// assert_eq!(summary.nodes_merged, 4);
/// assert_eq!(left.node_count(), 12);
/// assert_eq!(left.face_count(), 11);
/// ```
pub fn attach_and_weld(
    mesh: &mut FeMesh,
    other: &FeMesh,
    tol: f64,
    builder: &MeshBuilder,
) -> EditResult<WeldSummary> {
    builder.shapes(mesh)?;
    builder.shapes(other)?;

    let offsets: AttachOffsets = attach(mesh, other);
    let mut summary = WeldSummary {
        nodes_attached: other.node_count(),
        elements_attached: other.element_count(),
        nodes_merged: 0,
    };
    if tol <= 0.0 {
        debug!("Weld tolerance {} disables welding", tol);
        return Ok(summary);
    }

    let targets = face_nodes(mesh, 0..offsets.faces);
    let sources = face_nodes(mesh, offsets.faces..mesh.face_count());

    let mut order: Vec<usize> = (0..mesh.node_count()).collect();
    for (s, t) in coincident_pairs(mesh, &sources, &targets, tol) {
        if mesh.nodes[t].gid >= 0 {
            order[s] = t;
        } else {
            order[t] = s;
        }
    }

    // Resolve transitive merges
    for i in 0..order.len() {
        let mut target = order[i];
        let mut hops = 0;
        while order[target] != target && hops < order.len() {
            target = order[target];
            hops += 1;
        }
        order[i] = target;
    }

    let remap = |n: &mut usize| *n = order[*n];
    for el in &mut mesh.elements {
        el.nodes.iter_mut().for_each(remap);
    }
    for face in &mut mesh.faces {
        face.nodes.iter_mut().for_each(remap);
    }
    for edge in &mut mesh.edges {
        edge.nodes.iter_mut().for_each(remap);
    }
    for set in &mut mesh.node_sets {
        set.items.iter_mut().for_each(remap);
        set.items.sort_unstable();
        set.items.dedup();
    }

    let keep: Vec<bool> = (0..order.len()).map(|i| order[i] == i).collect();
    let map = mesh.retain_nodes(&keep);
    summary.nodes_merged = map.removed_count();

    builder.rebuild(mesh)?;
    info!("{}", summary);
    Ok(summary)
}

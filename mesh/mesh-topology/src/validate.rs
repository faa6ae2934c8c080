//! Topology validation and health reporting.
//!
//! Checks a rebuilt mesh against the invariants the passes of this crate
//! maintain. Intended for tests, debug assertions, and diagnosing input that
//! rebuilt with ambiguities.

use hashbrown::HashSet;
use mesh_types::{FeMesh, ItemKind, Partitioned};
use smallvec::SmallVec;

/// Report of topology validation results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyReport {
    /// Total number of nodes.
    pub node_count: usize,
    /// Total number of edges.
    pub edge_count: usize,
    /// Total number of faces.
    pub face_count: usize,
    /// Total number of elements.
    pub element_count: usize,

    /// Whether every stored index is in range. Other checks are skipped
    /// when this is `false`.
    pub references_valid: bool,
    /// Item kinds whose partition ids have gaps.
    pub non_contiguous: Vec<ItemKind>,
    /// Solid-solid neighbor links without a link back.
    pub asymmetric_neighbors: usize,
    /// Edge links to an edge in another partition.
    pub cross_partition_edge_links: usize,
    /// Faces without any owning element.
    pub ownerless_faces: usize,
    /// Faces whose exterior flag disagrees with their owner count.
    pub exterior_mismatches: usize,
    /// Faces with the same node set as an earlier face.
    pub duplicate_faces: usize,
}

impl TopologyReport {
    /// Check that the structural invariants hold.
    ///
    /// Duplicate faces are not counted here, since a mesh may carry them
    /// deliberately.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.references_valid
            && self.non_contiguous.is_empty()
            && self.asymmetric_neighbors == 0
            && self.cross_partition_edge_links == 0
            && self.ownerless_faces == 0
            && self.exterior_mismatches == 0
    }

    /// Check if the mesh has any issues, duplicate faces included.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.is_consistent() || self.duplicate_faces > 0
    }

    /// Get a count of total issues found.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        usize::from(!self.references_valid)
            + self.non_contiguous.len()
            + self.asymmetric_neighbors
            + self.cross_partition_edge_links
            + self.ownerless_faces
            + self.exterior_mismatches
            + self.duplicate_faces
    }
}

impl std::fmt::Display for TopologyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Topology Report:")?;
        writeln!(f, "  Nodes: {}", self.node_count)?;
        writeln!(f, "  Edges: {}", self.edge_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(f, "  Elements: {}", self.element_count)?;
        writeln!(f)?;
        writeln!(
            f,
            "  Status: {}",
            if self.is_consistent() {
                "Consistent"
            } else {
                "Inconsistent"
            }
        )?;

        if self.has_issues() {
            writeln!(f)?;
            writeln!(f, "  Issues:")?;
            if !self.references_valid {
                writeln!(f, "    Dangling references")?;
            }
            for kind in &self.non_contiguous {
                writeln!(f, "    Non-contiguous {kind} partitions")?;
            }
            if self.asymmetric_neighbors > 0 {
                writeln!(f, "    Asymmetric neighbors: {}", self.asymmetric_neighbors)?;
            }
            if self.cross_partition_edge_links > 0 {
                writeln!(
                    f,
                    "    Cross-partition edge links: {}",
                    self.cross_partition_edge_links
                )?;
            }
            if self.ownerless_faces > 0 {
                writeln!(f, "    Ownerless faces: {}", self.ownerless_faces)?;
            }
            if self.exterior_mismatches > 0 {
                writeln!(f, "    Exterior mismatches: {}", self.exterior_mismatches)?;
            }
            if self.duplicate_faces > 0 {
                writeln!(f, "    Duplicate faces: {}", self.duplicate_faces)?;
            }
        }

        Ok(())
    }
}

/// Validate the derived topology of a mesh.
///
/// # Example
///
/// ```
/// use mesh_topology::{MeshBuilder, validate_topology};
/// use mesh_types::hex_block;
///
/// let mut mesh = hex_block(2, 2, 2);
/// MeshBuilder::default().rebuild(&mut mesh).unwrap();
///
/// let report = validate_topology(&mesh);
/// assert!(report.is_consistent());
/// assert_eq!(report.face_count, 24);
/// ```
#[must_use]
pub fn validate_topology(mesh: &FeMesh) -> TopologyReport {
    let mut report = TopologyReport {
        node_count: mesh.node_count(),
        edge_count: mesh.edge_count(),
        face_count: mesh.face_count(),
        element_count: mesh.element_count(),
        references_valid: mesh.validate_references().is_ok(),
        ..Default::default()
    };
    if !report.references_valid {
        return report;
    }

    let kinds = [
        (ItemKind::Node, is_contiguous(&mesh.nodes)),
        (ItemKind::Edge, is_contiguous(&mesh.edges)),
        (ItemKind::Face, is_contiguous(&mesh.faces)),
        (ItemKind::Element, is_contiguous(&mesh.elements)),
    ];
    report.non_contiguous = kinds
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(kind, _)| kind)
        .collect();

    report.asymmetric_neighbors = count_asymmetric_neighbors(mesh);
    report.cross_partition_edge_links = mesh
        .edges
        .iter()
        .flat_map(|edge| edge.nbr.iter().flatten().map(move |&k| (edge.gid, k)))
        .filter(|&(gid, k)| mesh.edges[k].gid != gid)
        .count();
    report.ownerless_faces = mesh.faces.iter().filter(|f| f.owners[0].is_none()).count();
    report.exterior_mismatches = mesh
        .faces
        .iter()
        .filter(|f| f.exterior != f.owners[1].is_none())
        .count();
    report.duplicate_faces = count_duplicate_faces(mesh);
    report
}

/// Assigned ids cover exactly `0..N`.
fn is_contiguous<T: Partitioned>(items: &[T]) -> bool {
    let Some(max) = items.iter().map(Partitioned::gid).max() else {
        return true;
    };
    let Ok(len) = usize::try_from(max + 1) else {
        return true;
    };
    let mut seen = vec![false; len];
    for id in items.iter().filter_map(|item| usize::try_from(item.gid()).ok()) {
        seen[id] = true;
    }
    seen.into_iter().all(|s| s)
}

fn count_asymmetric_neighbors(mesh: &FeMesh) -> usize {
    let mut count = 0;
    for (i, el) in mesh.elements.iter().enumerate() {
        if !el.is_solid() {
            continue;
        }
        for &k in el.nbr.iter().flatten() {
            let other = &mesh.elements[k];
            if other.is_solid() && !other.nbr.contains(&Some(i)) {
                count += 1;
            }
        }
    }
    count
}

fn count_duplicate_faces(mesh: &FeMesh) -> usize {
    let mut seen: HashSet<SmallVec<[usize; 10]>> = HashSet::with_capacity(mesh.face_count());
    let mut duplicates = 0;
    for face in &mesh.faces {
        let mut key: SmallVec<[usize; 10]> = face.nodes.clone();
        key.sort_unstable();
        if !seen.insert(key) {
            duplicates += 1;
        }
    }
    duplicates
}

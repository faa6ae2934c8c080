//! Mesh faces.

use smallvec::SmallVec;

use crate::{Edge, FaceType};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Node list of a face: corners, then edge nodes, then the center node.
pub type FaceNodes = SmallVec<[usize; 10]>;

/// An element that owns a face, with the local face index inside it.
///
/// Shells own their face through local index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceOwner {
    /// Owning element index.
    pub element: usize,
    /// Local face index within the owning element.
    pub local: usize,
}

impl FaceOwner {
    /// Create an owner reference.
    #[inline]
    #[must_use]
    pub const fn new(element: usize, local: usize) -> Self {
        Self { element, local }
    }
}

/// A synthesized boundary or interface face.
///
/// # Owners
///
/// `owners[0]` is the primary owner. A face shared by two solids has a
/// second owner, and a shell sandwiched between two solids fills all three.
/// A face without a second owner is exterior.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Face {
    /// Face type.
    pub face_type: FaceType,
    /// Node indices.
    pub nodes: FaceNodes,
    /// Face partition (surface) id, or -1.
    pub gid: i32,
    /// Smoothing group id.
    pub sid: i32,
    /// Scratch tag.
    pub tag: i32,
    /// Neighboring face across each local edge.
    pub nbr: [Option<usize>; 4],
    /// Owning elements.
    pub owners: [Option<FaceOwner>; 3],
    /// Whether the face lies on the outer boundary.
    pub exterior: bool,
}

impl Face {
    /// Create a face with no owners and no neighbors.
    #[must_use]
    pub fn new(face_type: FaceType, nodes: &[usize]) -> Self {
        Self {
            face_type,
            nodes: nodes.iter().copied().collect(),
            gid: 0,
            sid: 0,
            tag: 0,
            nbr: [None; 4],
            owners: [None; 3],
            exterior: false,
        }
    }

    /// Corner nodes.
    #[inline]
    #[must_use]
    pub fn corners(&self) -> &[usize] {
        &self.nodes[..self.face_type.corner_count()]
    }

    /// Number of local edges.
    #[inline]
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.face_type.edge_count()
    }

    /// Global node indices of local edge `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.edge_count()`.
    #[must_use]
    pub fn edge_nodes(&self, j: usize) -> SmallVec<[usize; 4]> {
        self.face_type
            .local_edge(j)
            .iter()
            .map(|&k| self.nodes[k])
            .collect()
    }

    /// Build the [`Edge`] for local edge `j`.
    #[must_use]
    pub fn edge(&self, j: usize) -> Edge {
        Edge::new(&self.edge_nodes(j))
    }

    /// Returns `true` if the face contains the node.
    #[inline]
    #[must_use]
    pub fn has_node(&self, node: usize) -> bool {
        self.nodes.contains(&node)
    }

    /// Returns `true` if `a`-`b` is one of the corner edges, in either order.
    #[must_use]
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        let c = self.corners();
        let n = c.len();
        (0..n).any(|j| {
            let (p, q) = (c[j], c[(j + 1) % n]);
            (p == a && q == b) || (p == b && q == a)
        })
    }

    /// Geometric equality, independent of winding and starting node.
    ///
    /// Corner nodes compare as a set, edge nodes compare as a set, and the
    /// center node (if any) must be identical.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        if self.face_type != other.face_type {
            return false;
        }
        let nc = self.face_type.corner_count();
        let nm = self.face_type.edge_node_count();
        let same_set = |a: &[usize], b: &[usize]| a.iter().all(|n| b.contains(n));

        if !same_set(&self.nodes[..nc], &other.nodes[..nc]) {
            return false;
        }
        if !same_set(&self.nodes[nc..nc + nm], &other.nodes[nc..nc + nm]) {
            return false;
        }
        self.nodes[nc + nm..] == other.nodes[nc + nm..]
    }

    /// Returns `true` if this is a triangle whose corners all lie on the
    /// corners of the quad `other`.
    #[must_use]
    pub fn lies_inside(&self, other: &Self) -> bool {
        !self.face_type.is_quad()
            && other.face_type.is_quad()
            && self.corners().iter().all(|n| other.corners().contains(n))
    }

    /// Number of assigned owners.
    #[must_use]
    pub fn owner_count(&self) -> usize {
        self.owners.iter().flatten().count()
    }

    /// Returns `true` if `element` is one of the owners.
    #[must_use]
    pub fn is_owned_by(&self, element: usize) -> bool {
        self.owners.iter().flatten().any(|o| o.element == element)
    }

    /// Owning element indices, primary first.
    pub fn owner_elements(&self) -> impl Iterator<Item = usize> + '_ {
        self.owners.iter().flatten().map(|o| o.element)
    }

    /// Clear all owner slots.
    pub fn clear_owners(&mut self) {
        self.owners = [None; 3];
    }

    /// Reverse the winding using the face type's swap table.
    ///
    /// Returns `false` (leaving the face unchanged) if the type has no rule.
    pub fn invert(&mut self) -> bool {
        let Some(swaps) = self.face_type.inversion() else {
            return false;
        };
        for &(a, b) in swaps {
            self.nodes.swap(a, b);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_ignores_rotation_and_winding() {
        let a = Face::new(FaceType::Quad4, &[0, 1, 2, 3]);
        let b = Face::new(FaceType::Quad4, &[2, 1, 0, 3]);
        assert!(a.matches(&b));
        assert!(!a.matches(&Face::new(FaceType::Quad4, &[0, 1, 2, 4])));
    }

    #[test]
    fn matches_keeps_node_groups_apart() {
        let a = Face::new(FaceType::Tri7, &[0, 1, 2, 3, 4, 5, 6]);
        let b = Face::new(FaceType::Tri7, &[2, 1, 0, 4, 3, 5, 6]);
        let c = Face::new(FaceType::Tri7, &[2, 1, 0, 4, 3, 5, 9]);
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
    }

    #[test]
    fn has_edge_in_either_direction() {
        let f = Face::new(FaceType::Tri6, &[10, 11, 12, 13, 14, 15]);
        assert!(f.has_edge(12, 10));
        assert!(f.has_edge(11, 12));
        assert!(!f.has_edge(10, 13));
    }

    #[test]
    fn edge_nodes_map_to_globals() {
        let f = Face::new(FaceType::Quad8, &[10, 11, 12, 13, 14, 15, 16, 17]);
        assert_eq!(f.edge_nodes(3).as_slice(), &[13, 10, 17]);
        assert_eq!(f.edge(3).edge_type, crate::EdgeType::Edge3);
    }

    #[test]
    fn invert_flips_winding() {
        let mut f = Face::new(FaceType::Quad4, &[0, 1, 2, 3]);
        assert!(f.invert());
        assert_eq!(f.nodes.as_slice(), &[2, 1, 0, 3]);

        let mut t = Face::new(FaceType::Tri10, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert!(!t.invert());
    }

    #[test]
    fn triangle_inside_quad() {
        let q = Face::new(FaceType::Quad4, &[0, 1, 2, 3]);
        let t = Face::new(FaceType::Tri3, &[0, 1, 2]);
        assert!(t.lies_inside(&q));
        assert!(!q.lies_inside(&t));
    }
}

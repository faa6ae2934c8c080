//! Element, face, and edge type enumerations.
//!
//! Every element belongs to exactly one [`ElementClass`]. The class decides
//! how neighbors are resolved: solids through their local faces, shells
//! through their local edges, and beams through their two end nodes.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Topological class of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ElementClass {
    /// Volumetric element (tet, hex, penta, pyra).
    Solid,
    /// Surface element (tri, quad).
    Shell,
    /// Line element.
    Beam,
}

/// Concrete element type.
///
/// Node numbering follows the FEBio conventions: corner nodes first, then
/// edge nodes, then face and volume centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ElementType {
    /// Linear tetrahedron.
    Tet4,
    /// Tetrahedron with a center node.
    Tet5,
    /// Quadratic tetrahedron.
    Tet10,
    /// Quadratic tetrahedron with face and volume centers.
    Tet15,
    /// Cubic tetrahedron.
    Tet20,
    /// Linear hexahedron.
    Hex8,
    /// Serendipity quadratic hexahedron.
    Hex20,
    /// Lagrange quadratic hexahedron.
    Hex27,
    /// Linear wedge.
    Penta6,
    /// Quadratic wedge.
    Penta15,
    /// Linear pyramid.
    Pyra5,
    /// Quadratic pyramid.
    Pyra13,
    /// Linear triangle shell.
    Tri3,
    /// Quadratic triangle shell.
    Tri6,
    /// Quadratic triangle shell with a center node.
    Tri7,
    /// Cubic triangle shell.
    Tri10,
    /// Linear quadrilateral shell.
    Quad4,
    /// Serendipity quadrilateral shell.
    Quad8,
    /// Lagrange quadrilateral shell.
    Quad9,
    /// Linear beam.
    Beam2,
    /// Quadratic beam.
    Beam3,
}

impl ElementType {
    /// Every element type, in declaration order.
    pub const ALL: [Self; 21] = [
        Self::Tet4,
        Self::Tet5,
        Self::Tet10,
        Self::Tet15,
        Self::Tet20,
        Self::Hex8,
        Self::Hex20,
        Self::Hex27,
        Self::Penta6,
        Self::Penta15,
        Self::Pyra5,
        Self::Pyra13,
        Self::Tri3,
        Self::Tri6,
        Self::Tri7,
        Self::Tri10,
        Self::Quad4,
        Self::Quad8,
        Self::Quad9,
        Self::Beam2,
        Self::Beam3,
    ];

    /// Topological class of this type.
    #[must_use]
    pub const fn class(self) -> ElementClass {
        match self {
            Self::Tet4
            | Self::Tet5
            | Self::Tet10
            | Self::Tet15
            | Self::Tet20
            | Self::Hex8
            | Self::Hex20
            | Self::Hex27
            | Self::Penta6
            | Self::Penta15
            | Self::Pyra5
            | Self::Pyra13 => ElementClass::Solid,
            Self::Tri3
            | Self::Tri6
            | Self::Tri7
            | Self::Tri10
            | Self::Quad4
            | Self::Quad8
            | Self::Quad9 => ElementClass::Shell,
            Self::Beam2 | Self::Beam3 => ElementClass::Beam,
        }
    }

    /// Number of nodes in the connectivity list.
    #[must_use]
    pub const fn node_count(self) -> usize {
        match self {
            Self::Beam2 => 2,
            Self::Tri3 | Self::Beam3 => 3,
            Self::Tet4 | Self::Quad4 => 4,
            Self::Tet5 | Self::Pyra5 => 5,
            Self::Penta6 | Self::Tri6 => 6,
            Self::Tri7 => 7,
            Self::Hex8 | Self::Quad8 => 8,
            Self::Quad9 => 9,
            Self::Tet10 | Self::Tri10 => 10,
            Self::Pyra13 => 13,
            Self::Tet15 | Self::Penta15 => 15,
            Self::Tet20 | Self::Hex20 => 20,
            Self::Hex27 => 27,
        }
    }

    /// Number of corner (vertex) nodes.
    #[must_use]
    pub const fn corner_count(self) -> usize {
        match self {
            Self::Beam2 | Self::Beam3 => 2,
            Self::Tri3 | Self::Tri6 | Self::Tri7 | Self::Tri10 => 3,
            Self::Tet4
            | Self::Tet5
            | Self::Tet10
            | Self::Tet15
            | Self::Tet20
            | Self::Quad4
            | Self::Quad8
            | Self::Quad9 => 4,
            Self::Pyra5 | Self::Pyra13 => 5,
            Self::Penta6 | Self::Penta15 => 6,
            Self::Hex8 | Self::Hex20 | Self::Hex27 => 8,
        }
    }

    /// Returns `true` for solid elements.
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self.class(), ElementClass::Solid)
    }

    /// Returns `true` for shell elements.
    #[inline]
    #[must_use]
    pub const fn is_shell(self) -> bool {
        matches!(self.class(), ElementClass::Shell)
    }

    /// Returns `true` for beam elements.
    #[inline]
    #[must_use]
    pub const fn is_beam(self) -> bool {
        matches!(self.class(), ElementClass::Beam)
    }

    /// Face type produced by a shell element's own surface.
    ///
    /// Returns `None` for solids and beams.
    #[must_use]
    pub const fn shell_face_type(self) -> Option<FaceType> {
        match self {
            Self::Tri3 => Some(FaceType::Tri3),
            Self::Tri6 => Some(FaceType::Tri6),
            Self::Tri7 => Some(FaceType::Tri7),
            Self::Tri10 => Some(FaceType::Tri10),
            Self::Quad4 => Some(FaceType::Quad4),
            Self::Quad8 => Some(FaceType::Quad8),
            Self::Quad9 => Some(FaceType::Quad9),
            _ => None,
        }
    }

    /// Lower-case name, as used in FEBio input files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tet4 => "tet4",
            Self::Tet5 => "tet5",
            Self::Tet10 => "tet10",
            Self::Tet15 => "tet15",
            Self::Tet20 => "tet20",
            Self::Hex8 => "hex8",
            Self::Hex20 => "hex20",
            Self::Hex27 => "hex27",
            Self::Penta6 => "penta6",
            Self::Penta15 => "penta15",
            Self::Pyra5 => "pyra5",
            Self::Pyra13 => "pyra13",
            Self::Tri3 => "tri3",
            Self::Tri6 => "tri6",
            Self::Tri7 => "tri7",
            Self::Tri10 => "tri10",
            Self::Quad4 => "quad4",
            Self::Quad8 => "quad8",
            Self::Quad9 => "quad9",
            Self::Beam2 => "line2",
            Self::Beam3 => "line3",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Face type of a boundary or interface facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaceType {
    /// Linear triangle.
    Tri3,
    /// Linear quadrilateral.
    Quad4,
    /// Quadratic triangle.
    Tri6,
    /// Quadratic triangle with a center node.
    Tri7,
    /// Serendipity quadrilateral.
    Quad8,
    /// Lagrange quadrilateral.
    Quad9,
    /// Cubic triangle.
    Tri10,
}

impl FaceType {
    /// Total number of nodes.
    #[must_use]
    pub const fn node_count(self) -> usize {
        match self {
            Self::Tri3 => 3,
            Self::Quad4 => 4,
            Self::Tri6 => 6,
            Self::Tri7 => 7,
            Self::Quad8 => 8,
            Self::Quad9 => 9,
            Self::Tri10 => 10,
        }
    }

    /// Number of corner nodes (3 or 4).
    #[must_use]
    pub const fn corner_count(self) -> usize {
        if self.is_quad() { 4 } else { 3 }
    }

    /// Number of edges, which equals the number of corners.
    #[must_use]
    pub const fn edge_count(self) -> usize {
        self.corner_count()
    }

    /// Number of nodes lying on the edges, excluding corners.
    #[must_use]
    pub const fn edge_node_count(self) -> usize {
        match self {
            Self::Tri3 | Self::Quad4 => 0,
            Self::Tri6 | Self::Tri7 => 3,
            Self::Quad8 | Self::Quad9 => 4,
            Self::Tri10 => 6,
        }
    }

    /// Returns `true` for quadrilateral faces.
    #[must_use]
    pub const fn is_quad(self) -> bool {
        matches!(self, Self::Quad4 | Self::Quad8 | Self::Quad9)
    }

    /// Edge type of this face's edges.
    #[must_use]
    pub const fn edge_type(self) -> EdgeType {
        match self {
            Self::Tri3 | Self::Quad4 => EdgeType::Edge2,
            Self::Tri6 | Self::Tri7 | Self::Quad8 | Self::Quad9 => EdgeType::Edge3,
            Self::Tri10 => EdgeType::Edge4,
        }
    }

    /// Local node indices of edge `j`: two end nodes, then interior nodes.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.edge_count()`.
    #[must_use]
    pub const fn local_edge(self, j: usize) -> &'static [usize] {
        match self {
            Self::Tri3 => &TRI3_EDGES[j],
            Self::Quad4 => &QUAD4_EDGES[j],
            Self::Tri6 | Self::Tri7 => &TRI6_EDGES[j],
            Self::Quad8 | Self::Quad9 => &QUAD8_EDGES[j],
            Self::Tri10 => &TRI10_EDGES[j],
        }
    }

    /// Node swaps that reverse the winding of this face type.
    ///
    /// `None` means the type has no inversion rule.
    #[must_use]
    pub const fn inversion(self) -> Option<&'static [(usize, usize)]> {
        match self {
            Self::Tri3 | Self::Quad4 => Some(&[(0, 2)]),
            Self::Tri6 | Self::Tri7 => Some(&[(0, 2), (3, 4)]),
            Self::Quad8 | Self::Quad9 => Some(&[(0, 2), (4, 5), (6, 7)]),
            Self::Tri10 => None,
        }
    }
}

impl fmt::Display for FaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tri3 => "tri3",
            Self::Quad4 => "quad4",
            Self::Tri6 => "tri6",
            Self::Tri7 => "tri7",
            Self::Quad8 => "quad8",
            Self::Quad9 => "quad9",
            Self::Tri10 => "tri10",
        };
        f.write_str(name)
    }
}

const TRI3_EDGES: [[usize; 2]; 3] = [[0, 1], [1, 2], [2, 0]];
const QUAD4_EDGES: [[usize; 2]; 4] = [[0, 1], [1, 2], [2, 3], [3, 0]];
const TRI6_EDGES: [[usize; 3]; 3] = [[0, 1, 3], [1, 2, 4], [2, 0, 5]];
const QUAD8_EDGES: [[usize; 3]; 4] = [[0, 1, 4], [1, 2, 5], [2, 3, 6], [3, 0, 7]];
const TRI10_EDGES: [[usize; 4]; 3] = [[0, 1, 3, 4], [1, 2, 5, 6], [2, 0, 8, 7]];

/// Edge interpolation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EdgeType {
    /// Two-node line.
    Edge2,
    /// Three-node quadratic line.
    Edge3,
    /// Four-node cubic line.
    Edge4,
}

impl EdgeType {
    /// Number of nodes.
    #[must_use]
    pub const fn node_count(self) -> usize {
        match self {
            Self::Edge2 => 2,
            Self::Edge3 => 3,
            Self::Edge4 => 4,
        }
    }

    /// Edge type with the given node count, if any.
    #[must_use]
    pub const fn from_node_count(count: usize) -> Option<Self> {
        match count {
            2 => Some(Self::Edge2),
            3 => Some(Self::Edge3),
            4 => Some(Self::Edge4),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn classes_partition_all_types() {
        let solids = ElementType::ALL.iter().filter(|t| t.is_solid()).count();
        let shells = ElementType::ALL.iter().filter(|t| t.is_shell()).count();
        let beams = ElementType::ALL.iter().filter(|t| t.is_beam()).count();
        assert_eq!(solids, 12);
        assert_eq!(shells, 7);
        assert_eq!(beams, 2);
    }

    #[test]
    fn shells_have_a_face_type_with_matching_node_count() {
        for ty in ElementType::ALL.iter().filter(|t| t.is_shell()) {
            let face = ty.shell_face_type().unwrap();
            assert_eq!(face.node_count(), ty.node_count(), "{ty}");
        }
        assert!(ElementType::Hex8.shell_face_type().is_none());
    }

    #[test]
    fn face_edges_start_at_corners() {
        for face in [
            FaceType::Tri3,
            FaceType::Quad4,
            FaceType::Tri6,
            FaceType::Tri7,
            FaceType::Quad8,
            FaceType::Quad9,
            FaceType::Tri10,
        ] {
            for j in 0..face.edge_count() {
                let edge = face.local_edge(j);
                assert_eq!(edge.len(), face.edge_type().node_count());
                assert!(edge[0] < face.corner_count());
                assert!(edge[1] < face.corner_count());
            }
        }
    }

    #[test]
    fn edge_type_from_count() {
        assert_eq!(EdgeType::from_node_count(3), Some(EdgeType::Edge3));
        assert_eq!(EdgeType::from_node_count(5), None);
    }
}

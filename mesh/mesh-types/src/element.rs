//! Mesh elements.

use nalgebra::UnitQuaternion;
use smallvec::SmallVec;

use crate::{Edge, ElementClass, ElementShape, ElementType, Face};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of neighbor or face slots of any element type.
pub const MAX_SLOTS: usize = 6;

/// Node list of an element.
pub type ElementNodes = SmallVec<[usize; 8]>;

/// A finite element.
///
/// Solids use one `nbr`/`faces` slot per local face, shells one `nbr` slot
/// per local edge plus `faces[0]` for their own face, and beams one `nbr`
/// slot per end node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Element {
    /// Concrete element type.
    pub element_type: ElementType,
    /// Connectivity.
    pub nodes: ElementNodes,
    /// Element partition (part) id, or -1.
    pub gid: i32,
    /// Scratch tag.
    pub tag: i32,
    /// Neighbor element per face, edge, or end node.
    pub nbr: [Option<usize>; MAX_SLOTS],
    /// Synthesized face owned through each local face.
    pub faces: [Option<usize>; MAX_SLOTS],
    /// Whether the element touches the boundary.
    pub exterior: bool,
    /// Per-node shell thickness. Empty for non-shells.
    pub thickness: SmallVec<[f64; 4]>,
    /// Optional local material orientation.
    pub orientation: Option<UnitQuaternion<f64>>,
}

impl Element {
    /// Create an element in partition 0.
    ///
    /// The node count is not checked here; see `FeMesh::add_element`.
    #[must_use]
    pub fn new(element_type: ElementType, nodes: &[usize]) -> Self {
        let thickness = if element_type.is_shell() {
            SmallVec::from_elem(0.0, nodes.len())
        } else {
            SmallVec::new()
        };
        Self {
            element_type,
            nodes: nodes.iter().copied().collect(),
            gid: 0,
            tag: 0,
            nbr: [None; MAX_SLOTS],
            faces: [None; MAX_SLOTS],
            exterior: false,
            thickness,
            orientation: None,
        }
    }

    /// Set the element partition.
    #[must_use]
    pub const fn with_gid(mut self, gid: i32) -> Self {
        self.gid = gid;
        self
    }

    /// Topological class.
    #[inline]
    #[must_use]
    pub const fn class(&self) -> ElementClass {
        self.element_type.class()
    }

    /// Returns `true` for solids.
    #[inline]
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.element_type.is_solid()
    }

    /// Returns `true` for shells.
    #[inline]
    #[must_use]
    pub const fn is_shell(&self) -> bool {
        self.element_type.is_shell()
    }

    /// Returns `true` for beams.
    #[inline]
    #[must_use]
    pub const fn is_beam(&self) -> bool {
        self.element_type.is_beam()
    }

    /// Corner nodes.
    #[inline]
    #[must_use]
    pub fn corners(&self) -> &[usize] {
        let n = self.element_type.corner_count().min(self.nodes.len());
        &self.nodes[..n]
    }

    /// Returns `true` if the element references `node`.
    #[inline]
    #[must_use]
    pub fn has_node(&self, node: usize) -> bool {
        self.nodes.contains(&node)
    }

    /// Same type and the same corner node set.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.element_type == other.element_type
            && self.corners().iter().all(|n| other.corners().contains(n))
    }

    /// Extract local face `j` of a solid as a [`Face`].
    ///
    /// Returns `None` if `j` is not a local face of `shape`.
    #[must_use]
    pub fn local_face(&self, shape: &ElementShape, j: usize) -> Option<Face> {
        let lf = shape.faces.get(j)?;
        let nodes: SmallVec<[usize; 10]> = lf.nodes.iter().map(|&k| self.nodes[k]).collect();
        Some(Face::new(lf.face_type, &nodes))
    }

    /// The shell's own face. `None` for solids and beams.
    #[must_use]
    pub fn shell_face(&self) -> Option<Face> {
        let face_type = self.element_type.shell_face_type()?;
        Some(Face::new(face_type, &self.nodes))
    }

    /// Local edge `j` of a shell as an [`Edge`].
    #[must_use]
    pub fn shell_edge(&self, shape: &ElementShape, j: usize) -> Option<Edge> {
        let local = shape.shell_edge(j)?;
        let nodes: SmallVec<[usize; 4]> = local.iter().map(|&k| self.nodes[k]).collect();
        Some(Edge::new(&nodes))
    }

    /// Index of the local face of a solid that matches `face`.
    #[must_use]
    pub fn find_face(&self, shape: &ElementShape, face: &Face) -> Option<usize> {
        (0..shape.face_count()).find(|&j| {
            self.local_face(shape, j)
                .is_some_and(|local| local.matches(face))
        })
    }

    /// Index of the local shell edge that matches `edge`.
    #[must_use]
    pub fn find_shell_edge(&self, shape: &ElementShape, edge: &Edge) -> Option<usize> {
        (0..shape.neighbor_slots()).find(|&j| {
            self.shell_edge(shape, j)
                .is_some_and(|local| local.matches(edge))
        })
    }

    /// Reset neighbor and owned-face slots.
    pub fn clear_topology(&mut self) {
        self.nbr = [None; MAX_SLOTS];
        self.faces = [None; MAX_SLOTS];
        self.exterior = false;
    }

    /// Apply the shape's inversion permutation.
    ///
    /// Returns `false` (leaving the element unchanged) if the type has no rule.
    pub fn invert(&mut self, shape: &ElementShape) -> bool {
        let Some(swaps) = shape.inversion else {
            return false;
        };
        for &(a, b) in swaps {
            self.nodes.swap(a, b);
            if self.thickness.len() == self.nodes.len() {
                self.thickness.swap(a, b);
            }
        }
        true
    }
}

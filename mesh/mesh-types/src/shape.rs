//! Static topology tables for every element type.
//!
//! An [`ElementShape`] answers the questions the topology engine asks about
//! an element: which local faces does a solid have, which local edges does a
//! shell have, how many neighbor slots are there, and how are nodes permuted
//! to flip orientation.

use crate::{ElementClass, ElementType, FaceType};

use FaceType::{
    Quad4 as Q4, Quad8 as Q8, Quad9 as Q9, Tri3 as T3, Tri6 as T6, Tri7 as T7, Tri10 as T10,
};

/// A local face of a solid element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalFace {
    /// Face type of the extracted face.
    pub face_type: FaceType,
    /// Local node indices, ordered so the face normal points outward.
    pub nodes: &'static [usize],
}

impl LocalFace {
    const fn new(face_type: FaceType, nodes: &'static [usize]) -> Self {
        Self { face_type, nodes }
    }
}

/// Topology description of one element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementShape {
    /// The element type described.
    pub element_type: ElementType,
    /// Local faces (solids only; empty for shells and beams).
    pub faces: &'static [LocalFace],
    /// Node swaps that invert the element, if the type supports inversion.
    pub inversion: Option<&'static [(usize, usize)]>,
}

impl ElementShape {
    /// Topological class of the described type.
    #[inline]
    #[must_use]
    pub const fn class(&self) -> ElementClass {
        self.element_type.class()
    }

    /// Number of neighbor slots: faces for solids, edges for shells, two for beams.
    #[must_use]
    pub const fn neighbor_slots(&self) -> usize {
        match self.class() {
            ElementClass::Solid => self.faces.len(),
            ElementClass::Shell => match self.element_type.shell_face_type() {
                Some(face) => face.edge_count(),
                None => 0,
            },
            ElementClass::Beam => 2,
        }
    }

    /// Number of local faces a solid contributes (0 for shells and beams).
    #[inline]
    #[must_use]
    pub const fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Local node indices of shell edge `j`.
    ///
    /// Returns `None` for non-shells or when `j` is out of range.
    #[must_use]
    pub fn shell_edge(&self, j: usize) -> Option<&'static [usize]> {
        let face = self.element_type.shell_face_type()?;
        (j < face.edge_count()).then(|| face.local_edge(j))
    }
}

/// Look up the built-in shape for an element type.
#[must_use]
pub fn builtin_shape(element_type: ElementType) -> &'static ElementShape {
    match element_type {
        ElementType::Tet4 => &TET4,
        ElementType::Tet5 => &TET5,
        ElementType::Tet10 => &TET10,
        ElementType::Tet15 => &TET15,
        ElementType::Tet20 => &TET20,
        ElementType::Hex8 => &HEX8,
        ElementType::Hex20 => &HEX20,
        ElementType::Hex27 => &HEX27,
        ElementType::Penta6 => &PENTA6,
        ElementType::Penta15 => &PENTA15,
        ElementType::Pyra5 => &PYRA5,
        ElementType::Pyra13 => &PYRA13,
        ElementType::Tri3 => &TRI3,
        ElementType::Tri6 => &TRI6,
        ElementType::Tri7 => &TRI7,
        ElementType::Tri10 => &TRI10,
        ElementType::Quad4 => &QUAD4,
        ElementType::Quad8 => &QUAD8,
        ElementType::Quad9 => &QUAD9,
        ElementType::Beam2 => &BEAM2,
        ElementType::Beam3 => &BEAM3,
    }
}

const fn shape(
    element_type: ElementType,
    faces: &'static [LocalFace],
    inversion: Option<&'static [(usize, usize)]>,
) -> ElementShape {
    ElementShape {
        element_type,
        faces,
        inversion,
    }
}

// ============================================================================
// Face tables
// ============================================================================

const TET4_FACES: [LocalFace; 4] = [
    LocalFace::new(T3, &[0, 1, 3]),
    LocalFace::new(T3, &[1, 2, 3]),
    LocalFace::new(T3, &[0, 3, 2]),
    LocalFace::new(T3, &[0, 2, 1]),
];

const TET10_FACES: [LocalFace; 4] = [
    LocalFace::new(T6, &[0, 1, 3, 4, 8, 7]),
    LocalFace::new(T6, &[1, 2, 3, 5, 9, 8]),
    LocalFace::new(T6, &[2, 0, 3, 6, 7, 9]),
    LocalFace::new(T6, &[2, 1, 0, 5, 4, 6]),
];

const TET15_FACES: [LocalFace; 4] = [
    LocalFace::new(T7, &[0, 1, 3, 4, 8, 7, 11]),
    LocalFace::new(T7, &[1, 2, 3, 5, 9, 8, 12]),
    LocalFace::new(T7, &[2, 0, 3, 6, 7, 9, 13]),
    LocalFace::new(T7, &[2, 1, 0, 5, 4, 6, 10]),
];

const TET20_FACES: [LocalFace; 4] = [
    LocalFace::new(T10, &[0, 1, 3, 4, 5, 12, 13, 10, 11, 16]),
    LocalFace::new(T10, &[1, 2, 3, 6, 7, 14, 15, 12, 13, 17]),
    LocalFace::new(T10, &[2, 0, 3, 9, 8, 10, 11, 14, 15, 18]),
    LocalFace::new(T10, &[2, 1, 0, 7, 6, 5, 4, 9, 8, 19]),
];

const HEX8_FACES: [LocalFace; 6] = [
    LocalFace::new(Q4, &[0, 1, 5, 4]),
    LocalFace::new(Q4, &[1, 2, 6, 5]),
    LocalFace::new(Q4, &[2, 3, 7, 6]),
    LocalFace::new(Q4, &[3, 0, 4, 7]),
    LocalFace::new(Q4, &[3, 2, 1, 0]),
    LocalFace::new(Q4, &[4, 5, 6, 7]),
];

const HEX20_FACES: [LocalFace; 6] = [
    LocalFace::new(Q8, &[0, 1, 5, 4, 8, 17, 12, 16]),
    LocalFace::new(Q8, &[1, 2, 6, 5, 9, 18, 13, 17]),
    LocalFace::new(Q8, &[2, 3, 7, 6, 10, 19, 14, 18]),
    LocalFace::new(Q8, &[3, 0, 4, 7, 11, 16, 15, 19]),
    LocalFace::new(Q8, &[3, 2, 1, 0, 10, 9, 8, 11]),
    LocalFace::new(Q8, &[4, 5, 6, 7, 12, 13, 14, 15]),
];

const HEX27_FACES: [LocalFace; 6] = [
    LocalFace::new(Q9, &[0, 1, 5, 4, 8, 17, 12, 16, 20]),
    LocalFace::new(Q9, &[1, 2, 6, 5, 9, 18, 13, 17, 21]),
    LocalFace::new(Q9, &[2, 3, 7, 6, 10, 19, 14, 18, 22]),
    LocalFace::new(Q9, &[3, 0, 4, 7, 11, 16, 15, 19, 23]),
    LocalFace::new(Q9, &[3, 2, 1, 0, 10, 9, 8, 11, 24]),
    LocalFace::new(Q9, &[4, 5, 6, 7, 12, 13, 14, 15, 25]),
];

const PENTA6_FACES: [LocalFace; 5] = [
    LocalFace::new(Q4, &[0, 1, 4, 3]),
    LocalFace::new(Q4, &[1, 2, 5, 4]),
    LocalFace::new(Q4, &[0, 3, 5, 2]),
    LocalFace::new(T3, &[0, 2, 1]),
    LocalFace::new(T3, &[3, 4, 5]),
];

const PENTA15_FACES: [LocalFace; 5] = [
    LocalFace::new(Q8, &[0, 1, 4, 3, 6, 13, 9, 12]),
    LocalFace::new(Q8, &[1, 2, 5, 4, 7, 14, 10, 13]),
    LocalFace::new(Q8, &[0, 3, 5, 2, 12, 11, 14, 8]),
    LocalFace::new(T6, &[0, 2, 1, 8, 7, 6]),
    LocalFace::new(T6, &[3, 4, 5, 9, 10, 11]),
];

const PYRA5_FACES: [LocalFace; 5] = [
    LocalFace::new(T3, &[0, 1, 4]),
    LocalFace::new(T3, &[1, 2, 4]),
    LocalFace::new(T3, &[2, 3, 4]),
    LocalFace::new(T3, &[3, 0, 4]),
    LocalFace::new(Q4, &[3, 2, 1, 0]),
];

const PYRA13_FACES: [LocalFace; 5] = [
    LocalFace::new(T6, &[0, 1, 4, 5, 10, 9]),
    LocalFace::new(T6, &[1, 2, 4, 6, 11, 10]),
    LocalFace::new(T6, &[2, 3, 4, 7, 12, 11]),
    LocalFace::new(T6, &[3, 0, 4, 8, 9, 12]),
    LocalFace::new(Q8, &[3, 2, 1, 0, 7, 6, 5, 8]),
];

// ============================================================================
// Shapes
// ============================================================================

static TET4: ElementShape = shape(ElementType::Tet4, &TET4_FACES, Some(&[(0, 3)]));
static TET5: ElementShape = shape(ElementType::Tet5, &TET4_FACES, Some(&[(0, 3)]));
static TET10: ElementShape = shape(
    ElementType::Tet10,
    &TET10_FACES,
    Some(&[(1, 2), (4, 6), (8, 9)]),
);
static TET15: ElementShape = shape(ElementType::Tet15, &TET15_FACES, None);
static TET20: ElementShape = shape(ElementType::Tet20, &TET20_FACES, None);
static HEX8: ElementShape = shape(
    ElementType::Hex8,
    &HEX8_FACES,
    Some(&[(0, 4), (1, 5), (2, 6), (3, 7)]),
);
static HEX20: ElementShape = shape(
    ElementType::Hex20,
    &HEX20_FACES,
    Some(&[
        (1, 3),
        (5, 7),
        (8, 11),
        (9, 10),
        (12, 15),
        (13, 14),
        (17, 19),
    ]),
);
static HEX27: ElementShape = shape(ElementType::Hex27, &HEX27_FACES, None);
static PENTA6: ElementShape = shape(ElementType::Penta6, &PENTA6_FACES, Some(&[(0, 2), (3, 5)]));
static PENTA15: ElementShape = shape(
    ElementType::Penta15,
    &PENTA15_FACES,
    Some(&[(1, 2), (4, 5), (6, 8), (9, 11), (13, 14)]),
);
static PYRA5: ElementShape = shape(ElementType::Pyra5, &PYRA5_FACES, Some(&[(1, 3)]));
static PYRA13: ElementShape = shape(
    ElementType::Pyra13,
    &PYRA13_FACES,
    Some(&[(1, 3), (5, 8), (6, 7), (10, 12)]),
);
static TRI3: ElementShape = shape(ElementType::Tri3, &[], Some(&[(0, 2)]));
static TRI6: ElementShape = shape(ElementType::Tri6, &[], Some(&[(0, 2), (3, 4)]));
static TRI7: ElementShape = shape(ElementType::Tri7, &[], Some(&[(0, 2), (3, 4)]));
static TRI10: ElementShape = shape(ElementType::Tri10, &[], None);
static QUAD4: ElementShape = shape(ElementType::Quad4, &[], Some(&[(0, 3), (1, 2)]));
static QUAD8: ElementShape = shape(ElementType::Quad8, &[], None);
static QUAD9: ElementShape = shape(ElementType::Quad9, &[], None);
static BEAM2: ElementShape = shape(ElementType::Beam2, &[], None);
static BEAM3: ElementShape = shape(ElementType::Beam3, &[], None);

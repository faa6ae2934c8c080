//! Mesh nodes.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mesh node: a position plus partition bookkeeping.
///
/// # Example
///
/// ```
/// use mesh_types::Node;
///
/// let n = Node::from_coords(1.0, 2.0, 3.0);
/// assert_eq!(n.gid, -1);
/// assert!(!n.exterior);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// Position in mesh-local coordinates.
    pub position: Point3<f64>,
    /// Node partition (feature point) id, or -1.
    pub gid: i32,
    /// Scratch tag used by edit operations.
    pub tag: i32,
    /// Whether the node lies on an exterior face or a beam.
    pub exterior: bool,
}

impl Node {
    /// Create an unpartitioned node at `position`.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            gid: -1,
            tag: 0,
            exterior: false,
        }
    }

    /// Create a node from coordinates.
    #[inline]
    #[must_use]
    pub const fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}

impl From<Point3<f64>> for Node {
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}

//! Mesh edges.

use smallvec::SmallVec;

use crate::EdgeType;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Node list of an edge: two end nodes followed by interior nodes.
pub type EdgeNodes = SmallVec<[usize; 4]>;

/// A synthesized edge.
///
/// Edges come from the boundaries between face partitions and from beam
/// elements. Only exterior edges (`gid >= 0`) take part in edge neighbor
/// links.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// Interpolation type.
    pub edge_type: EdgeType,
    /// End nodes, then interior nodes.
    pub nodes: EdgeNodes,
    /// Edge partition (feature curve) id, or -1.
    pub gid: i32,
    /// Scratch tag.
    pub tag: i32,
    /// Neighboring edges at end node 0 and end node 1.
    pub nbr: [Option<usize>; 2],
    /// Whether the edge is a feature edge.
    pub exterior: bool,
    /// Owning beam element, if any.
    pub element: Option<usize>,
}

impl Edge {
    /// Create an edge from its nodes.
    ///
    /// The edge type follows the node count; anything other than 3 or 4
    /// nodes is treated as a two-node edge.
    #[must_use]
    pub fn new(nodes: &[usize]) -> Self {
        let edge_type = EdgeType::from_node_count(nodes.len()).unwrap_or(EdgeType::Edge2);
        Self {
            edge_type,
            nodes: nodes.iter().copied().take(edge_type.node_count()).collect(),
            gid: -1,
            tag: 0,
            nbr: [None; 2],
            exterior: false,
            element: None,
        }
    }

    /// First end node.
    #[inline]
    #[must_use]
    pub fn n0(&self) -> usize {
        self.nodes[0]
    }

    /// Second end node.
    #[inline]
    #[must_use]
    pub fn n1(&self) -> usize {
        self.nodes[1]
    }

    /// Returns `true` if `node` is one of the end nodes.
    #[inline]
    #[must_use]
    pub fn has_endpoint(&self, node: usize) -> bool {
        self.n0() == node || self.n1() == node
    }

    /// Returns the end slot (0 or 1) holding `node`.
    #[must_use]
    pub fn endpoint_slot(&self, node: usize) -> Option<usize> {
        if self.n0() == node {
            Some(0)
        } else if self.n1() == node {
            Some(1)
        } else {
            None
        }
    }

    /// Geometric equality: same type, same end nodes in either order, same
    /// interior node set.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        if self.edge_type != other.edge_type {
            return false;
        }
        let same_ends = (self.n0() == other.n0() && self.n1() == other.n1())
            || (self.n0() == other.n1() && self.n1() == other.n0());
        if !same_ends {
            return false;
        }
        let mine = &self.nodes[2..];
        let theirs = &other.nodes[2..];
        mine.iter().all(|n| theirs.contains(n))
    }
}

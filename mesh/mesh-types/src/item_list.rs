//! Named lists of mesh items and index remapping.
//!
//! Item lists reference nodes, edges, faces, or elements by index. After an
//! edit compacts an array, the matching [`IndexMap`] brings the list up to
//! date; entries whose item was removed are dropped.

use std::marker::PhantomData;

use crate::{FeMesh, ItemKind, MeshError, MeshResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Old-index to new-index mapping produced by compacting an array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMap {
    map: Vec<Option<usize>>,
}

impl IndexMap {
    /// Identity map over `len` items.
    #[must_use]
    pub fn identity(len: usize) -> Self {
        Self {
            map: (0..len).map(Some).collect(),
        }
    }

    /// Build the map that keeps every index whose flag is `true`, in order.
    #[must_use]
    pub fn from_keep(keep: &[bool]) -> Self {
        let mut next = 0;
        let map = keep
            .iter()
            .map(|&k| {
                k.then(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect();
        Self { map }
    }

    /// New index of `old`, or `None` if it was removed or is out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, old: usize) -> Option<usize> {
        self.map.get(old).copied().flatten()
    }

    /// Number of indices before compaction.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the map covers no indices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of indices that survive.
    #[must_use]
    pub fn kept_count(&self) -> usize {
        self.map.iter().flatten().count()
    }

    /// Number of removed indices.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.len() - self.kept_count()
    }

    /// Returns `true` if nothing was removed or moved.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.map.iter().enumerate().all(|(i, m)| *m == Some(i))
    }
}

/// Marker for the item kind an [`ItemList`] refers to.
pub trait ListKind {
    /// The referenced array.
    const KIND: ItemKind;
}

macro_rules! list_kind {
    ($(#[$doc:meta])* $name:ident => $kind:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name;

        impl ListKind for $name {
            const KIND: ItemKind = $kind;
        }
    };
}

list_kind!(
    /// Node list marker.
    NodeKind => ItemKind::Node
);
list_kind!(
    /// Edge list marker.
    EdgeKind => ItemKind::Edge
);
list_kind!(
    /// Face list marker.
    FaceKind => ItemKind::Face
);
list_kind!(
    /// Element list marker.
    ElementKind => ItemKind::Element
);

/// A named list of item indices.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct ItemList<K: ListKind> {
    /// Display name.
    pub name: String,
    /// Referenced indices.
    pub items: Vec<usize>,
    #[cfg_attr(feature = "serde", serde(skip))]
    kind: PhantomData<K>,
}

/// A named set of nodes.
pub type NodeSet = ItemList<NodeKind>;
/// A named set of edges.
pub type EdgeSet = ItemList<EdgeKind>;
/// A named set of faces.
pub type Surface = ItemList<FaceKind>;
/// A named set of elements.
pub type ElementSet = ItemList<ElementKind>;

impl<K: ListKind> ItemList<K> {
    /// Create a list.
    #[must_use]
    pub fn new(name: impl Into<String>, items: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            items,
            kind: PhantomData,
        }
    }

    /// The item kind this list refers to.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        K::KIND
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check every entry against the current array length.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidReference`] for the first out-of-range entry.
    pub fn validate(&self, mesh: &FeMesh) -> MeshResult<()> {
        let count = mesh.count(K::KIND);
        match self.items.iter().find(|&&i| i >= count) {
            Some(&index) => Err(MeshError::invalid(K::KIND, index, count)),
            None => Ok(()),
        }
    }

    /// Rewrite entries through `map`, dropping removed items.
    ///
    /// Returns the number of dropped entries.
    pub fn remap(&mut self, map: &IndexMap) -> usize {
        let before = self.items.len();
        self.items = self.items.iter().filter_map(|&i| map.get(i)).collect();
        before - self.items.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Point3;

    #[test]
    fn from_keep_is_dense() {
        let map = IndexMap::from_keep(&[true, false, true, true]);
        assert_eq!(map.get(0), Some(0));
        assert_eq!(map.get(1), None);
        assert_eq!(map.get(3), Some(2));
        assert_eq!(map.get(9), None);
        assert_eq!(map.removed_count(), 1);
        assert!(!map.is_identity());
        assert!(IndexMap::identity(3).is_identity());
    }

    #[test]
    fn remap_drops_removed_entries() {
        let mut set = NodeSet::new("fixed", vec![0, 1, 3]);
        let dropped = set.remap(&IndexMap::from_keep(&[true, false, true, true]));
        assert_eq!(dropped, 1);
        assert_eq!(set.items, vec![0, 2]);
    }

    #[test]
    fn validate_reports_first_bad_index() {
        let mut mesh = FeMesh::new();
        mesh.add_node(Point3::origin());
        mesh.add_node(Point3::new(1.0, 0.0, 0.0));

        assert!(NodeSet::new("ok", vec![0, 1]).validate(&mesh).is_ok());
        let err = NodeSet::new("stale", vec![1, 5]).validate(&mesh).unwrap_err();
        assert_eq!(err, MeshError::invalid(ItemKind::Node, 5, 2));

        let surf = Surface::new("top", vec![0]);
        assert_eq!(surf.kind(), ItemKind::Face);
        assert!(surf.validate(&mesh).is_err());
    }
}

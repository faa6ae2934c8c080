//! Traits shared by every mesh item.

use crate::{Edge, Element, Face, Node};

/// An item that carries a partition id (`gid`), where -1 means unassigned.
pub trait Partitioned {
    /// The partition id.
    fn gid(&self) -> i32;

    /// Overwrite the partition id.
    fn set_gid(&mut self, gid: i32);
}

/// An item that carries a scratch tag.
pub trait Tagged {
    /// The scratch tag.
    fn tag(&self) -> i32;

    /// Overwrite the scratch tag.
    fn set_tag(&mut self, tag: i32);
}

macro_rules! impl_item_traits {
    ($($ty:ty),*) => {
        $(
            impl Partitioned for $ty {
                #[inline]
                fn gid(&self) -> i32 {
                    self.gid
                }

                #[inline]
                fn set_gid(&mut self, gid: i32) {
                    self.gid = gid;
                }
            }

            impl Tagged for $ty {
                #[inline]
                fn tag(&self) -> i32 {
                    self.tag
                }

                #[inline]
                fn set_tag(&mut self, tag: i32) {
                    self.tag = tag;
                }
            }
        )*
    };
}

impl_item_traits!(Node, Edge, Face, Element);

/// Number of partitions: the largest id plus one, or 0 if nothing is assigned.
#[must_use]
pub fn count_partitions<T: Partitioned>(items: &[T]) -> usize {
    items
        .iter()
        .map(Partitioned::gid)
        .max()
        .and_then(|max| usize::try_from(max + 1).ok())
        .unwrap_or(0)
}

/// Renumber partition ids so the used ids become `0..N` in ascending order.
///
/// Unassigned ids (negative) are left alone. Returns the new partition count.
pub fn compact_partitions<T: Partitioned>(items: &mut [T]) -> usize {
    compact_ids(items, Partitioned::gid, Partitioned::set_gid)
}

/// Renumber an arbitrary id field the same way [`compact_partitions`] does.
///
/// Used for the smoothing ids of faces.
pub fn compact_ids<T>(
    items: &mut [T],
    get: impl Fn(&T) -> i32,
    set: impl Fn(&mut T, i32),
) -> usize {
    let Some(max) = items.iter().map(&get).max() else {
        return 0;
    };
    let Ok(len) = usize::try_from(max + 1) else {
        return 0;
    };
    if len == 0 {
        return 0;
    }

    let mut lookup: Vec<i32> = vec![-1; len];
    for item in items.iter() {
        if let Ok(id) = usize::try_from(get(item)) {
            lookup[id] = 0;
        }
    }
    let mut next = 0;
    for slot in &mut lookup {
        if *slot == 0 {
            *slot = next;
            next += 1;
        }
    }

    if usize::try_from(next).ok() != Some(len) {
        for item in items.iter_mut() {
            if let Ok(id) = usize::try_from(get(item)) {
                set(item, lookup[id]);
            }
        }
    }
    usize::try_from(next).unwrap_or(0)
}

/// Set the tag of every item.
pub fn tag_all<T: Tagged>(items: &mut [T], tag: i32) {
    for item in items {
        item.set_tag(tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes_with(gids: &[i32]) -> Vec<Node> {
        gids.iter()
            .map(|&g| {
                let mut n = Node::default();
                n.gid = g;
                n
            })
            .collect()
    }

    #[test]
    fn compact_closes_gaps() {
        let mut nodes = nodes_with(&[4, -1, 0, 4, 7]);
        assert_eq!(compact_partitions(&mut nodes), 3);
        let gids: Vec<i32> = nodes.iter().map(|n| n.gid).collect();
        assert_eq!(gids, vec![1, -1, 0, 1, 2]);
        assert_eq!(count_partitions(&nodes), 3);
    }

    #[test]
    fn compact_is_noop_when_unassigned() {
        let mut nodes = nodes_with(&[-1, -1]);
        assert_eq!(compact_partitions(&mut nodes), 0);
        assert_eq!(count_partitions(&nodes), 0);
        assert_eq!(count_partitions::<Node>(&[]), 0);
    }

    #[test]
    fn tag_all_sets_every_tag() {
        let mut nodes = nodes_with(&[0, 1]);
        tag_all(&mut nodes, 3);
        assert!(nodes.iter().all(|n| n.tag == 3));
    }
}

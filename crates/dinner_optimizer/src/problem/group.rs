use serde::Serialize;

use crate::define_index_newtype;

use super::location::LocationIdx;

define_index_newtype!(GroupIdx, Group);

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Group {
    name: String,
    location_id: LocationIdx,
    host_round: usize,
}

impl Group {
    pub(super) fn new(name: String, location_id: LocationIdx, host_round: usize) -> Self {
        Self {
            name,
            location_id,
            host_round,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location_id(&self) -> LocationIdx {
        self.location_id
    }

    /// Event index of the round this group hosts, in `[1, E-2]`.
    pub fn host_round(&self) -> usize {
        self.host_round
    }
}

/// Unordered pair of distinct groups, stored with `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupPair {
    first: GroupIdx,
    second: GroupIdx,
}

impl GroupPair {
    pub fn new(a: GroupIdx, b: GroupIdx) -> Self {
        debug_assert_ne!(a, b, "A group cannot be paired with itself");

        if a < b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> GroupIdx {
        self.first
    }

    pub fn second(&self) -> GroupIdx {
        self.second
    }

    pub fn contains(&self, group: GroupIdx) -> bool {
        self.first == group || self.second == group
    }

    /// Position of this pair in the row-major upper triangle of a
    /// `num_groups x num_groups` table.
    #[inline]
    pub fn index(&self, num_groups: usize) -> usize {
        let (i, j) = (self.first.get(), self.second.get());
        i * (2 * num_groups - i - 1) / 2 + (j - i - 1)
    }

    pub fn count(num_groups: usize) -> usize {
        num_groups * num_groups.saturating_sub(1) / 2
    }

    /// All pairs, in the order of [`GroupPair::index`].
    pub fn all(num_groups: usize) -> impl Iterator<Item = GroupPair> {
        (0..num_groups).flat_map(move |i| {
            ((i + 1)..num_groups).map(move |j| GroupPair {
                first: GroupIdx::new(i),
                second: GroupIdx::new(j),
            })
        })
    }
}

impl std::fmt::Display for GroupPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_ordered() {
        let pair = GroupPair::new(GroupIdx::new(4), GroupIdx::new(1));

        assert_eq!(pair.first(), GroupIdx::new(1));
        assert_eq!(pair.second(), GroupIdx::new(4));
        assert_eq!(pair, GroupPair::new(GroupIdx::new(1), GroupIdx::new(4)));
        assert!(pair.contains(GroupIdx::new(4)));
        assert!(!pair.contains(GroupIdx::new(2)));
    }

    #[test]
    fn test_index_matches_enumeration_order() {
        for num_groups in 0..9 {
            let pairs = GroupPair::all(num_groups).collect::<Vec<_>>();

            assert_eq!(pairs.len(), GroupPair::count(num_groups));
            for (expected, pair) in pairs.iter().enumerate() {
                assert_eq!(pair.index(num_groups), expected);
            }
        }
    }
}

use crate::{
    db::{
        direction::Direction,
        index::key::IndexKey,
    },
    model::index::IndexField,
};
use std::cmp;

///
/// Ordering
///
/// Per-field sort direction of an index key pattern, packed as a bitmask.
///
/// Bit `i` set means field `i` is descending. The mask drives both the
/// physical key encoding (descending components are byte-inverted) and the
/// logical index-order comparison, so the two always agree.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Ordering {
    descending: u32,
}

impl Ordering {
    #[must_use]
    pub fn new(fields: &[IndexField]) -> Self {
        let mut descending = 0u32;
        for (i, field) in fields.iter().enumerate() {
            if field.order.is_descending() {
                descending |= 1 << i;
            }
        }

        Self { descending }
    }

    /// Is field `i` of the key pattern descending?
    #[must_use]
    pub const fn descending(&self, i: usize) -> bool {
        self.descending & (1 << i) != 0
    }

    #[must_use]
    pub const fn first_field_descending(&self) -> bool {
        self.descending(0)
    }

    /// Compare two keys in index order.
    ///
    /// Index order is the order entries are laid out in the store, which
    /// honors per-field direction. The Min sentinel sorts first in a fully
    /// ascending index and last when the first field is descending; the raw
    /// encoding is built so byte order and index order coincide.
    #[must_use]
    pub fn compare(&self, a: &IndexKey, b: &IndexKey) -> cmp::Ordering {
        a.to_raw(self).cmp(&b.to_raw(self))
    }

    /// Should the default (Min=start, Max=end) bound assignment be flipped?
    ///
    /// Flipped exactly when one of index order and scan direction is
    /// non-default but not both: `ascending != forward`.
    #[must_use]
    pub const fn reverse_scan_bounds(&self, direction: Direction) -> bool {
        let ascending = !self.first_field_descending();
        let forward = !direction.is_reverse();

        ascending != forward
    }

    /// Sentinel start bound for a full scan of this index.
    #[must_use]
    pub const fn scan_start_key(&self, direction: Direction) -> IndexKey {
        if self.reverse_scan_bounds(direction) {
            IndexKey::MAX
        } else {
            IndexKey::MIN
        }
    }

    /// Sentinel end bound for a full scan of this index.
    #[must_use]
    pub const fn scan_end_key(&self, direction: Direction) -> IndexKey {
        if self.reverse_scan_bounds(direction) {
            IndexKey::MIN
        } else {
            IndexKey::MAX
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::index::IndexField;
    use proptest::prelude::*;

    const ASC: &[IndexField] = &[IndexField::asc("a"), IndexField::asc("b")];
    const DESC: &[IndexField] = &[IndexField::desc("a"), IndexField::asc("b")];

    #[test]
    fn mask_tracks_field_positions() {
        let ordering = Ordering::new(&[
            IndexField::asc("a"),
            IndexField::desc("b"),
            IndexField::asc("c"),
            IndexField::desc("d"),
        ]);
        assert!(!ordering.descending(0));
        assert!(ordering.descending(1));
        assert!(!ordering.descending(2));
        assert!(ordering.descending(3));
        assert!(!ordering.first_field_descending());
    }

    #[test]
    fn reverse_scan_bounds_truth_table() {
        let asc = Ordering::new(ASC);
        let desc = Ordering::new(DESC);

        assert!(!asc.reverse_scan_bounds(Direction::Forward));
        assert!(asc.reverse_scan_bounds(Direction::Reverse));
        assert!(desc.reverse_scan_bounds(Direction::Forward));
        assert!(!desc.reverse_scan_bounds(Direction::Reverse));
    }

    #[test]
    fn bounds_flip_together() {
        for ordering in [Ordering::new(ASC), Ordering::new(DESC)] {
            for direction in [Direction::Forward, Direction::Reverse] {
                let start = ordering.scan_start_key(direction);
                let end = ordering.scan_end_key(direction);

                // exactly one bound is Min and the other Max
                assert_ne!(start, end);
                assert!(start.is_sentinel() && end.is_sentinel());

                if ordering.reverse_scan_bounds(direction) {
                    assert_eq!(start, IndexKey::MAX);
                    assert_eq!(end, IndexKey::MIN);
                } else {
                    assert_eq!(start, IndexKey::MIN);
                    assert_eq!(end, IndexKey::MAX);
                }
            }
        }
    }

    #[test]
    fn flipping_direction_swaps_bounds() {
        for ordering in [Ordering::new(ASC), Ordering::new(DESC)] {
            assert_eq!(
                ordering.scan_start_key(Direction::Forward),
                ordering.scan_end_key(Direction::Reverse)
            );
            assert_eq!(
                ordering.scan_end_key(Direction::Forward),
                ordering.scan_start_key(Direction::Reverse)
            );
        }
    }

    #[test]
    fn flipping_first_field_order_swaps_bounds() {
        let asc = Ordering::new(ASC);
        let desc = Ordering::new(DESC);

        for direction in [Direction::Forward, Direction::Reverse] {
            assert_eq!(asc.scan_start_key(direction), desc.scan_end_key(direction));
            assert_eq!(asc.scan_end_key(direction), desc.scan_start_key(direction));
        }
    }

    proptest! {
        // signed direction hints collapse to their sign before bound
        // resolution, so any non-negative hint behaves like Forward and any
        // negative hint like Reverse
        #[test]
        fn bound_assignment_follows_the_xor(hint in any::<i64>(), first_desc in any::<bool>()) {
            let fields = if first_desc {
                [IndexField::desc("a")]
            } else {
                [IndexField::asc("a")]
            };
            let ordering = Ordering::new(&fields);
            let direction = Direction::from_int(hint);

            let forward = hint >= 0;
            let expect_flip = !first_desc != forward;

            prop_assert_eq!(ordering.reverse_scan_bounds(direction), expect_flip);

            let start = ordering.scan_start_key(direction);
            let end = ordering.scan_end_key(direction);
            if expect_flip {
                prop_assert_eq!(start, IndexKey::MAX);
                prop_assert_eq!(end, IndexKey::MIN);
            } else {
                prop_assert_eq!(start, IndexKey::MIN);
                prop_assert_eq!(end, IndexKey::MAX);
            }
        }
    }
}

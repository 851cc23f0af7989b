use crate::{
    db::{
        catalog::{IndexDetails, Namespace},
        cursor::{Cursor, KeyFieldsProjection, RowMatcher},
        direction::Direction,
        index::{
            key::{IndexKey, RawIndexKey},
            ordering::Ordering,
        },
        store::RawRow,
    },
    error::InternalError,
    key::Key,
    obs::{self, CursorKind, MetricsEvent},
};
use std::{collections::BTreeSet, rc::Rc};

///
/// IndexScanCursor
///
/// Walks one physical index between two bounds, end-inclusive by default,
/// in the requested direction. Bounds are resolved exactly once, at
/// construction; after that the cursor only steps.
///
/// The `check_end` position check runs on every step under tests or the
/// `strict-checks` feature and compiles out otherwise. A violation means
/// the scan left its bounds, which is corruption, so it is a fatal panic
/// rather than a recoverable error.
///

pub struct IndexScanCursor<'a> {
    namespace: &'a Namespace,
    index: &'a IndexDetails,
    ordering: Ordering,
    direction: Direction,
    end_key: IndexKey,
    end_inclusive: bool,
    iter: Box<dyn Iterator<Item = (RawIndexKey, RawRow)> + 'a>,
    curr: Option<(IndexKey, RawRow)>,
    n_scanned: u64,
    dups: BTreeSet<Key>,
    matcher: Option<Rc<dyn RowMatcher>>,
    key_fields_only: Option<Rc<KeyFieldsProjection>>,
}

impl<'a> IndexScanCursor<'a> {
    /// Full scan of an index: sentinel bounds resolved from the index
    /// ordering and the scan direction.
    pub fn new(
        namespace: &'a Namespace,
        index: &'a IndexDetails,
        direction: Direction,
        limit: Option<usize>,
    ) -> Result<Self, InternalError> {
        let ordering = *index.ordering();
        let start = ordering.scan_start_key(direction);
        let end = ordering.scan_end_key(direction);

        Self::with_bounds(namespace, index, start, end, true, direction, limit)
    }

    /// Scan between explicit bounds.
    pub fn with_bounds(
        namespace: &'a Namespace,
        index: &'a IndexDetails,
        start: IndexKey,
        end: IndexKey,
        end_inclusive: bool,
        direction: Direction,
        limit: Option<usize>,
    ) -> Result<Self, InternalError> {
        let ordering = *index.ordering();
        let iter = index.store().scan(
            start.to_raw(&ordering),
            end.to_raw(&ordering),
            end_inclusive,
            direction,
            limit,
        );

        obs::record(MetricsEvent::CursorOpen {
            kind: CursorKind::IndexScan,
        });

        let mut cursor = Self {
            namespace,
            index,
            ordering,
            direction,
            end_key: end,
            end_inclusive,
            iter,
            curr: None,
            n_scanned: 0,
            dups: BTreeSet::new(),
            matcher: None,
            key_fields_only: None,
        };
        cursor.step()?;

        Ok(cursor)
    }

    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        self.namespace
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// End bound this scan was opened with.
    #[must_use]
    pub const fn end_key(&self) -> IndexKey {
        self.end_key
    }

    #[must_use]
    pub const fn end_inclusive(&self) -> bool {
        self.end_inclusive
    }

    /// Keys-only projection attached to this cursor, if any.
    #[must_use]
    pub fn key_fields_only(&self) -> Option<&KeyFieldsProjection> {
        self.key_fields_only.as_deref()
    }

    /// Pull the next entry off the store iterator into `curr`.
    fn step(&mut self) -> Result<bool, InternalError> {
        match self.iter.next() {
            None => {
                self.curr = None;
                Ok(false)
            }
            Some((raw, row)) => {
                let key = IndexKey::try_from_raw(&raw, &self.ordering).map_err(|err| {
                    InternalError::index_corruption(format!(
                        "undecodable entry in {}: {err}",
                        self.index.model()
                    ))
                })?;

                self.n_scanned += 1;
                obs::record(MetricsEvent::RowsScanned { rows: 1 });

                self.curr = Some((key, row));
                self.check_end();

                Ok(true)
            }
        }
    }

    /// The current key must sit on the end-bound side the direction implies:
    /// the end key compares past it in index order, or equal with an
    /// inclusive end. Anything else means the scan escaped its bounds.
    #[cfg(any(test, feature = "strict-checks"))]
    fn check_end(&self) {
        let Some((curr_key, _)) = &self.curr else {
            return;
        };

        let sign: i8 = match self.ordering.compare(&self.end_key, curr_key) {
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => 0,
        };

        if (sign != 0 && sign != self.direction.sign()) || (sign == 0 && !self.end_inclusive) {
            panic!("index scan cursor has a bad curr_key/end_key combination");
        }
    }

    #[cfg(not(any(test, feature = "strict-checks")))]
    const fn check_end(&self) {}
}

impl Cursor for IndexScanCursor<'_> {
    fn ok(&self) -> bool {
        self.curr.is_some()
    }

    fn current(&self) -> Option<&RawRow> {
        self.curr.as_ref().map(|(_, row)| row)
    }

    fn advance(&mut self) -> Result<bool, InternalError> {
        if self.curr.is_none() {
            return Ok(false);
        }

        self.step()
    }

    fn curr_key(&self) -> Option<IndexKey> {
        self.curr.as_ref().map(|(key, _)| *key)
    }

    fn curr_pk(&self) -> Option<Key> {
        self.curr_key().and_then(|key| key.pk())
    }

    fn get_set_dup(&mut self, pk: Key) -> bool {
        if self.index.multi_key() {
            !self.dups.insert(pk)
        } else {
            false
        }
    }

    fn is_multi_key(&self) -> bool {
        self.index.multi_key()
    }

    fn modified_keys(&self) -> bool {
        self.index.multi_key()
    }

    fn n_scanned(&self) -> u64 {
        self.n_scanned
    }

    fn current_matches(&self) -> bool {
        match (&self.matcher, &self.curr) {
            (Some(matcher), Some((_, row))) => matcher.matches(row),
            _ => true,
        }
    }

    fn set_matcher(&mut self, matcher: Rc<dyn RowMatcher>) {
        self.matcher = Some(matcher);
    }

    fn set_key_fields_only(&mut self, projection: Rc<KeyFieldsProjection>) {
        self.key_fields_only = Some(projection);
    }

    fn set_tailable(&mut self) {}

    fn tailable(&self) -> bool {
        false
    }

    fn describe(&self) -> &'static str {
        "IndexScanCursor"
    }
}

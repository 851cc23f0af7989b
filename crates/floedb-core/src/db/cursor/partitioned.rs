use crate::{
    db::{
        catalog::{Catalog, Namespace},
        cursor::{BasicCursor, Cursor, DummyCursor, KeyFieldsProjection, RowMatcher},
        direction::Direction,
        index::key::IndexKey,
        store::RawRow,
    },
    error::InternalError,
    key::Key,
    obs::{self, CursorKind, MetricsEvent},
};
use std::rc::Rc;

///
/// PartitionedCursor
///
/// Walks the partitions of a partitioned namespace one at a time, owning
/// exactly one sub-cursor for the currently active partition. Forward
/// scans visit partitions in ascending number order, reverse scans in
/// descending order; empty partitions are skipped. Once the last partition
/// in traversal order is exhausted the cursor is exhausted for good.
///
/// Duplicate tracking, multi-key and modified-keys reporting, and scan
/// counting stay at their neutral values rather than delegating; the
/// partition boundary would make per-partition answers misleading.
/// Tailing across partitions is not supported: the setter is a no-op and
/// `tailable` is always false.
///

pub struct PartitionedCursor<'a> {
    namespace: &'a Namespace,
    catalog: &'a Catalog,
    direction: Direction,
    count: u32,
    partition: u32,
    sub: Box<dyn Cursor + 'a>,
    active: bool,
}

impl<'a> PartitionedCursor<'a> {
    pub fn new(
        namespace: &'a Namespace,
        catalog: &'a Catalog,
        direction: Direction,
    ) -> Result<Self, InternalError> {
        let Some(count) = namespace.partition_count() else {
            return Err(InternalError::cursor_invariant(format!(
                "namespace {} is not partitioned",
                namespace.name()
            )));
        };

        obs::record(MetricsEvent::CursorOpen {
            kind: CursorKind::Partitioned,
        });

        if count == 0 {
            return Ok(Self {
                namespace,
                catalog,
                direction,
                count,
                partition: 0,
                sub: Box::new(DummyCursor::new(direction)),
                active: false,
            });
        }

        let first = match direction {
            Direction::Forward => 0,
            Direction::Reverse => count - 1,
        };
        let sub = Self::open_partition(catalog, namespace, direction, first)?;

        let mut cursor = Self {
            namespace,
            catalog,
            direction,
            count,
            partition: first,
            sub,
            active: true,
        };
        if !cursor.sub.ok() {
            cursor.advance_to_next_partition()?;
        }

        Ok(cursor)
    }

    fn open_partition(
        catalog: &'a Catalog,
        namespace: &'a Namespace,
        direction: Direction,
        partition: u32,
    ) -> Result<Box<dyn Cursor + 'a>, InternalError> {
        let name = Catalog::partition_namespace(namespace.name(), partition);

        // an absent partition namespace degrades to a dummy sub-cursor,
        // which the traversal treats as empty
        BasicCursor::make(catalog.find(&name), catalog, direction)
    }

    const fn has_next_partition(&self) -> bool {
        match self.direction {
            Direction::Forward => self.partition + 1 < self.count,
            Direction::Reverse => self.partition > 0,
        }
    }

    /// Move to the next non-empty partition in traversal order, or go
    /// terminal when there is none.
    fn advance_to_next_partition(&mut self) -> Result<bool, InternalError> {
        while self.has_next_partition() {
            self.partition = match self.direction {
                Direction::Forward => self.partition + 1,
                Direction::Reverse => self.partition - 1,
            };
            self.sub =
                Self::open_partition(self.catalog, self.namespace, self.direction, self.partition)?;

            if self.sub.ok() {
                return Ok(true);
            }
        }

        self.active = false;
        Ok(false)
    }

    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        self.namespace
    }
}

impl std::fmt::Debug for PartitionedCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartitionedCursor")
            .field("namespace", &self.namespace.name())
            .field("direction", &self.direction)
            .field("count", &self.count)
            .field("partition", &self.partition)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Cursor for PartitionedCursor<'_> {
    fn ok(&self) -> bool {
        self.active && self.sub.ok()
    }

    fn current(&self) -> Option<&RawRow> {
        if self.active { self.sub.current() } else { None }
    }

    fn advance(&mut self) -> Result<bool, InternalError> {
        if !self.active {
            return Ok(false);
        }
        if self.sub.advance()? {
            return Ok(true);
        }

        self.advance_to_next_partition()
    }

    fn curr_key(&self) -> Option<IndexKey> {
        if self.active { self.sub.curr_key() } else { None }
    }

    fn curr_pk(&self) -> Option<Key> {
        if self.active { self.sub.curr_pk() } else { None }
    }

    fn get_set_dup(&mut self, _pk: Key) -> bool {
        false
    }

    fn is_multi_key(&self) -> bool {
        false
    }

    fn modified_keys(&self) -> bool {
        false
    }

    fn n_scanned(&self) -> u64 {
        0
    }

    fn set_matcher(&mut self, _matcher: Rc<dyn RowMatcher>) {}

    fn set_key_fields_only(&mut self, _projection: Rc<KeyFieldsProjection>) {}

    fn set_tailable(&mut self) {}

    fn tailable(&self) -> bool {
        false
    }

    fn describe(&self) -> &'static str {
        "PartitionedCursor"
    }
}

use crate::{
    db::{
        catalog::{Catalog, Namespace},
        cursor::{
            Cursor, DummyCursor, IndexScanCursor, KeyFieldsProjection, PartitionedCursor,
            RowMatcher,
        },
        direction::Direction,
        index::key::IndexKey,
        store::RawRow,
    },
    error::InternalError,
    key::Key,
};
use std::rc::Rc;

///
/// BasicCursor
///
/// Primary-key traversal of one namespace: an index scan over the
/// namespace's primary-key index with sentinel bounds.
///

pub struct BasicCursor<'a> {
    inner: IndexScanCursor<'a>,
}

impl<'a> BasicCursor<'a> {
    pub fn new(namespace: &'a Namespace, direction: Direction) -> Result<Self, InternalError> {
        let inner = IndexScanCursor::new(namespace, namespace.pk_index(), direction, None)?;

        Ok(Self { inner })
    }

    /// The one place cursor variants are chosen.
    ///
    /// An absent namespace gets a dummy cursor rather than an error, a
    /// partitioned namespace gets the partition-walking cursor, and
    /// everything else gets a primary-key scan.
    pub fn make(
        namespace: Option<&'a Namespace>,
        catalog: &'a Catalog,
        direction: Direction,
    ) -> Result<Box<dyn Cursor + 'a>, InternalError> {
        match namespace {
            None => Ok(Box::new(DummyCursor::new(direction))),
            Some(ns) if ns.partitioned() => {
                Ok(Box::new(PartitionedCursor::new(ns, catalog, direction)?))
            }
            Some(ns) => Ok(Box::new(Self::new(ns, direction)?)),
        }
    }
}

impl Cursor for BasicCursor<'_> {
    fn ok(&self) -> bool {
        self.inner.ok()
    }

    fn current(&self) -> Option<&RawRow> {
        self.inner.current()
    }

    fn advance(&mut self) -> Result<bool, InternalError> {
        self.inner.advance()
    }

    fn curr_key(&self) -> Option<IndexKey> {
        self.inner.curr_key()
    }

    fn curr_pk(&self) -> Option<Key> {
        self.inner.curr_pk()
    }

    fn get_set_dup(&mut self, pk: Key) -> bool {
        self.inner.get_set_dup(pk)
    }

    fn is_multi_key(&self) -> bool {
        self.inner.is_multi_key()
    }

    fn modified_keys(&self) -> bool {
        self.inner.modified_keys()
    }

    fn n_scanned(&self) -> u64 {
        self.inner.n_scanned()
    }

    fn current_matches(&self) -> bool {
        self.inner.current_matches()
    }

    fn set_matcher(&mut self, matcher: Rc<dyn RowMatcher>) {
        self.inner.set_matcher(matcher);
    }

    fn set_key_fields_only(&mut self, projection: Rc<KeyFieldsProjection>) {
        self.inner.set_key_fields_only(projection);
    }

    fn set_tailable(&mut self) {
        self.inner.set_tailable();
    }

    fn tailable(&self) -> bool {
        self.inner.tailable()
    }

    fn describe(&self) -> &'static str {
        "BasicCursor"
    }
}

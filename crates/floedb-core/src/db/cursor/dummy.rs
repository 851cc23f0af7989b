use crate::{
    db::{
        cursor::{Cursor, KeyFieldsProjection, RowMatcher},
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
/// DummyCursor
///
/// Null cursor for namespaces that do not exist: born exhausted, never
/// yields a row, never errors.
///

pub struct DummyCursor {
    direction: Direction,
}

impl DummyCursor {
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        obs::record(MetricsEvent::CursorOpen {
            kind: CursorKind::Dummy,
        });

        Self { direction }
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

impl Cursor for DummyCursor {
    fn ok(&self) -> bool {
        false
    }

    fn current(&self) -> Option<&RawRow> {
        None
    }

    fn advance(&mut self) -> Result<bool, InternalError> {
        Ok(false)
    }

    fn curr_key(&self) -> Option<IndexKey> {
        None
    }

    fn curr_pk(&self) -> Option<Key> {
        None
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
        "DummyCursor"
    }
}

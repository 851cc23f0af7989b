//! Module: cursor — the traversal surface over index stores.
//!
//! Responsibility: the `Cursor` capability trait and its closed variant set
//! (index scan, primary-key, partitioned, dummy). The variant is chosen once
//! by the factory; callers only ever see `dyn Cursor`.
//! Does not own: bound resolution (`db::index::ordering`) or storage
//! (`db::store`).

pub mod basic;
pub mod dummy;
pub mod partitioned;
pub mod scan;


pub use basic::BasicCursor;
pub use dummy::DummyCursor;
pub use partitioned::PartitionedCursor;
pub use scan::IndexScanCursor;

use crate::{
    db::{index::key::IndexKey, store::RawRow},
    error::InternalError,
    key::Key,
};
use std::rc::Rc;

///
/// RowMatcher
///
/// Post-scan row filter. Matching never affects cursor position; callers
/// check `current_matches` and advance past misses themselves.
///

pub trait RowMatcher {
    fn matches(&self, row: &RawRow) -> bool;
}

///
/// KeyFieldsProjection
///
/// Requests that results be served from index key fields only, without
/// materializing the full row.
///

#[derive(Clone, Debug)]
pub struct KeyFieldsProjection {
    pub fields: Vec<String>,
}

///
/// Cursor
///
/// A positioned traversal over rows. Exhaustion is a normal state
/// (`ok() == false`, `advance()` returns `Ok(false)`); errors are reserved
/// for corruption and invariant failures.
///

pub trait Cursor {
    /// Is the cursor positioned on a row?
    fn ok(&self) -> bool;

    /// Row at the current position.
    fn current(&self) -> Option<&RawRow>;

    /// Move to the next position. `Ok(false)` means exhausted.
    fn advance(&mut self) -> Result<bool, InternalError>;

    /// Index key at the current position.
    fn curr_key(&self) -> Option<IndexKey>;

    /// Primary key at the current position.
    fn curr_pk(&self) -> Option<Key>;

    /// Record the given primary key as seen; returns whether it was already
    /// seen. Only meaningful on multi-key indexes, false otherwise.
    fn get_set_dup(&mut self, pk: Key) -> bool;

    /// Can this cursor return the same row more than once?
    fn is_multi_key(&self) -> bool;

    /// Can in-flight writes move keys under this cursor?
    fn modified_keys(&self) -> bool;

    /// Rows scanned so far by this cursor.
    fn n_scanned(&self) -> u64;

    /// Does the current row pass the attached matcher? True when no matcher
    /// is attached.
    fn current_matches(&self) -> bool {
        true
    }

    fn set_matcher(&mut self, matcher: Rc<dyn RowMatcher>);

    fn set_key_fields_only(&mut self, projection: Rc<KeyFieldsProjection>);

    /// Request tailable behavior. Cursors that cannot tail ignore this.
    fn set_tailable(&mut self);

    fn tailable(&self) -> bool;

    /// Human-readable cursor kind, for diagnostics.
    fn describe(&self) -> &'static str;
}

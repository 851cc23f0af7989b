//! Module: store — stable-memory ordered index store.
//!
//! Responsibility: the raw key/row map and its bounded directional scan
//! primitive. Keys arrive already ordering-adjusted, so the store only ever
//! compares bytes.
//! Does not own: key semantics, bound resolution, or cursor state.

use crate::{
    db::{direction::Direction, index::key::RawIndexKey},
    error::InternalError,
    serialize,
};
use canic_cdk::structures::{
    BTreeMap, DefaultMemoryImpl,
    memory::VirtualMemory,
    storable::{Bound, Storable},
};
use derive_more::{Deref, DerefMut};
use serde::{Serialize, de::DeserializeOwned};
use std::borrow::Cow;
use thiserror::Error as ThisError;

/// Maximum serialized row payload.
pub const MAX_ROW_BYTES: u32 = 4 * 1024 * 1024;

///
/// StoreError
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("row is {len} bytes, limit is {max_bytes} bytes")]
    RowTooLarge { len: usize, max_bytes: u32 },
}

impl From<StoreError> for InternalError {
    fn from(err: StoreError) -> Self {
        Self::store_unsupported(err.to_string())
    }
}

///
/// RawRow
///
/// Size-bounded serialized row document.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawRow(Vec<u8>);

impl RawRow {
    pub fn try_new(bytes: Vec<u8>) -> Result<Self, StoreError> {
        if bytes.len() > MAX_ROW_BYTES as usize {
            return Err(StoreError::RowTooLarge {
                len: bytes.len(),
                max_bytes: MAX_ROW_BYTES,
            });
        }

        Ok(Self(bytes))
    }

    /// Serialize a document into a bounded row payload.
    pub fn try_encode<T>(value: &T) -> Result<Self, InternalError>
    where
        T: Serialize,
    {
        let bytes = serialize::serialize(value)?;

        Ok(Self::try_new(bytes)?)
    }

    /// Deserialize the payload back into a document.
    pub fn try_decode<T>(&self) -> Result<T, InternalError>
    where
        T: DeserializeOwned,
    {
        Ok(serialize::deserialize(&self.0)?)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Storable for RawRow {
    fn to_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.0)
    }

    fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    fn from_bytes(bytes: Cow<'_, [u8]>) -> Self {
        Self(bytes.into_owned())
    }

    const BOUND: Bound = Bound::Bounded {
        max_size: MAX_ROW_BYTES,
        is_fixed_size: false,
    };
}

///
/// IndexStore
///
/// One physical index: an ordered map from raw index keys to rows, backed
/// by a dedicated stable-memory region. Every index is clustered, so the
/// row payload is always available at the cursor position.
///

#[derive(Deref, DerefMut)]
pub struct IndexStore(BTreeMap<RawIndexKey, RawRow, VirtualMemory<DefaultMemoryImpl>>);

impl IndexStore {
    #[must_use]
    pub fn init(memory: VirtualMemory<DefaultMemoryImpl>) -> Self {
        Self(BTreeMap::init(memory))
    }

    /// Bounded directional iteration between two raw bounds.
    ///
    /// The bounds may arrive in either byte order; the scan normalizes them
    /// and walks the range in the requested direction. `end_inclusive`
    /// controls whether the final key in traversal order is yielded.
    pub fn scan(
        &self,
        start: RawIndexKey,
        end: RawIndexKey,
        end_inclusive: bool,
        direction: Direction,
        limit: Option<usize>,
    ) -> Box<dyn Iterator<Item = (RawIndexKey, RawRow)> + '_> {
        use std::ops::Bound::{Excluded, Included};

        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };

        // the traversal-order end is hi on a forward walk and lo on a
        // reverse walk
        let range = match (direction, end_inclusive) {
            (_, true) => (Included(lo), Included(hi)),
            (Direction::Forward, false) => (Included(lo), Excluded(hi)),
            (Direction::Reverse, false) => (Excluded(lo), Included(hi)),
        };

        let entries = self.0.range(range).map(|entry| (*entry.key(), entry.value()));
        let iter: Box<dyn Iterator<Item = (RawIndexKey, RawRow)> + '_> = match direction {
            Direction::Forward => Box::new(entries),
            Direction::Reverse => Box::new(entries.rev()),
        };

        match limit {
            Some(n) => Box::new(iter.take(n)),
            None => iter,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::index::{key::IndexKey, ordering::Ordering},
        key::Key,
        model::index::IndexField,
    };
    use canic_cdk::structures::{
        DefaultMemoryImpl,
        memory::{MemoryId, MemoryManager},
    };

    fn test_memory(id: u8) -> VirtualMemory<DefaultMemoryImpl> {
        let manager = MemoryManager::init(DefaultMemoryImpl::default());
        manager.get(MemoryId::new(id))
    }

    fn store_with_pks(pks: &[u64]) -> (IndexStore, Ordering) {
        let ordering = Ordering::new(&[IndexField::asc("id")]);
        let mut store = IndexStore::init(test_memory(0));
        for pk in pks {
            let key = IndexKey::for_primary(Key::Uint(*pk));
            let row = RawRow::try_new(pk.to_be_bytes().to_vec()).unwrap();
            store.insert(key.to_raw(&ordering), row);
        }

        (store, ordering)
    }

    fn scanned_pks(
        store: &IndexStore,
        ordering: &Ordering,
        direction: Direction,
        limit: Option<usize>,
    ) -> Vec<u64> {
        let start = ordering.scan_start_key(direction).to_raw(ordering);
        let end = ordering.scan_end_key(direction).to_raw(ordering);

        store
            .scan(start, end, true, direction, limit)
            .map(|(raw, _)| {
                let key = IndexKey::try_from_raw(&raw, ordering).unwrap();
                match key.pk().unwrap() {
                    Key::Uint(v) => v,
                    other => panic!("unexpected key {other}"),
                }
            })
            .collect()
    }

    #[test]
    fn forward_scan_walks_ascending() {
        let (store, ordering) = store_with_pks(&[5, 1, 3]);
        assert_eq!(scanned_pks(&store, &ordering, Direction::Forward, None), [1, 3, 5]);
    }

    #[test]
    fn reverse_scan_walks_descending() {
        let (store, ordering) = store_with_pks(&[5, 1, 3]);
        assert_eq!(scanned_pks(&store, &ordering, Direction::Reverse, None), [5, 3, 1]);
    }

    #[test]
    fn limit_caps_the_walk() {
        let (store, ordering) = store_with_pks(&[1, 2, 3, 4]);
        assert_eq!(
            scanned_pks(&store, &ordering, Direction::Reverse, Some(2)),
            [4, 3]
        );
    }

    #[test]
    fn exclusive_end_drops_the_last_key_in_traversal_order() {
        let (store, ordering) = store_with_pks(&[1, 2, 3]);
        let lo = IndexKey::for_primary(Key::Uint(1)).to_raw(&ordering);
        let hi = IndexKey::for_primary(Key::Uint(3)).to_raw(&ordering);

        let forward: Vec<_> = store
            .scan(lo, hi, false, Direction::Forward, None)
            .map(|(raw, _)| raw)
            .collect();
        assert_eq!(forward, [lo, IndexKey::for_primary(Key::Uint(2)).to_raw(&ordering)]);

        let reverse: Vec<_> = store
            .scan(hi, lo, false, Direction::Reverse, None)
            .map(|(raw, _)| raw)
            .collect();
        assert_eq!(reverse, [hi, IndexKey::for_primary(Key::Uint(2)).to_raw(&ordering)]);
    }

    #[test]
    fn raw_row_enforces_the_size_limit() {
        let err = RawRow::try_new(vec![0u8; MAX_ROW_BYTES as usize + 1]).unwrap_err();
        assert!(matches!(err, StoreError::RowTooLarge { .. }));
        assert!(RawRow::try_new(vec![0u8; 16]).is_ok());
    }
}

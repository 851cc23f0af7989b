//! Module: index — ordering-aware index keys and scan-bound resolution.
//!
//! Responsibility: the `IndexKey` value space (Min/Max sentinels plus entry
//! keys), its canonical raw codec, and the `Ordering` comparator that turns a
//! key pattern into index-order comparison and scan bounds.
//! Does not own: the physical store (see `db::store`).

pub mod key;
pub mod ordering;

pub use key::{IndexEntryKey, IndexKey, IndexKeyCorruption, RawIndexKey};
pub use ordering::Ordering;

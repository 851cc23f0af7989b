//! Module: db — the storage engine proper.
//!
//! Responsibility: direction semantics, ordering-aware index keys, the
//! stable-memory index store, the namespace catalog, and the cursor layer.

pub mod catalog;
pub mod cursor;
pub mod direction;
pub mod index;
pub mod store;

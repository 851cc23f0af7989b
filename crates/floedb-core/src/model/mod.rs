//! Module: model — static descriptors for indexes.
//!
//! Responsibility: compile-time index shape declarations.
//! Does not own: runtime namespace state (see `db::catalog`).

pub mod index;

pub use index::{IndexField, IndexModel, SortOrder};

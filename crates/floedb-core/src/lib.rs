//! Core storage runtime for FloeDB: primary keys, index ordering, scan-bound
//! resolution, and the cursor layer over stable ordered-index stores.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod db;
pub mod error;
pub mod key;
pub mod model;
pub mod obs;
pub mod serialize;

///
/// CONSTANTS
///

/// Maximum number of indexed fields allowed on an index key pattern.
///
/// This limit keeps encoded index keys within bounded, storable sizes and
/// keeps the per-field ordering mask trivially small.
pub const MAX_INDEX_FIELDS: usize = 4;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, cursors, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::direction::Direction,
        key::Key,
        model::index::{IndexField, IndexModel, SortOrder},
    };
}

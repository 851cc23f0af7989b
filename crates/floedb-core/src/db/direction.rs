use serde::{Deserialize, Serialize};

///
/// Direction
///
/// Requested traversal direction for a scan.
///
/// Callers that carry a signed hint (e.g. a query option) collapse it to
/// sign only: any negative value is `Reverse`, everything else `Forward`.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    /// Collapse a signed direction hint to its sign.
    #[must_use]
    pub const fn from_int(d: i64) -> Self {
        if d < 0 { Self::Reverse } else { Self::Forward }
    }

    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::Reverse)
    }

    /// Sign of the direction: +1 forward, -1 reverse.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }
}

///
/// TESTS
///

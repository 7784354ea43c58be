//! Customer identifier.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Database identifier of a persisted customer.
///
/// A customer that has not been created yet has no `CustomerId`; code that
/// handles both cases uses `Option<CustomerId>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
#[serde(transparent)]
pub struct CustomerId(i32);

impl CustomerId {
    /// Create a new ID from an i32 value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for CustomerId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<CustomerId> for i32 {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

impl FromStr for CustomerId {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

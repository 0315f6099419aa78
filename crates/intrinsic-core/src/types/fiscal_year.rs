//! Fiscal year key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fiscal year identifying a reporting period.
///
/// # Example
///
/// ```rust
/// use intrinsic_core::types::FiscalYear;
///
/// let fy = FiscalYear::new(2024);
/// assert_eq!(fy.to_string(), "FY2024");
/// assert_eq!(fy.next(), FiscalYear::new(2025));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiscalYear(i32);

impl FiscalYear {
    /// Creates a fiscal year.
    #[must_use]
    pub const fn new(year: i32) -> Self {
        Self(year)
    }

    /// Returns the calendar year number.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.0
    }

    /// Returns the following fiscal year.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Number of years from `earlier` to `self` (negative if `earlier` is later).
    #[must_use]
    pub const fn years_since(self, earlier: Self) -> i32 {
        self.0 - earlier.0
    }
}

impl From<i32> for FiscalYear {
    fn from(year: i32) -> Self {
        Self(year)
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FY{}", self.0)
    }
}

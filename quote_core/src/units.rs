//! # Unit Types
//!
//! Lightweight newtype wrappers for the quantities a quote deals with. They
//! serialize as plain numbers so JSON stays clean.
//!
//! - Area: square feet (sqft)
//! - Length: linear feet (ft)
//! - Money: dollars in the quote's currency
//!
//! ## Example
//!
//! ```rust
//! use quote_core::units::SqFt;
//!
//! let floor = SqFt(100.0);
//! assert_eq!(floor.square_room_perimeter().0, 40.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub f64);

/// Length in linear feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinearFt(pub f64);

/// Amount of money in the quote's currency
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dollars(pub f64);

impl SqFt {
    /// Area usable by the calculators: non-finite and negative values become zero.
    pub fn sanitized(self) -> SqFt {
        SqFt(non_negative(self.0))
    }

    /// Perimeter of a square room with this floor area, `4 × sqrt(area)`.
    ///
    /// Real room geometry is never collected, so this is a rough proxy
    /// used for trim and baseboard estimates.
    pub fn square_room_perimeter(self) -> LinearFt {
        LinearFt(4.0 * self.sanitized().0.sqrt())
    }

    /// Edge length to caulk around a backsplash, `2 × 2 × sqrt(area)`.
    pub fn backsplash_perimeter(self) -> LinearFt {
        LinearFt(2.0 * 2.0 * self.sanitized().0.sqrt())
    }

    /// Area with a waste buffer applied (e.g. `1.10` for 10%).
    pub fn with_waste(self, factor: f64) -> SqFt {
        SqFt(self.sanitized().0 * factor)
    }
}

impl Dollars {
    /// Money value clamped to be finite and non-negative.
    pub fn non_negative(self) -> Dollars {
        Dollars(non_negative(self.0))
    }
}

impl Add for Dollars {
    type Output = Dollars;
    fn add(self, rhs: Dollars) -> Dollars {
        Dollars(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Dollars {
    fn sum<I: Iterator<Item = Dollars>>(iter: I) -> Dollars {
        iter.fold(Dollars(0.0), |acc, d| acc + d)
    }
}

/// Rate per square foot times an area
impl Mul<SqFt> for Dollars {
    type Output = Dollars;
    fn mul(self, rhs: SqFt) -> Dollars {
        Dollars(self.0 * rhs.0)
    }
}

impl std::fmt::Display for Dollars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl std::fmt::Display for SqFt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} sqft", self.0)
    }
}

/// Round up to whole units; non-finite and non-positive values give 0.
///
/// This is a plain `ceil` on the computed value, so float residue counts:
/// `100.0 * 1.10` is `110.00000000000001` and rounds up to 111.
pub fn ceil_units(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    value.ceil()
}

/// Clamp a raw number to a finite, non-negative value.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

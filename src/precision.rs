//! Decimal precision of encoded polylines.

use crate::error::PolylineError;

/// Number of decimal digits kept by the polyline codec.
///
/// Coordinates are scaled by `10^digits` and rounded to integers before they
/// are delta encoded. General-purpose polyline formats use 5 digits; the
/// routing service encodes its shapes with 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Precision(u32);

impl Precision {
    /// Largest supported exponent. Beyond this, scaled longitudes exceed the
    /// exact integer range of an `f64`.
    pub const MAX: u32 = 15;

    /// Five digits, as used by the classic polyline format.
    pub const FIVE: Precision = Precision(5);

    /// Six digits, the routing service's default.
    pub const SIX: Precision = Precision(6);

    pub fn new(digits: u32) -> Result<Self, PolylineError> {
        if digits > Self::MAX {
            return Err(PolylineError::InvalidPrecision(i64::from(digits)));
        }
        Ok(Self(digits))
    }

    pub fn digits(self) -> u32 {
        self.0
    }

    /// The fixed-point scale factor, `10^digits`.
    pub fn factor(self) -> f64 {
        // Exact for every supported exponent.
        10f64.powi(self.0 as i32)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::SIX
    }
}

impl TryFrom<i64> for Precision {
    type Error = PolylineError;

    fn try_from(digits: i64) -> Result<Self, Self::Error> {
        u32::try_from(digits)
            .map_err(|_| PolylineError::InvalidPrecision(digits))
            .and_then(Self::new)
    }
}

impl TryFrom<i32> for Precision {
    type Error = PolylineError;

    fn try_from(digits: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(digits))
    }
}

impl TryFrom<u32> for Precision {
    type Error = PolylineError;

    fn try_from(digits: u32) -> Result<Self, Self::Error> {
        Self::new(digits)
    }
}

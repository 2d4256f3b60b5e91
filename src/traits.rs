//! Shared behavior of values that carry an encoded shape.

use crate::error::PolylineError;
use crate::polyline::{self, Coordinate, LineGeometry};
use crate::precision::Precision;

/// Anything holding a geometry as an encoded polyline string.
///
/// Implementors only expose the raw string; decoding is provided.
pub trait EncodedShape {
    fn encoded_shape(&self) -> &str;

    /// Decoded `[longitude, latitude]` coordinates.
    fn coordinates(&self, precision: Precision) -> Result<Vec<Coordinate>, PolylineError> {
        polyline::decode(self.encoded_shape(), precision)
    }

    fn line_geometry(&self, precision: Precision) -> Result<LineGeometry, PolylineError> {
        polyline::to_line_geometry(self.encoded_shape(), precision)
    }
}

impl EncodedShape for str {
    fn encoded_shape(&self) -> &str {
        self
    }
}

impl EncodedShape for String {
    fn encoded_shape(&self) -> &str {
        self
    }
}

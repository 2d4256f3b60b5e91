//! Encoded shapes with known decodings.

/// A short Berlin street segment as returned by the routing service, six digits.
pub const BERLIN_SHAPE: &str = "adi`cBk|inXhXjL`QnHpMfFjm@hV";

pub const BERLIN_COORDINATES: [[f64; 2]; 5] = [
    [13.35855, 52.450385],
    [13.358336, 52.44998],
    [13.358184, 52.449691],
    [13.358068, 52.449458],
    [13.357695, 52.448716],
];

/// The classic five-digit polyline example.
pub const CLASSIC_SHAPE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

pub const CLASSIC_COORDINATES: [[f64; 2]; 3] =
    [[-120.2, 38.5], [-120.95, 40.7], [-126.453, 43.252]];

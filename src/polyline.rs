//! Encoded polyline codec for route geometries.
//!
//! The routing service returns every leg shape as a compact printable string.
//! Each coordinate is scaled by the precision factor, delta encoded against
//! the previous one, zig-zag mapped to an unsigned value and written as
//! 5-bit groups (least significant first) offset by 63. Latitude is written
//! before longitude; decoded coordinates are ordered `[longitude, latitude]`.

use serde::{Deserialize, Serialize};

use crate::error::{MalformedReason, PolylineError};
use crate::precision::Precision;

const OFFSET: u8 = 63;
const MAX_BYTE: u8 = 126;
const CHUNK_MASK: u64 = 0x1f;
const CONTINUATION: u64 = 0x20;

/// Largest scaled magnitude that survives the `f64` -> `i64` -> `f64` trip.
const MAX_SCALED: f64 = 9_007_199_254_740_992.0;

/// A `(longitude, latitude)` position in decimal degrees.
///
/// Serializes as a `[longitude, latitude]` array, like a GeoJSON position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    /// Creates a coordinate from longitude and latitude.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Longitude, the geometry's x axis.
    pub fn x(&self) -> f64 {
        self.lon
    }

    /// Latitude, the geometry's y axis.
    pub fn y(&self) -> f64 {
        self.lat
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coordinate: Coordinate) -> Self {
        [coordinate.lon, coordinate.lat]
    }
}

impl From<Coordinate> for geo::Coord<f64> {
    fn from(coordinate: Coordinate) -> Self {
        geo::Coord {
            x: coordinate.lon,
            y: coordinate.lat,
        }
    }
}

impl From<geo::Coord<f64>> for Coordinate {
    fn from(coord: geo::Coord<f64>) -> Self {
        Self {
            lon: coord.x,
            lat: coord.y,
        }
    }
}

/// A decoded shape wrapped as a `LineString` geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "LineString")]
pub struct LineGeometry {
    pub coordinates: Vec<Coordinate>,
}

impl LineGeometry {
    /// Wraps coordinates as a `LineString`.
    pub fn new(coordinates: Vec<Coordinate>) -> Self {
        Self { coordinates }
    }
}

impl From<LineGeometry> for geo::LineString<f64> {
    fn from(geometry: LineGeometry) -> Self {
        geo::LineString::new(geometry.coordinates.into_iter().map(Into::into).collect())
    }
}

/// A route geometry held as decoded coordinates.
///
/// Encoding and decoding happen at the service boundary; everything in
/// between works on the coordinate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    coordinates: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a polyline from decoded coordinates.
    pub fn new(coordinates: Vec<Coordinate>) -> Self {
        Self { coordinates }
    }

    /// Decodes an encoded shape string.
    pub fn decode(text: &str, precision: Precision) -> Result<Self, PolylineError> {
        decode(text, precision).map(Self::new)
    }

    /// Encodes the coordinates back into a shape string.
    pub fn encode(&self, precision: Precision) -> Result<String, PolylineError> {
        encode(&self.coordinates, precision)
    }

    /// Returns a reference to the coordinates.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Consumes the polyline and returns the owned coordinates.
    pub fn into_coordinates(self) -> Vec<Coordinate> {
        self.coordinates
    }

    /// Number of coordinates.
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Returns true when the polyline has no coordinates.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Consumes the polyline and wraps it as a `LineString`.
    pub fn into_line_geometry(self) -> LineGeometry {
        LineGeometry::new(self.coordinates)
    }
}

/// Decodes an encoded polyline into `[longitude, latitude]` coordinates.
///
/// The whole string must be consumed as pairs of values; a truncated value,
/// a dangling latitude without its longitude, or a byte outside `63..=126`
/// fails with [`PolylineError::MalformedInput`] and no partial result.
pub fn decode(text: &str, precision: Precision) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = text.as_bytes();
    let factor = precision.factor();
    let mut coordinates = Vec::new();
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut cursor = 0;

    while cursor < bytes.len() {
        let (d_lat, lng_start) = read_value(bytes, cursor)?;
        let (d_lng, next) = read_value(bytes, lng_start)?;

        lat = lat
            .checked_add(d_lat)
            .ok_or_else(|| malformed(cursor, MalformedReason::Overflow))?;
        lng = lng
            .checked_add(d_lng)
            .ok_or_else(|| malformed(lng_start, MalformedReason::Overflow))?;

        coordinates.push(Coordinate::new(lng as f64 / factor, lat as f64 / factor));
        cursor = next;
    }

    Ok(coordinates)
}

/// Encodes coordinates into a polyline string.
///
/// Each component is rounded to the nearest `1 / 10^precision`. Non-finite
/// components fail with [`PolylineError::InvalidCoordinate`].
pub fn encode(coordinates: &[Coordinate], precision: Precision) -> Result<String, PolylineError> {
    let factor = precision.factor();
    let mut out = String::with_capacity(coordinates.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for (index, coordinate) in coordinates.iter().enumerate() {
        let lat = scale(coordinate.lat, factor, index)?;
        let lng = scale(coordinate.lon, factor, index)?;

        write_value(lat - prev_lat, &mut out);
        write_value(lng - prev_lng, &mut out);

        prev_lat = lat;
        prev_lng = lng;
    }

    Ok(out)
}

/// Decodes an encoded polyline and wraps it as a `LineString`.
pub fn to_line_geometry(text: &str, precision: Precision) -> Result<LineGeometry, PolylineError> {
    decode(text, precision).map(LineGeometry::new)
}

/// Reads one zig-zag varint starting at `start`.
///
/// Returns the signed value and the index just past its terminal byte.
fn read_value(bytes: &[u8], start: usize) -> Result<(i64, usize), PolylineError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;
    let mut cursor = start;

    loop {
        let Some(&byte) = bytes.get(cursor) else {
            return Err(malformed(cursor, MalformedReason::UnexpectedEnd));
        };
        if !(OFFSET..=MAX_BYTE).contains(&byte) {
            return Err(malformed(cursor, MalformedReason::InvalidByte(byte)));
        }

        let chunk = u64::from(byte - OFFSET);
        let bits = chunk & CHUNK_MASK;
        if shift >= u64::BITS || (bits << shift) >> shift != bits {
            return Err(malformed(start, MalformedReason::Overflow));
        }

        result |= bits << shift;
        shift += 5;
        cursor += 1;

        if chunk & CONTINUATION == 0 {
            return Ok((unzigzag(result), cursor));
        }
    }
}

fn write_value(value: i64, out: &mut String) {
    let mut remaining = ((value << 1) ^ (value >> 63)) as u64;
    while remaining >= CONTINUATION {
        out.push(to_char(CONTINUATION | (remaining & CHUNK_MASK)));
        remaining >>= 5;
    }
    out.push(to_char(remaining));
}

fn unzigzag(value: u64) -> i64 {
    let half = (value >> 1) as i64;
    if value & 1 == 1 { !half } else { half }
}

fn to_char(chunk: u64) -> char {
    // chunk is at most 0x3f, so the offset byte stays within 63..=126.
    char::from(chunk as u8 + OFFSET)
}

fn scale(value: f64, factor: f64, index: usize) -> Result<i64, PolylineError> {
    let scaled = (value * factor).round();
    if !scaled.is_finite() || scaled.abs() > MAX_SCALED {
        return Err(PolylineError::InvalidCoordinate { index });
    }
    Ok(scaled as i64)
}

fn malformed(position: usize, reason: MalformedReason) -> PolylineError {
    PolylineError::MalformedInput { position, reason }
}

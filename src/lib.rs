//! valhalla-client
//!
//! Encoded polyline codec and a blocking client for the Valhalla routing service.

pub mod error;
pub mod precision;
pub mod polyline;
pub mod traits;
pub mod types;
pub mod valhalla;

pub use error::{MalformedReason, PolylineError, ValhallaError};
pub use polyline::{Coordinate, LineGeometry, Polyline, decode, encode, to_line_geometry};
pub use precision::Precision;
pub use traits::EncodedShape;
pub use valhalla::{RequestOptions, ValhallaClient, ValhallaConfig};

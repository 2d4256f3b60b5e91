//! Error types for the polyline codec and the HTTP client.

use std::fmt;

use thiserror::Error;

use crate::types::ErrorResponse;

/// Why an encoded polyline could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// Input ended inside a value, or between the two values of a coordinate.
    UnexpectedEnd,
    /// A byte outside the printable range `63..=126`.
    InvalidByte(u8),
    /// A value or running total does not fit in 64 bits.
    Overflow,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::UnexpectedEnd => f.write_str("unexpected end of input"),
            MalformedReason::InvalidByte(byte) => write!(f, "invalid byte {byte:#04x}"),
            MalformedReason::Overflow => f.write_str("value overflows 64 bits"),
        }
    }
}

/// Errors returned by the polyline codec.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PolylineError {
    /// The encoded string is truncated or contains invalid data.
    #[error("failed to decode polyline geometry at byte {position}: {reason}")]
    MalformedInput {
        position: usize,
        reason: MalformedReason,
    },
    /// Precision is negative or too large to be represented exactly.
    #[error("polyline precision {0} is outside the supported range 0..=15")]
    InvalidPrecision(i64),
    /// A coordinate is not finite or cannot be scaled at the given precision.
    #[error("coordinate {index} cannot be encoded as a polyline")]
    InvalidCoordinate { index: usize },
}

/// Errors returned by [`ValhallaClient`](crate::valhalla::ValhallaClient).
#[derive(Debug, Error)]
pub enum ValhallaError {
    /// The request could not be sent or the response could not be read.
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("valhalla request failed with {status} {status_text}")]
    Request {
        status: u16,
        status_text: String,
        body: Option<serde_json::Value>,
    },
    /// A successful response did not carry a JSON body.
    #[error("unsupported response content type {0:?}")]
    UnsupportedContentType(Option<String>),
    /// The response body did not match the expected shape.
    #[error("failed to parse response body: {0}")]
    Json(#[from] serde_json::Error),
    /// A route shape in an otherwise successful response failed to decode.
    #[error("route geometry: {0}")]
    Geometry(#[from] PolylineError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

impl ValhallaError {
    /// HTTP status of a failed request, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ValhallaError::Request { status, .. } => Some(*status),
            ValhallaError::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// The service's structured error body for a failed request.
    pub fn error_response(&self) -> Option<ErrorResponse> {
        match self {
            ValhallaError::Request {
                body: Some(body), ..
            } => serde_json::from_value(body.clone()).ok(),
            _ => None,
        }
    }
}

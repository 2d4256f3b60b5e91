//! Test fixtures for valhalla-client.
//!
//! Provides:
//! - Encoded shapes with their known decodings
//! - Canned service responses for the HTTP client tests

// Each test binary compiles this module but only uses part of it.
#![allow(dead_code)]

pub mod responses;
pub mod shapes;

pub use shapes::*;

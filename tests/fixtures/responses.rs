//! Canned service responses.

use serde_json::{Value, json};

pub fn summary() -> Value {
    json!({
        "has_time_restrictions": false,
        "min_lat": 1.0,
        "min_lon": 1.0,
        "max_lat": 2.0,
        "max_lon": 2.0,
        "time": 1337.0,
        "length": 1337.0,
        "cost": 10.0
    })
}

/// A trip with one leg per shape.
pub fn trip_response(shapes: &[&str]) -> Value {
    let legs = shapes
        .iter()
        .map(|shape| json!({ "shape": shape, "summary": summary() }))
        .collect::<Vec<_>>();

    json!({
        "trip": {
            "locations": [
                { "lat": 1.0, "lon": 1.0, "type": "break", "original_index": 0 },
                { "lat": 2.0, "lon": 2.0, "type": "break", "original_index": 1 }
            ],
            "legs": legs,
            "summary": summary(),
            "status_message": "Found route between points",
            "status": 0,
            "units": "kilometers",
            "language": "en-US"
        }
    })
}

pub fn isochrone_response() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[1.57, 42.53], [1.58, 42.54], [1.57, 42.53]]
                },
                "properties": {
                    "contour": 10,
                    "metric": "time",
                    "color": "ff0000",
                    "opacity": 0.33
                }
            }
        ]
    })
}

pub fn error_response() -> Value {
    json!({
        "error_code": 171,
        "error": "No suitable edges near location",
        "status_code": 400,
        "status": "Bad Request"
    })
}

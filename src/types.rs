//! Request and response bodies of the routing service.
//!
//! Only the fields this crate reads or that callers commonly set are typed.
//! Costing options and other open-ended objects pass through as raw JSON.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PolylineError;
use crate::polyline::{self, Coordinate, LineGeometry};
use crate::precision::Precision;
use crate::traits::EncodedShape;

/// A bare latitude/longitude pair as the service expects it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coordinate> for LatLng {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            lat: coordinate.lat,
            lon: coordinate.lon,
        }
    }
}

/// How a location participates in a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Break,
    BreakThrough,
    Through,
    Via,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestLocation {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub location_type: Option<LocationType>,
    /// Preferred direction of travel, in degrees from north.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl RequestLocation {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ..Self::default()
        }
    }

    pub fn with_type(mut self, location_type: LocationType) -> Self {
        self.location_type = Some(location_type);
        self
    }
}

/// Costing model used for path-finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Costing {
    Auto,
    Bicycle,
    Bus,
    Pedestrian,
    Taxi,
    Truck,
    Motorcycle,
    MotorScooter,
    Multimodal,
    Bikeshare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Miles,
    Kilometers,
    Km,
    Mi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionsType {
    None,
    Maneuvers,
    Instructions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectionsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Meaning of [`DateTime::value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum DateTimeType {
    /// Leave now; no value is sent.
    Current = 0,
    DepartAt = 1,
    ArriveBy = 2,
    /// Same time of day along the whole route, ignoring elapsed time.
    Invariant = 3,
}

impl From<DateTimeType> for u8 {
    fn from(kind: DateTimeType) -> Self {
        kind as u8
    }
}

impl TryFrom<u8> for DateTimeType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DateTimeType::Current),
            1 => Ok(DateTimeType::DepartAt),
            2 => Ok(DateTimeType::ArriveBy),
            3 => Ok(DateTimeType::Invariant),
            other => Err(format!("unknown date_time type {other}")),
        }
    }
}

/// Departure or arrival time of a route, local to its locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTime {
    #[serde(rename = "type")]
    pub kind: DateTimeType,
    /// `YYYY-MM-DDTHH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl DateTime {
    pub fn current() -> Self {
        Self {
            kind: DateTimeType::Current,
            value: None,
        }
    }

    pub fn depart_at(value: impl Into<String>) -> Self {
        Self {
            kind: DateTimeType::DepartAt,
            value: Some(value.into()),
        }
    }

    pub fn arrive_by(value: impl Into<String>) -> Self {
        Self {
            kind: DateTimeType::ArriveBy,
            value: Some(value.into()),
        }
    }
}

/// Body of `/route` and `/optimized_route`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub locations: Vec<RequestLocation>,
    pub costing: Costing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costing_options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directions_options: Option<DirectionsOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directions_type: Option<DirectionsType>,
    /// Echoed back in the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_locations: Vec<RequestLocation>,
    /// Outer rings of polygons whose edges the route must avoid.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_polygons: Vec<Vec<Coordinate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime>,
}

impl RouteRequest {
    pub fn new(locations: Vec<RequestLocation>, costing: Costing) -> Self {
        Self {
            locations,
            costing,
            costing_options: None,
            directions_options: None,
            directions_type: None,
            id: None,
            exclude_locations: Vec::new(),
            exclude_polygons: Vec::new(),
            date_time: None,
        }
    }
}

/// One isochrone contour; set either `time` (minutes) or `distance` (km).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contour {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneRequest {
    pub locations: Vec<RequestLocation>,
    pub costing: Costing,
    pub contours: Vec<Contour>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costing_options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime>,
    /// Return polygons instead of linestrings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygons: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denoise: Option<f64>,
    /// Douglas-Peucker tolerance in meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generalize: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_locations: Option<bool>,
}

impl IsochroneRequest {
    pub fn new(locations: Vec<RequestLocation>, costing: Costing, contours: Vec<Contour>) -> Self {
        Self {
            locations,
            costing,
            contours,
            costing_options: None,
            id: None,
            date_time: None,
            polygons: None,
            denoise: None,
            generalize: None,
            show_locations: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeMatch {
    EdgeWalk,
    MapSnap,
    WalkOrSnap,
}

/// Tuning of the map-matching search. Distances are in meters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TraceOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_penalty_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_accuracy: Option<f64>,
    /// Gap between trace points beyond which the match is broken in two.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakage_distance: Option<f64>,
    /// Trace points closer than this are merged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpolation_distance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterAction {
    Include,
    Exclude,
}

/// Attribute keys such as `edge.names` or `matched.point` to keep or drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFilter {
    pub attributes: Vec<String>,
    pub action: FilterAction,
}

/// The trace to match, either as points or as an encoded polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraceInput {
    Shape { shape: Vec<LatLng> },
    EncodedPolyline { encoded_polyline: String },
}

/// Body of `/trace_route`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMatchingRequest {
    pub costing: Costing,
    pub shape_match: ShapeMatch,
    #[serde(flatten)]
    pub input: TraceInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costing_options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directions_options: Option<DirectionsOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directions_type: Option<DirectionsType>,
    /// Epoch seconds of the first trace point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_time: Option<u64>,
    /// Seconds elapsed between consecutive trace points.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub durations: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_timestamps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_options: Option<TraceOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<TraceFilter>,
}

impl MapMatchingRequest {
    pub fn new(costing: Costing, shape_match: ShapeMatch, input: TraceInput) -> Self {
        Self {
            costing,
            shape_match,
            input,
            costing_options: None,
            directions_options: None,
            directions_type: None,
            begin_time: None,
            durations: Vec::new(),
            use_timestamps: None,
            trace_options: None,
            filter: None,
        }
    }

    /// Builds a request whose trace is sent as an encoded polyline.
    ///
    /// The service decodes `encoded_polyline` at six digits.
    pub fn from_coordinates(
        costing: Costing,
        shape_match: ShapeMatch,
        coordinates: &[Coordinate],
    ) -> Result<Self, PolylineError> {
        let encoded_polyline = polyline::encode(coordinates, Precision::SIX)?;
        Ok(Self::new(
            costing,
            shape_match,
            TraceInput::EncodedPolyline { encoded_polyline },
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub has_time_restrictions: bool,
    #[serde(default)]
    pub has_toll: Option<bool>,
    #[serde(default)]
    pub has_highway: Option<bool>,
    #[serde(default)]
    pub has_ferry: Option<bool>,
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
    /// Seconds.
    pub time: f64,
    /// In the requested units.
    pub length: f64,
    #[serde(default)]
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    #[serde(rename = "type")]
    pub maneuver_type: u32,
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub street_names: Vec<String>,
    pub time: f64,
    pub length: f64,
    #[serde(default)]
    pub cost: f64,
    pub begin_shape_index: usize,
    pub end_shape_index: usize,
    #[serde(default)]
    pub travel_mode: Option<String>,
    #[serde(default)]
    pub travel_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub summary: Summary,
    /// Encoded polyline of the leg, six digits.
    pub shape: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maneuvers: Vec<Maneuver>,
}

impl EncodedShape for Leg {
    fn encoded_shape(&self) -> &str {
        &self.shape
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseLocation {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type", default)]
    pub location_type: Option<LocationType>,
    #[serde(default)]
    pub original_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub locations: Vec<ResponseLocation>,
    pub legs: Vec<Leg>,
    pub summary: Summary,
    pub status: i64,
    pub status_message: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub units: Option<Units>,
    #[serde(default)]
    pub warnings: Option<Value>,
}

impl Trip {
    /// Decodes every leg shape, one geometry per leg in leg order.
    pub fn line_geometries(
        &self,
        precision: Precision,
    ) -> Result<Vec<LineGeometry>, PolylineError> {
        self.legs
            .par_iter()
            .map(|leg| leg.line_geometry(precision))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripResponse {
    pub trip: Trip,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneFeature {
    pub geometry: Value,
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
}

/// GeoJSON feature collection of contours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneResponse {
    pub features: Vec<IsochroneFeature>,
}

/// Service status; the optional fields appear only for verbose requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub version: String,
    #[serde(default)]
    pub tileset_last_modified: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_tiles: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_admins: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_timezones: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_live_traffic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Value>,
}

/// Error body sent with non-success responses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_request_skips_unset_fields() {
        let request = RouteRequest::new(
            vec![
                RequestLocation::new(42.530607, 1.570593),
                RequestLocation::new(42.534826, 1.579133).with_type(LocationType::Via),
            ],
            Costing::MotorScooter,
        );

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "locations": [
                    { "lat": 42.530607, "lon": 1.570593 },
                    { "lat": 42.534826, "lon": 1.579133, "type": "via" }
                ],
                "costing": "motor_scooter"
            })
        );
    }

    #[test]
    fn test_map_matching_shape_input_flattens() {
        let request = MapMatchingRequest::new(
            Costing::Auto,
            ShapeMatch::MapSnap,
            TraceInput::Shape {
                shape: vec![LatLng { lat: 1.0, lon: 2.0 }],
            },
        );

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "costing": "auto",
                "shape_match": "map_snap",
                "shape": [{ "lat": 1.0, "lon": 2.0 }]
            })
        );
    }

    #[test]
    fn test_map_matching_from_coordinates_encodes() {
        let trace = vec![
            Coordinate::new(13.35855, 52.450385),
            Coordinate::new(13.358336, 52.44998),
        ];
        let request = MapMatchingRequest::from_coordinates(
            Costing::Pedestrian,
            ShapeMatch::WalkOrSnap,
            &trace,
        )
        .unwrap();

        let TraceInput::EncodedPolyline { encoded_polyline } = &request.input else {
            panic!("expected an encoded polyline");
        };
        assert_eq!(encoded_polyline, "adi`cBk|inXhXjL");
        assert_eq!(
            serde_json::to_value(&request).unwrap()["encoded_polyline"],
            json!("adi`cBk|inXhXjL")
        );
    }

    #[test]
    fn test_route_request_sends_date_time() {
        let mut request = RouteRequest::new(
            vec![RequestLocation::new(1.0, 1.0), RequestLocation::new(2.0, 2.0)],
            Costing::Auto,
        );
        request.date_time = Some(DateTime::depart_at("2026-10-18T08:30"));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["date_time"], json!({ "type": 1, "value": "2026-10-18T08:30" }));

        request.date_time = Some(DateTime::current());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["date_time"], json!({ "type": 0 }));
    }

    #[test]
    fn test_date_time_rejects_unknown_type() {
        let parsed = serde_json::from_value::<DateTime>(json!({ "type": 7 }));
        assert!(parsed.is_err());
        let parsed: DateTime = serde_json::from_value(json!({ "type": 2, "value": "x" })).unwrap();
        assert_eq!(parsed.kind, DateTimeType::ArriveBy);
    }

    #[test]
    fn test_map_matching_trace_tuning_serializes() {
        let trace = vec![
            Coordinate::new(13.35855, 52.450385),
            Coordinate::new(13.358336, 52.44998),
        ];
        let mut request =
            MapMatchingRequest::from_coordinates(Costing::Auto, ShapeMatch::MapSnap, &trace)
                .unwrap();
        request.use_timestamps = Some(true);
        request.begin_time = Some(1_700_000_000);
        request.durations = vec![4.0];
        request.trace_options = Some(TraceOptions {
            search_radius: Some(50.0),
            gps_accuracy: Some(5.0),
            breakage_distance: Some(2000.0),
            interpolation_distance: Some(10.0),
            ..TraceOptions::default()
        });
        request.filter = Some(TraceFilter {
            attributes: vec!["edge.names".to_string(), "matched.point".to_string()],
            action: FilterAction::Include,
        });

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "costing": "auto",
                "shape_match": "map_snap",
                "encoded_polyline": "adi`cBk|inXhXjL",
                "begin_time": 1_700_000_000,
                "durations": [4.0],
                "use_timestamps": true,
                "trace_options": {
                    "search_radius": 50.0,
                    "gps_accuracy": 5.0,
                    "breakage_distance": 2000.0,
                    "interpolation_distance": 10.0
                },
                "filter": {
                    "attributes": ["edge.names", "matched.point"],
                    "action": "include"
                }
            })
        );
    }

    #[test]
    fn test_trip_line_geometries_preserve_leg_order() {
        let leg = |shape: &str| Leg {
            summary: Summary::default(),
            shape: shape.to_string(),
            maneuvers: Vec::new(),
        };
        let trip = Trip {
            locations: Vec::new(),
            legs: vec![leg("_p~iF~ps|U"), leg("_ulLnnqC")],
            summary: Summary::default(),
            status: 0,
            status_message: "Found route between points".to_string(),
            language: None,
            units: None,
            warnings: None,
        };

        let geometries = trip.line_geometries(Precision::FIVE).unwrap();
        assert_eq!(geometries.len(), 2);
        assert_eq!(geometries[0].coordinates, vec![Coordinate::new(-120.2, 38.5)]);
        assert_eq!(geometries[1].coordinates, vec![Coordinate::new(-0.75, 2.2)]);
    }

    #[test]
    fn test_trip_line_geometries_fail_on_bad_leg() {
        let trip = Trip {
            locations: Vec::new(),
            legs: vec![Leg {
                summary: Summary::default(),
                shape: "_".to_string(),
                maneuvers: Vec::new(),
            }],
            summary: Summary::default(),
            status: 0,
            status_message: String::new(),
            language: None,
            units: None,
            warnings: None,
        };

        assert!(matches!(
            trip.line_geometries(Precision::SIX),
            Err(PolylineError::MalformedInput { .. })
        ));
    }
}

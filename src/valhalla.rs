//! Blocking HTTP client for the Valhalla routing service.

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ValhallaError;
use crate::polyline::LineGeometry;
use crate::precision::Precision;
use crate::types::{
    IsochroneRequest, IsochroneResponse, MapMatchingRequest, RouteRequest, StatusResponse,
    TripResponse,
};

pub const URL_ENV: &str = "VALHALLA_URL";
pub const TIMEOUT_ENV: &str = "VALHALLA_TIMEOUT_SECS";

const JSON: &str = "application/json";

/// Response content types decoded as JSON, compared case-insensitively.
const JSON_CONTENT_TYPES: [&str; 4] = [
    "application/json",
    "application/json;charset=utf-8",
    "application/geo+json",
    "application/vnd.geo+json",
];

#[derive(Debug, Clone)]
pub struct ValhallaConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Sent with every request; per-request headers take precedence.
    pub headers: Vec<(String, String)>,
    /// Precision of the shapes returned by the service.
    pub shape_precision: Precision,
}

impl Default for ValhallaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8002".to_string(),
            timeout_secs: 10,
            headers: Vec::new(),
            shape_precision: Precision::SIX,
        }
    }
}

impl ValhallaConfig {
    /// Reads `VALHALLA_URL` and `VALHALLA_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Result<Self, ValhallaError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValhallaError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(URL_ENV) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                ValhallaError::Config(format!(
                    "{TIMEOUT_ENV} must be a whole number of seconds, got {raw:?}"
                ))
            })?;
        }
        Ok(config)
    }
}

/// Per-request path parameters, query, headers and JSON body.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Values substituted for `:name` path segments.
    pub params: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    /// Empty options: no params, query, extra headers or body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value for the `:name` path segment.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Appends a query pair.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Adds a header, overriding the defaults and the configured headers.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the JSON body; also sends `Content-Type: application/json`.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ValhallaClient {
    config: ValhallaConfig,
    base_url: Url,
    client: Client,
}

impl ValhallaClient {
    pub fn new(config: ValhallaConfig) -> Result<Self, ValhallaError> {
        let base_url = Url::parse(&config.base_url).map_err(|err| {
            ValhallaError::Config(format!("invalid base url {:?}: {err}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ValhallaError::Config(format!(
                "base url {:?} cannot carry a path",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    pub fn config(&self) -> &ValhallaConfig {
        &self.config
    }

    /// Turn-by-turn route between the request locations.
    pub fn route(&self, request: &RouteRequest) -> Result<TripResponse, ValhallaError> {
        self.post("/route", RequestOptions::new().json(to_json(request)?))
    }

    /// Route visiting every location, reordered to minimize cost.
    pub fn optimized_route(&self, request: &RouteRequest) -> Result<TripResponse, ValhallaError> {
        self.post("/optimized_route", RequestOptions::new().json(to_json(request)?))
    }

    pub fn isochrone(
        &self,
        request: &IsochroneRequest,
    ) -> Result<IsochroneResponse, ValhallaError> {
        self.post("/isochrone", RequestOptions::new().json(to_json(request)?))
    }

    /// Matches a trace to the road network.
    pub fn trace_route(&self, request: &MapMatchingRequest) -> Result<TripResponse, ValhallaError> {
        self.post("/trace_route", RequestOptions::new().json(to_json(request)?))
    }

    /// Service status. Extra fields are only returned when `verbose` is set
    /// and the server allows it.
    pub fn status(&self, verbose: bool) -> Result<StatusResponse, ValhallaError> {
        let mut options = RequestOptions::new();
        if verbose {
            options = options.query("verbose", "true");
        }
        self.get("/status", options)
    }

    /// Requests a route and decodes each leg shape into a line geometry.
    pub fn route_geometries(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<LineGeometry>, ValhallaError> {
        let response = self.route(request)?;
        let geometries = response.trip.line_geometries(self.config.shape_precision)?;
        debug!(legs = geometries.len(), "decoded route geometry");
        Ok(geometries)
    }

    pub fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ValhallaError> {
        self.request(Method::GET, path, options)
    }

    pub fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ValhallaError> {
        self.request(Method::POST, path, options)
    }

    pub fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ValhallaError> {
        self.request(Method::PUT, path, options)
    }

    pub fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ValhallaError> {
        self.request(Method::DELETE, path, options)
    }

    /// Sends a request and decodes a JSON response.
    ///
    /// Non-success statuses become [`ValhallaError::Request`], carrying the
    /// response body when it was JSON.
    pub fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ValhallaError> {
        let url = resolve_url(&self.base_url, path, &options.params)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        merge_headers(&mut headers, &self.config.headers)?;
        if options.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        }
        merge_headers(&mut headers, &options.headers)?;

        debug!(method = %method, url = %url, "sending valhalla request");

        let mut builder = self.client.request(method, url).headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send()?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let json = content_type.as_deref().is_some_and(is_json_content_type);
        let bytes = response.bytes()?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "valhalla request failed");
            let body = if json {
                serde_json::from_slice(&bytes).ok()
            } else {
                None
            };
            return Err(ValhallaError::Request {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        if !json {
            return Err(ValhallaError::UnsupportedContentType(content_type));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, ValhallaError> {
    Ok(serde_json::to_value(value)?)
}

/// Appends `path` to the base url, replacing `:name` segments by their param.
fn resolve_url(base: &Url, path: &str, params: &[(String, String)]) -> Result<Url, ValhallaError> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| ValhallaError::Config(format!("base url {base} cannot carry a path")))?;
        segments.pop_if_empty();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            let value = segment
                .strip_prefix(':')
                .and_then(|name| {
                    params
                        .iter()
                        .find(|(param, _)| param == name)
                        .map(|(_, value)| value.as_str())
                })
                .unwrap_or(segment);
            segments.push(value);
        }
    }
    Ok(url)
}

fn merge_headers(headers: &mut HeaderMap, extra: &[(String, String)]) -> Result<(), ValhallaError> {
    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ValhallaError::InvalidHeader(name.clone()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ValhallaError::InvalidHeader(name.as_str().to_string()))?;
        headers.insert(name, value);
    }
    Ok(())
}

fn is_json_content_type(content_type: &str) -> bool {
    let normalized: String = content_type
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    JSON_CONTENT_TYPES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(&normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("Application/JSON;charset=UTF-8"));
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(is_json_content_type("application/geo+json"));
        assert!(is_json_content_type("application/vnd.geo+json"));
        assert!(!is_json_content_type("text/html"));
        assert!(!is_json_content_type("application/x-protobuf"));
    }

    #[test]
    fn test_resolve_url_substitutes_params() {
        let base = Url::parse("http://localhost:8002").unwrap();
        let params = params(&[("resource", "foo bar")]);
        let url = resolve_url(&base, "/resource/:resource", &params).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8002/resource/foo%20bar");
    }

    #[test]
    fn test_resolve_url_keeps_base_path() {
        let base = Url::parse("https://example.com/valhalla/").unwrap();
        let url = resolve_url(&base, "/route", &[]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/valhalla/route");
    }

    #[test]
    fn test_resolve_url_without_params() {
        let base = Url::parse("http://localhost:8002").unwrap();
        let url = resolve_url(&base, "/status", &params(&[("unused", "x")])).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8002/status");
    }

    #[test]
    fn test_config_from_lookup() {
        let config = ValhallaConfig::from_lookup(|key| match key {
            URL_ENV => Some("http://valhalla:8002".to_string()),
            TIMEOUT_ENV => Some(" 30 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_url, "http://valhalla:8002");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.shape_precision, Precision::SIX);
    }

    #[test]
    fn test_config_from_lookup_defaults() {
        let config = ValhallaConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url, ValhallaConfig::default().base_url);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        let result =
            ValhallaConfig::from_lookup(|key| (key == TIMEOUT_ENV).then(|| "soon".to_string()));
        assert!(matches!(result, Err(ValhallaError::Config(_))));
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        let config = ValhallaConfig {
            base_url: "not a url".to_string(),
            ..ValhallaConfig::default()
        };
        assert!(matches!(ValhallaClient::new(config), Err(ValhallaError::Config(_))));

        let config = ValhallaConfig {
            base_url: "mailto:routing@example.com".to_string(),
            ..ValhallaConfig::default()
        };
        assert!(matches!(ValhallaClient::new(config), Err(ValhallaError::Config(_))));
    }
}

//! Normalization of loosely-shaped call arguments into per-endpoint parameter records.
//!
//! Every endpoint accepts its arguments as a slice of JSON values, the way a caller
//! would pass them from a dynamic source (CLI input, a config file, another API).
//! Each record tries the shapes it accepts in priority order and yields `None`
//! when nothing matches.

use super::query::{format_number, render, QueryParams};
use serde_json::{Map, Value};

/// A normalized request for one LocationIQ endpoint.
pub trait EndpointParams: Sized {
    /// Endpoint file under `/v1/`, e.g. `reverse.php`.
    const ENDPOINT: &'static str;

    /// Tries each accepted argument shape in order.
    fn from_args(args: &[Value]) -> Option<Self>;

    /// Endpoint-specific query pairs (without `key` and `format`).
    fn into_query(self) -> QueryParams;
}

/// Parameters of `/v1/reverse.php`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseParams {
    pub lat: Value,
    pub lon: Value,
}

impl ReverseParams {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            lat: Value::String(format_number(latitude)),
            lon: Value::String(format_number(longitude)),
        }
    }

    fn from_values(lat: &Value, lon: &Value) -> Self {
        Self {
            lat: coordinate(lat),
            lon: coordinate(lon),
        }
    }
}

impl EndpointParams for ReverseParams {
    const ENDPOINT: &'static str = "reverse.php";

    fn from_args(args: &[Value]) -> Option<Self> {
        match args {
            // (latitude, longitude)
            [lat, lon, ..] if is_numeric(lat) && is_numeric(lon) => Some(Self::from_values(lat, lon)),
            // [latitude, longitude]
            [Value::Array(seq), ..] if seq.len() >= 2 => Some(Self::from_values(&seq[0], &seq[1])),
            // {lat, lng} or {latitude, longitude}
            [Value::Object(map), ..] => Some(Self::from_values(
                first_present(map, &["lat", "latitude"]),
                first_present(map, &["lng", "longitude"]),
            )),
            _ => None,
        }
    }

    fn into_query(self) -> QueryParams {
        QueryParams::new().with("lat", self.lat).with("lon", self.lon)
    }
}

/// Parameters of `/v1/search.php`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub q: String,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self { q: query.into() }
    }
}

impl EndpointParams for SearchParams {
    const ENDPOINT: &'static str = "search.php";

    fn from_args(args: &[Value]) -> Option<Self> {
        match args {
            [Value::String(q), ..] => Some(Self::new(q.clone())),
            _ => None,
        }
    }

    fn into_query(self) -> QueryParams {
        QueryParams::new().with("q", self.q)
    }
}

/// Parameters of `/v1/nearby.php`.
///
/// `tag` and `radius` are kept as given, so a `0` radius or an empty tag is
/// left out of the request.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyParams {
    pub lat: Value,
    pub lon: Value,
    pub tag: Value,
    pub radius: Value,
}

impl NearbyParams {
    pub fn new(latitude: f64, longitude: f64, tag: impl Into<String>, radius: u32) -> Self {
        let coords = ReverseParams::new(latitude, longitude);
        Self {
            lat: coords.lat,
            lon: coords.lon,
            tag: Value::String(tag.into()),
            radius: Value::from(radius),
        }
    }

    fn from_values(lat: &Value, lon: &Value, tag: &Value, radius: &Value) -> Self {
        Self {
            lat: coordinate(lat),
            lon: coordinate(lon),
            tag: tag.clone(),
            radius: radius.clone(),
        }
    }
}

impl EndpointParams for NearbyParams {
    const ENDPOINT: &'static str = "nearby.php";

    fn from_args(args: &[Value]) -> Option<Self> {
        match args {
            // (latitude, longitude, tag, radius)
            [lat, lon, tag @ Value::String(_), radius, ..]
                if is_numeric(lat) && is_numeric(lon) && is_numeric(radius) =>
            {
                Some(Self::from_values(lat, lon, tag, radius))
            },
            // [latitude, longitude, tag, radius]
            [Value::Array(seq), ..] if seq.len() >= 4 => {
                Some(Self::from_values(&seq[0], &seq[1], &seq[2], &seq[3]))
            },
            // {lat|latitude, lng|longitude, tag, radius}
            [Value::Object(map), ..] => Some(Self::from_values(
                first_present(map, &["lat", "latitude"]),
                first_present(map, &["lng", "longitude"]),
                map.get("tag").unwrap_or(&Value::Null),
                map.get("radius").unwrap_or(&Value::Null),
            )),
            _ => None,
        }
    }

    fn into_query(self) -> QueryParams {
        QueryParams::new()
            .with("lat", self.lat)
            .with("lon", self.lon)
            .with("tag", self.tag)
            .with("radius", self.radius)
    }
}

/// A JSON number, or a string holding one.
fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => {
            let s = s.trim();
            !s.is_empty() && s.parse::<f64>().map_or(false, f64::is_finite)
        },
        _ => false,
    }
}

/// Stringifies a coordinate; a missing one stays `null` and is dropped later.
fn coordinate(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(s) => Value::String(s.clone()),
        other => Value::String(render(other)),
    }
}

/// Value of the first key present with a non-null value.
fn first_present<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> &'a Value {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
        .unwrap_or(&Value::Null)
}

//! Provides a client for interacting with the LocationIQ geocoding API.
//!
//! This module defines the `LocationIqClient` struct and its methods for forward
//! geocoding (`search`), reverse geocoding (`reverse`) and point-of-interest
//! lookup (`nearby`).

use super::params::{EndpointParams, NearbyParams, ReverseParams, SearchParams};
use super::query::QueryParams;
use crate::error::{GeocodeError, RawResponse};
use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://us1.locationiq.com";

/// Response format requested from every endpoint.
const FORMAT: &str = "json";

/// An asynchronous client for the LocationIQ API.
///
/// The client starts uninitialized; every call fails with
/// [`GeocodeError::NotInitiated`] until [`LocationIqClient::init`] is given a
/// non-empty token.
#[derive(Debug, Clone)]
pub struct LocationIqClient {
    client: Client,
    token: Option<String>,
    base_url: String,
}

impl Default for LocationIqClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationIqClient {
    /// Creates an uninitialized client using the default (us1) base URL.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates an uninitialized client against a custom host, e.g. another
    /// region or a mock server.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            token: None,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Stores the API token. Calling it again replaces the previous token.
    pub fn init(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// True if a non-empty token has been set.
    pub fn is_init(&self) -> bool {
        self.token.as_deref().map_or(false, |t| !t.is_empty())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Reverse geocoding: converts coordinates into a place description.
    ///
    /// Accepted arguments:
    /// - `(latitude, longitude)` as numbers or numeric strings
    /// - `[latitude, longitude]`
    /// - `{"lat": .., "lng": ..}` or `{"latitude": .., "longitude": ..}`
    pub async fn reverse(&self, args: &[Value]) -> Result<Value, GeocodeError> {
        self.request_from_args::<ReverseParams>(args).await
    }

    /// Forward geocoding: converts a free-text address into places.
    ///
    /// Accepted arguments: `(address)` where `address` is a string.
    pub async fn search(&self, args: &[Value]) -> Result<Value, GeocodeError> {
        self.request_from_args::<SearchParams>(args).await
    }

    /// Points of interest around a coordinate, filtered by tag and radius (meters).
    ///
    /// Accepted arguments:
    /// - `(latitude, longitude, tag, radius)`
    /// - `[latitude, longitude, tag, radius]`
    /// - `{"lat"|"latitude": .., "lng"|"longitude": .., "tag": .., "radius": ..}`
    pub async fn nearby(&self, args: &[Value]) -> Result<Value, GeocodeError> {
        self.request_from_args::<NearbyParams>(args).await
    }

    async fn request_from_args<P: EndpointParams>(
        &self,
        args: &[Value],
    ) -> Result<Value, GeocodeError> {
        let token = self.token()?;
        let params = P::from_args(args).ok_or_else(|| {
            error!("No accepted argument shape for {}", P::ENDPOINT);
            GeocodeError::invalid_parameters(args)
        })?;
        self.fetch(P::ENDPOINT, self.build_query(token, params)).await
    }

    /// Sends an already-normalized request.
    pub async fn request<P: EndpointParams>(&self, params: P) -> Result<Value, GeocodeError> {
        let token = self.token()?;
        self.fetch(P::ENDPOINT, self.build_query(token, params)).await
    }

    /// Full query mapping for `params`: `key`, `format`, then the endpoint keys.
    pub fn build_query<P: EndpointParams>(&self, token: &str, params: P) -> QueryParams {
        let mut query = QueryParams::new().with("key", token).with("format", FORMAT);
        query.extend(params.into_query());
        query
    }

    fn token(&self) -> Result<&str, GeocodeError> {
        match self.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => {
                error!("LocationIQ client used before init");
                Err(GeocodeError::NotInitiated)
            },
        }
    }

    /// Performs the GET, parses the body and checks it for a known result shape.
    async fn fetch(&self, endpoint: &str, query: QueryParams) -> Result<Value, GeocodeError> {
        let endpoint_url = format!("{}/v1/{}", self.base_url, endpoint);
        let url = format!("{}?{}", endpoint_url, query.to_query_string());
        info!("Requesting LocationIQ {}", endpoint);
        debug!(
            "GET {} (params: {})",
            endpoint_url,
            query.keys().collect::<Vec<_>>().join(",")
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("Error fetching {}: {}", endpoint_url, e);
            GeocodeError::Fetching { origin: Arc::new(e) }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("LocationIQ {} responded with status {}", endpoint, status);
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(|e| {
            error!("Error reading response body from {}: {}", endpoint_url, e);
            GeocodeError::Fetching { origin: Arc::new(e) }
        })?;
        debug!("Received {} bytes from {}", body.len(), endpoint);

        let data: Value = serde_json::from_str(&body).map_err(|e| {
            error!("Error parsing LocationIQ response JSON: {}", e);
            GeocodeError::Parsing {
                origin: RawResponse {
                    status,
                    url: endpoint_url.clone(),
                    content_type,
                    body,
                },
                cause: Arc::new(e),
            }
        })?;

        if !is_recognized(&data) {
            error!("LocationIQ {} returned no recognized result", endpoint);
            return Err(GeocodeError::server(data));
        }

        Ok(data)
    }
}

/// A body is a result if it has a `place_id`, a defined element at index 0,
/// or an `osm_id` (reverse, search and nearby shapes respectively).
fn is_recognized(data: &Value) -> bool {
    match data {
        Value::Object(map) => {
            map.contains_key("place_id") || map.contains_key("0") || map.contains_key("osm_id")
        },
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

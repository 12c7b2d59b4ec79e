//! Async client for the LocationIQ geocoding API.
//!
//! ```no_run
//! use locationiq_geocoder::LocationIqClient;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), locationiq_geocoder::GeocodeError> {
//! let mut client = LocationIqClient::new();
//! client.init("pk.your_token");
//!
//! let place = client.reverse(&[json!(48.8584), json!(2.2945)]).await?;
//! let matches = client.search(&[json!("10 Downing Street, London")]).await?;
//! let cafes = client
//!     .nearby(&[json!({"lat": 48.85, "lng": 2.35, "tag": "cafe", "radius": 300})])
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod models;

pub use api::{EndpointParams, LocationIqClient, NearbyParams, QueryParams, ReverseParams, SearchParams};
pub use config::{Config, Region};
pub use error::{AppError, ErrorKind, GeocodeError, RawResponse};

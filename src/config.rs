//! Runtime configuration read from the environment (and an optional `.env` file).
//!
//! - `LOCATIONIQ_KEY`: API token (required).
//! - `LOCATIONIQ_REGION`: `us1` (default) or `eu1`.
//! - `LOCATIONIQ_BASE_URL`: overrides the region host entirely.

use crate::api::LocationIqClient;
use crate::error::{AppError, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error};

pub const KEY_VAR: &str = "LOCATIONIQ_KEY";
pub const REGION_VAR: &str = "LOCATIONIQ_REGION";
pub const BASE_URL_VAR: &str = "LOCATIONIQ_BASE_URL";

/// LocationIQ serving region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    Us1,
    Eu1,
}

impl Region {
    pub fn base_url(self) -> &'static str {
        match self {
            Region::Us1 => "https://us1.locationiq.com",
            Region::Eu1 => "https://eu1.locationiq.com",
        }
    }
}

impl FromStr for Region {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us1" | "us" => Ok(Region::Us1),
            "eu1" | "eu" => Ok(Region::Eu1),
            other => Err(AppError::Config(format!(
                "Unknown region '{}'. Must be one of: us1, eu1",
                other
            ))),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Us1 => write!(f, "us1"),
            Region::Eu1 => write!(f, "eu1"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub region: Region,
    pub base_url: Option<String>,
}

impl Config {
    /// Loads `.env` if present, then reads the `LOCATIONIQ_*` variables.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let api_key = env::var(KEY_VAR).map_err(|e| {
            error!("{} environment variable not set: {}", KEY_VAR, e);
            AppError::Env(e)
        })?;

        let region = match env::var(REGION_VAR) {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => Region::default(),
        };

        let base_url = env::var(BASE_URL_VAR).ok().filter(|v| !v.trim().is_empty());

        debug!("Loaded configuration (region: {}, custom base URL: {})", region, base_url.is_some());

        Ok(Self {
            api_key,
            region,
            base_url,
        })
    }

    /// The explicit base URL if one is set, else the region's host.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or_else(|| self.region.base_url())
    }

    /// Builds an initialized client for this configuration.
    pub fn into_client(self) -> LocationIqClient {
        let mut client = LocationIqClient::with_base_url(self.base_url());
        client.init(self.api_key);
        client
    }
}

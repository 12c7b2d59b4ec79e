//! Defines the geocoding error type `GeocodeError`, the application error `AppError`,
//! and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert common external errors into `AppError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` so both enums stay cloneable.

use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The five kinds of geocoding failure, with stable numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    /// The client hasn't been initialized. Call `LocationIqClient::init`.
    NotInitiated = 0,
    /// No accepted argument shape matched.
    InvalidParameters = 1,
    /// Transport failure while reaching the server.
    Fetching = 2,
    /// The response body is not JSON.
    Parsing = 3,
    /// The response parsed but carries no recognized success marker.
    Server = 4,
}

impl ErrorKind {
    /// Numeric code of this kind.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Upper-case name of this kind, e.g. `NOT_INITIATED`.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::NotInitiated => "NOT_INITIATED",
            ErrorKind::InvalidParameters => "INVALID_PARAMETERS",
            ErrorKind::Fetching => "FETCHING",
            ErrorKind::Parsing => "PARSING",
            ErrorKind::Server => "SERVER",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// A response whose body could not be parsed as JSON.
///
/// The body has already been read off the wire, so it is kept here as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    /// Request URL without its query string (which carries the API key).
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    /// The raw body text, for callers that want to parse it themselves.
    pub fn text(&self) -> &str {
        &self.body
    }
}

/// Failure of a single geocoding call.
#[derive(Error, Debug, Clone)]
pub enum GeocodeError {
    #[error("LocationIQ client isn't initialized. Call `init`, passing it your token.")]
    NotInitiated,

    #[error("Invalid parameters: \n{received}")]
    InvalidParameters {
        /// Pretty JSON dump of the arguments that were received.
        received: String,
    },

    #[error("Error while fetching. Check your network: {origin}")]
    Fetching { origin: Arc<reqwest::Error> },

    #[error(
        "Error while parsing response's body into JSON (status {}). The response is in the error's `origin` field.",
        .origin.status
    )]
    Parsing {
        origin: RawResponse,
        #[source]
        cause: Arc<serde_json::Error>,
    },

    #[error("Error from the server while geocoding: {reason}. The received body is in the error's `origin` field.")]
    Server { reason: String, origin: Value },
}

impl GeocodeError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeocodeError::NotInitiated => ErrorKind::NotInitiated,
            GeocodeError::InvalidParameters { .. } => ErrorKind::InvalidParameters,
            GeocodeError::Fetching { .. } => ErrorKind::Fetching,
            GeocodeError::Parsing { .. } => ErrorKind::Parsing,
            GeocodeError::Server { .. } => ErrorKind::Server,
        }
    }

    /// Numeric code of this error's kind.
    pub fn code(&self) -> u8 {
        self.kind().code()
    }

    pub(crate) fn invalid_parameters(args: &[Value]) -> Self {
        let received = serde_json::to_string_pretty(args).unwrap_or_else(|_| format!("{:?}", args));
        GeocodeError::InvalidParameters { received }
    }

    pub(crate) fn server(origin: Value) -> Self {
        let reason = origin
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("no recognized result in response")
            .to_string();
        GeocodeError::Server { reason, origin }
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        GeocodeError::Fetching {
            origin: Arc::new(err),
        }
    }
}

/// The primary error enumeration for the `locationiq` binary.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// Error returned by a geocoding call.
    #[error("Geocoding Error [{}]: {}", .0.kind(), .0)]
    Geocode(#[from] GeocodeError),

    /// Invalid configuration value.
    #[error("Configuration Error: {0}")]
    Config(String),

    /// Error related to accessing environment variables.
    #[error("Environment Error: {0}")]
    Env(#[from] std::env::VarError),

    /// Error related to standard I/O operations.
    #[error("I/O Error: {0}")]
    Io(Arc<std::io::Error>),

    /// Error while rendering JSON output (`serde_json`).
    #[error("JSON Error: {0}")]
    JsonParse(Arc<serde_json::Error>),

    /// Error specific to CLI logic or argument handling.
    #[error("CLI Error: {0}")]
    Cli(String),

    /// Error originating from user interaction prompts (`dialoguer`).
    #[error("Dialoguer Error: {0}")]
    Dialoguer(Arc<dialoguer::Error>),

    /// Error related to progress spinner style templating (`indicatif`).
    #[error("Progress Style Template Error: {0}")]
    Template(Arc<indicatif::style::TemplateError>),
}

/// A specialized `Result` type using the application's `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

// --- From implementations ---

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonParse(Arc::new(err))
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::Dialoguer(Arc::new(err))
    }
}

impl From<indicatif::style::TemplateError> for AppError {
    fn from(err: indicatif::style::TemplateError) -> Self {
        AppError::Template(Arc::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ErrorKind::NotInitiated.code(), 0);
        assert_eq!(ErrorKind::InvalidParameters.code(), 1);
        assert_eq!(ErrorKind::Fetching.code(), 2);
        assert_eq!(ErrorKind::Parsing.code(), 3);
        assert_eq!(ErrorKind::Server.code(), 4);
    }

    #[test]
    fn test_invalid_parameters_dumps_arguments() {
        let err = GeocodeError::invalid_parameters(&[json!("a"), json!({"x": 1})]);
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);
        let message = err.to_string();
        assert!(message.starts_with("Invalid parameters"));
        assert!(message.contains("\"a\""));
        assert!(message.contains("\"x\": 1"));
    }

    #[test]
    fn test_server_error_uses_upstream_reason() {
        let err = GeocodeError::server(json!({"error": "Invalid key"}));
        assert!(err.to_string().contains("Invalid key"));

        let err = GeocodeError::server(json!({}));
        match err {
            GeocodeError::Server { origin, .. } => assert_eq!(origin, json!({})),
            other => panic!("Expected Server error, got {:?}", other),
        }
    }

    #[test]
    fn test_app_error_wraps_geocode_error() {
        let app_err: AppError = GeocodeError::NotInitiated.into();
        assert!(app_err.to_string().contains("NOT_INITIATED (0)"));
    }
}

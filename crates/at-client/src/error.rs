//! Error types for airtable-client.

use std::time::Duration;

/// Result type alias for airtable-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for airtable-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if client construction failed because no API key
    /// could be resolved from any layer.
    pub fn is_missing_api_key(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingApiKey)
    }

    /// Returns true if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.kind, ErrorKind::RateLimited { .. })
    }

    /// Returns true if the API rejected the credentials.
    pub fn is_auth_error(&self) -> bool {
        match &self.kind {
            ErrorKind::Api {
                status, error_type, ..
            } => *status == 401 || error_type == "AUTHENTICATION_REQUIRED",
            ErrorKind::Http { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// Returns the retry-after duration if this is a rate limit error.
    pub fn retry_after(&self) -> Option<Duration> {
        match &self.kind {
            ErrorKind::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// No API key in the explicit options, the global defaults or the environment.
    #[error("An API key is required to connect to Airtable")]
    MissingApiKey,

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed with a body that is not an API error envelope.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// Airtable API error response.
    #[error("Airtable API error ({status}): {error_type} - {message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },

    /// Rate limit exceeded (HTTP 429).
    #[error("Rate limited{}", retry_after.map(|d| format!(", retry after {:?}", d)).unwrap_or_default())]
    RateLimited {
        retry_after: Option<Duration>,
        /// Whether the client asked not to be retried on rate limiting.
        no_retry: bool,
    },

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ErrorKind::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}

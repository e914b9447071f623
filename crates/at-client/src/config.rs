//! Client configuration and its resolution from layered sources.
//!
//! A [`ClientConfig`] is resolved once, from three layers in strict order:
//!
//! 1. explicit [`ClientOptions`],
//! 2. the process-wide [`Defaults`],
//! 3. the built-in [`DefaultConfig`] (environment variables and constants).
//!
//! A field falls through to the next layer only when it is absent. An
//! explicit `false` or zero timeout is kept.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::defaults::Defaults;
use crate::error::{Error, ErrorKind, Result};
use crate::transport::{HttpTransport, Transport};

/// Default Airtable API endpoint.
pub const DEFAULT_ENDPOINT_URL: &str = "https://api.airtable.com";

/// Default Airtable API version.
pub const DEFAULT_API_VERSION: &str = "0.1.0";

/// Default per-request timeout (5 minutes).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Environment variable overriding the endpoint URL.
pub const ENDPOINT_URL_ENV: &str = "AIRTABLE_ENDPOINT_URL";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "AIRTABLE_API_KEY";

/// Value of a custom header: a string, a number or a boolean.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    String(String),
    Number(f64),
    Bool(bool),
}

impl std::fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderValue::String(s) => f.write_str(s),
            HeaderValue::Number(n) => write!(f, "{}", n),
            HeaderValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::String(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::String(value)
    }
}

impl From<f64> for HeaderValue {
    fn from(value: f64) -> Self {
        HeaderValue::Number(value)
    }
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        HeaderValue::Number(value as f64)
    }
}

impl From<i32> for HeaderValue {
    fn from(value: i32) -> Self {
        HeaderValue::Number(f64::from(value))
    }
}

impl From<bool> for HeaderValue {
    fn from(value: bool) -> Self {
        HeaderValue::Bool(value)
    }
}

/// Custom headers merged into every outbound request.
pub type CustomHeaders = BTreeMap<String, HeaderValue>;

/// Explicit options for constructing a client.
///
/// Every field is optional; unset fields are filled from the global
/// defaults and then from the built-in defaults.
///
/// # Example
///
/// ```rust
/// use airtable_client::ClientOptions;
/// use std::time::Duration;
///
/// let options = ClientOptions::new()
///     .with_api_key("patXXXXXXXXXXXXXX")
///     .with_request_timeout(Duration::from_secs(30))
///     .with_custom_header("X-Request-Source", "nightly-sync");
/// ```
#[derive(Clone, Default)]
pub struct ClientOptions {
    api_key: Option<String>,
    api_version: Option<String>,
    custom_headers: Option<CustomHeaders>,
    endpoint_url: Option<String>,
    no_retry_if_rate_limited: Option<bool>,
    request_timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_version", &self.api_version)
            .field("custom_headers", &self.custom_headers)
            .field("endpoint_url", &self.endpoint_url)
            .field("no_retry_if_rate_limited", &self.no_retry_if_rate_limited)
            .field("request_timeout", &self.request_timeout)
            .field("transport", &self.transport)
            .finish()
    }
}

impl ClientOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the API version (e.g., "0.1.0").
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Add one custom header.
    pub fn with_custom_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<HeaderValue>,
    ) -> Self {
        self.custom_headers
            .get_or_insert_with(CustomHeaders::new)
            .insert(name.into(), value.into());
        self
    }

    /// Replace all custom headers.
    pub fn with_custom_headers(mut self, headers: CustomHeaders) -> Self {
        self.custom_headers = Some(headers);
        self
    }

    /// Set the endpoint URL.
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Set whether rate limited requests should not be retried.
    pub fn with_no_retry_if_rate_limited(mut self, no_retry: bool) -> Self {
        self.no_retry_if_rate_limited = Some(no_retry);
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Use a custom transport instead of the default HTTP transport.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }
}

/// The built-in layer: environment variables and hard-coded constants.
#[derive(Clone, PartialEq, Eq)]
pub struct DefaultConfig {
    pub endpoint_url: String,
    pub api_version: String,
    pub api_key: Option<String>,
    pub no_retry_if_rate_limited: bool,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for DefaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("api_version", &self.api_version)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("no_retry_if_rate_limited", &self.no_retry_if_rate_limited)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl DefaultConfig {
    /// Build the built-in layer from the process environment.
    ///
    /// Reads:
    /// - `AIRTABLE_ENDPOINT_URL` (default: `https://api.airtable.com`)
    /// - `AIRTABLE_API_KEY` (no default)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the built-in layer from an arbitrary variable lookup.
    ///
    /// Variables that are set but empty count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        Self {
            endpoint_url: var(ENDPOINT_URL_ENV).unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_string()),
            api_version: DEFAULT_API_VERSION.to_string(),
            api_key: var(API_KEY_ENV),
            no_retry_if_rate_limited: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Fully resolved, immutable client configuration.
///
/// The API key is redacted in Debug output.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    api_version: String,
    api_version_major: String,
    custom_headers: CustomHeaders,
    endpoint_url: String,
    no_retry_if_rate_limited: bool,
    request_timeout: Duration,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("custom_headers", &self.custom_headers)
            .field("endpoint_url", &self.endpoint_url)
            .field("no_retry_if_rate_limited", &self.no_retry_if_rate_limited)
            .field("request_timeout", &self.request_timeout)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Resolve a configuration from explicit options, the given defaults and
    /// the built-in layer.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingApiKey`] if no layer provides a non-empty
    /// API key, or [`ErrorKind::Config`] if the default HTTP transport cannot
    /// be created.
    pub fn resolve(
        options: ClientOptions,
        defaults: &Defaults,
        builtin: &DefaultConfig,
    ) -> Result<Self> {
        let ClientOptions {
            api_key,
            api_version,
            custom_headers,
            endpoint_url,
            no_retry_if_rate_limited,
            request_timeout,
            transport,
        } = options;

        let api_key = api_key
            .or_else(|| defaults.api_key().map(str::to_string))
            .or_else(|| builtin.api_key.clone())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::new(ErrorKind::MissingApiKey))?;

        let api_version = api_version
            .or_else(|| defaults.api_version().map(str::to_string))
            .unwrap_or_else(|| builtin.api_version.clone());

        let endpoint_url = endpoint_url
            .or_else(|| defaults.endpoint_url().map(str::to_string))
            .unwrap_or_else(|| builtin.endpoint_url.clone());

        let no_retry_if_rate_limited = no_retry_if_rate_limited
            .or(defaults.no_retry_if_rate_limited())
            .unwrap_or(builtin.no_retry_if_rate_limited);

        let request_timeout = request_timeout.unwrap_or(builtin.request_timeout);

        let transport: Arc<dyn Transport> = match transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };

        let config = Self {
            api_version_major: major_version(&api_version).to_string(),
            api_key,
            api_version,
            custom_headers: custom_headers.unwrap_or_default(),
            endpoint_url,
            no_retry_if_rate_limited,
            request_timeout,
            transport,
        };

        debug!(
            endpoint_url = %config.endpoint_url,
            api_version = %config.api_version,
            timeout_ms = config.request_timeout.as_millis(),
            no_retry_if_rate_limited = config.no_retry_if_rate_limited,
            "Resolved Airtable client configuration"
        );

        Ok(config)
    }

    /// Copy of this configuration with a different request timeout.
    pub fn with_request_timeout(&self, timeout: Duration) -> Self {
        Self {
            request_timeout: timeout,
            ..self.clone()
        }
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// The part of the API version before the first `.`.
    pub fn api_version_major(&self) -> &str {
        &self.api_version_major
    }

    /// Get the custom headers sent with every request.
    pub fn custom_headers(&self) -> &CustomHeaders {
        &self.custom_headers
    }

    /// Get the endpoint URL.
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Whether rate limited requests should not be retried.
    pub fn no_retry_if_rate_limited(&self) -> bool {
        self.no_retry_if_rate_limited
    }

    /// Get the per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Get the transport requests are sent through.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

fn major_version(api_version: &str) -> &str {
    api_version.split('.').next().unwrap_or(api_version)
}

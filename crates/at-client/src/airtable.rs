//! The Airtable client: a resolved configuration plus the base factory.
//!
//! ## Security
//!
//! - The API key is redacted in Debug output
//! - Tracing never records the API key

use std::sync::Arc;
use std::time::Duration;

use crate::base::Base;
use crate::config::{ClientConfig, ClientOptions, CustomHeaders, DefaultConfig};
use crate::defaults::{global_defaults, Defaults};
use crate::error::Result;
use crate::transport::Transport;

/// Airtable API client.
///
/// Holds one fully resolved [`ClientConfig`] that never changes after
/// construction. Use [`Airtable::base`] to get a handle bound to it.
///
/// # Example
///
/// ```rust,ignore
/// use airtable_client::{Airtable, ClientOptions};
///
/// let airtable = Airtable::new(ClientOptions::new().with_api_key("patXXXXXXXXXXXXXX"))?;
/// let base = airtable.base("appXXXXXXXXXXXXXX");
///
/// let records: serde_json::Value = base.get_json("Projects", &[("maxRecords", "3")]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Airtable {
    config: ClientConfig,
}

impl Airtable {
    /// Create a client, filling unset options from the process-wide defaults
    /// and then from the environment.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::MissingApiKey`](crate::ErrorKind::MissingApiKey)
    /// if no API key is available from any layer.
    pub fn new(options: ClientOptions) -> Result<Self> {
        Self::with_defaults(options, &global_defaults())
    }

    /// Create a client against an explicit set of defaults instead of the
    /// process-wide registry.
    pub fn with_defaults(options: ClientOptions, defaults: &Defaults) -> Result<Self> {
        let config = ClientConfig::resolve(options, defaults, &Self::default_config())?;
        Ok(Self::from_config(config))
    }

    /// Create a client from an already resolved configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// The built-in defaults layer, read from the environment.
    pub fn default_config() -> DefaultConfig {
        DefaultConfig::from_env()
    }

    /// Get a handle for the base with the given id.
    ///
    /// The id is not validated here.
    pub fn base(&self, base_id: impl Into<String>) -> Base {
        Base::new(self.clone(), base_id)
    }

    /// Copy of this client with a different request timeout.
    pub fn with_request_timeout(&self, timeout: Duration) -> Self {
        Self {
            config: self.config.with_request_timeout(timeout),
        }
    }

    /// Get the resolved configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        self.config.api_key()
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        self.config.api_version()
    }

    /// Get the major API version used in request paths.
    pub fn api_version_major(&self) -> &str {
        self.config.api_version_major()
    }

    /// Get the custom headers sent with every request.
    pub fn custom_headers(&self) -> &CustomHeaders {
        self.config.custom_headers()
    }

    /// Get the endpoint URL.
    pub fn endpoint_url(&self) -> &str {
        self.config.endpoint_url()
    }

    /// Whether rate limited requests should not be retried.
    pub fn no_retry_if_rate_limited(&self) -> bool {
        self.config.no_retry_if_rate_limited()
    }

    /// Get the per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.config.request_timeout()
    }

    /// Get the transport requests are sent through.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        self.config.transport()
    }
}

/// Get a base handle from a client built only from the global defaults and
/// the environment.
///
/// # Errors
///
/// Fails with [`ErrorKind::MissingApiKey`](crate::ErrorKind::MissingApiKey)
/// if no API key has been configured.
pub fn base(base_id: impl Into<String>) -> Result<Base> {
    Ok(Airtable::new(ClientOptions::default())?.base(base_id))
}

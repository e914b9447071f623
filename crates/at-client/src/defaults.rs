//! Process-wide defaults shared by every client that does not override them.
//!
//! [`configure`] replaces the stored [`Defaults`] wholesale; there is no
//! field-by-field merge. Clients built with [`Airtable::new`](crate::Airtable::new)
//! read a snapshot of the registry at construction time. Code that wants to
//! stay independent of this ambient state passes a [`Defaults`] value to
//! [`Airtable::with_defaults`](crate::Airtable::with_defaults) instead.

use std::sync::{LazyLock, PoisonError, RwLock};

/// The layer of configuration between explicit client options and the
/// built-in defaults.
///
/// The API key is redacted in Debug output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    api_key: Option<String>,
    endpoint_url: Option<String>,
    api_version: Option<String>,
    no_retry_if_rate_limited: Option<bool>,
}

impl std::fmt::Debug for Defaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Defaults")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("endpoint_url", &self.endpoint_url)
            .field("api_version", &self.api_version)
            .field("no_retry_if_rate_limited", &self.no_retry_if_rate_limited)
            .finish()
    }
}

impl Defaults {
    /// Create an empty set of defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the endpoint URL.
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Set the API version (e.g., "0.1.0").
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Set whether rate limited requests should not be retried.
    pub fn with_no_retry_if_rate_limited(mut self, no_retry: bool) -> Self {
        self.no_retry_if_rate_limited = Some(no_retry);
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    pub fn no_retry_if_rate_limited(&self) -> Option<bool> {
        self.no_retry_if_rate_limited
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

static GLOBAL_DEFAULTS: LazyLock<RwLock<Defaults>> =
    LazyLock::new(|| RwLock::new(Defaults::default()));

/// Replace the process-wide defaults.
///
/// Every field is overwritten, including with `None`. No validation is done
/// here; a missing key only fails when a client is constructed.
pub fn configure(defaults: Defaults) {
    tracing::debug!(?defaults, "Configuring global Airtable defaults");
    let mut lock = GLOBAL_DEFAULTS
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *lock = defaults;
}

/// Snapshot of the process-wide defaults.
pub fn global_defaults() -> Defaults {
    GLOBAL_DEFAULTS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Return the process-wide defaults to their empty start state.
pub fn reset_global_defaults() {
    configure(Defaults::default());
}

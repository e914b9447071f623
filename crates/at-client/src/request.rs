//! Transport-agnostic HTTP request description.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::error::Result;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Patch => reqwest::Method::PATCH,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Patch => "PATCH",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }
}

/// A request handed to a [`Transport`](crate::Transport).
///
/// Header names are stored as given; a later header with the same name
/// replaces the earlier one.
#[derive(Debug, Clone)]
pub struct Request {
    method: RequestMethod,
    url: String,
    headers: BTreeMap<String, String>,
    body: Option<serde_json::Value>,
    timeout: Option<Duration>,
    retry_if_rate_limited: bool,
}

impl Request {
    /// Create a new request.
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            timeout: None,
            retry_if_rate_limited: true,
        }
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        // Header names are case-insensitive on the wire
        self.headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Set the bearer token for authentication.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Set JSON body.
    ///
    /// A Content-Type header is added unless one is already set.
    pub fn json<T: Serialize>(self, body: &T) -> Result<Self> {
        Ok(self.json_value(serde_json::to_value(body)?))
    }

    /// Set raw JSON body.
    pub fn json_value(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        if self.header_value("Content-Type").is_some() {
            self
        } else {
            self.header("Content-Type", "application/json")
        }
    }

    /// Set the timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set whether a transport may retry this request when rate limited.
    pub fn retry_if_rate_limited(mut self, retry: bool) -> Self {
        self.retry_if_rate_limited = retry;
        self
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Look up a header, ignoring case.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_retry_if_rate_limited(&self) -> bool {
        self.retry_if_rate_limited
    }
}

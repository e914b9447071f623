//! HTTP response handling with Airtable-specific error mapping.

use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, ErrorKind, Result};

/// A fully buffered HTTP response returned by a [`Transport`](crate::Transport).
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl Response {
    /// Create a response. Header names are normalized to lowercase.
    pub fn new(status: u16, headers: HashMap<String, String>, body: impl Into<Bytes>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();

        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Get the Retry-After header as a Duration.
    ///
    /// Only the delay-seconds form is understood.
    pub fn retry_after(&self) -> Option<Duration> {
        self.header("retry-after")?
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get the raw response body.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec()).map_err(|e| {
            Error::with_source(
                ErrorKind::Other("Failed to decode response as UTF-8".to_string()),
                e,
            )
        })
    }

    /// Deserialize the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }

    /// Pass successful responses through and turn everything else into an
    /// [`Error`].
    ///
    /// `no_retry` is recorded on rate limit errors so callers can tell whether
    /// the client opted out of retrying.
    pub fn check_api_error(self, no_retry: bool) -> Result<Response> {
        if self.is_success() {
            return Ok(self);
        }

        if self.status == 429 {
            return Err(Error::new(ErrorKind::RateLimited {
                retry_after: self.retry_after(),
                no_retry,
            }));
        }

        let body = String::from_utf8_lossy(&self.body);
        Err(parse_error_response(self.status, &body))
    }
}

/// `{"error": {"type": "...", "message": "..."}}` or `{"error": "TYPE"}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed {
        #[serde(rename = "type")]
        error_type: String,
        #[serde(default)]
        message: Option<String>,
    },
    Code(String),
}

fn parse_error_response(status: u16, body: &str) -> Error {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        let (error_type, message) = match envelope.error {
            ErrorBody::Detailed {
                error_type,
                message,
            } => (error_type, message.unwrap_or_default()),
            ErrorBody::Code(code) => (code, String::new()),
        };

        return Error::new(ErrorKind::Api {
            status,
            error_type,
            message: sanitize_error_message(&message),
        });
    }

    Error::new(ErrorKind::Http {
        status,
        message: sanitize_error_message(body),
    })
}

static TOKEN_PATTERN: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r"\bkey[A-Za-z0-9]{14}\b|\bpat[A-Za-z0-9]{14}\.[0-9a-fA-F]+\b")
        .expect("token pattern is a valid regex")
});

/// Sanitize an error message to prevent exposing credentials.
///
/// Anything shaped like an Airtable API key or personal access token is
/// replaced, and long messages are truncated.
fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let sanitized = TOKEN_PATTERN.replace_all(message, "[REDACTED_TOKEN]");

    if sanitized.chars().count() > MAX_LENGTH {
        let truncated: String = sanitized.chars().take(MAX_LENGTH).collect();
        format!("{}... (truncated)", truncated)
    } else {
        sanitized.into_owned()
    }
}

//! Pluggable HTTP transport.
//!
//! Every client holds an `Arc<dyn Transport>`. The default is
//! [`HttpTransport`], backed by `reqwest`; tests and embedders can swap in
//! their own implementation through
//! [`ClientOptions::with_transport`](crate::ClientOptions::with_transport).

use std::collections::HashMap;

use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::error::{Error, ErrorKind, Result};
use crate::request::Request;
use crate::response::Response;

/// Performs network I/O for a client.
///
/// Implementations send exactly the request they are given. Status codes are
/// not interpreted here; non-2xx responses are returned as `Ok`.
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send a request and buffer the response.
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Response>>;
}

/// Default transport using `reqwest`, with gzip/deflate support.
///
/// One attempt per request; the request's own timeout is applied.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the crate's User-Agent.
    pub fn new() -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    async fn send(&self, request: Request) -> Result<Response> {
        let mut req = self
            .inner
            .request(request.method().to_reqwest(), request.url());

        for (name, value) in request.headers() {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(timeout) = request.request_timeout() {
            req = req.timeout(timeout);
        }

        if let Some(body) = request.body() {
            req = req.json(body);
        }

        debug!(
            method = request.method().as_str(),
            url = %request.url(),
            "Sending request"
        );

        let response = req.send().await?;

        let status = response.status().as_u16();
        let content_length = response.content_length();
        if response.status().is_success() {
            debug!(status, content_length, "Response received");
        } else {
            info!(status, content_length, "Non-success response");
        }

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response.bytes().await?;

        Ok(Response::new(status, headers, body))
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Response>> {
        Box::pin(self.send(request))
    }
}

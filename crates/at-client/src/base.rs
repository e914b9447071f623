//! Base handle: requests scoped to one Airtable base.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{instrument, warn};
use url::Url;

use crate::airtable::Airtable;
use crate::error::Result;
use crate::request::{Request, RequestMethod};
use crate::response::Response;

/// A handle for one base, bound to the [`Airtable`] client that created it.
///
/// Requests made through the handle use the client's endpoint, API version,
/// credentials, custom headers, timeout and transport.
#[derive(Debug, Clone)]
pub struct Base {
    client: Airtable,
    id: String,
}

impl Base {
    /// Bind a base id to a client.
    pub fn new(client: Airtable, id: impl Into<String>) -> Self {
        Self {
            client,
            id: id.into(),
        }
    }

    /// Get the base id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the client this handle is bound to.
    pub fn client(&self) -> &Airtable {
        &self.client
    }

    /// Build the URL for a path within this base.
    ///
    /// `/` separates path segments; each segment is percent-encoded, so table
    /// names may contain spaces, `#` or `?`.
    ///
    /// Example: `url("Projects")` -> `https://api.airtable.com/v0/appXXX/Projects`
    pub fn url(&self, path: &str) -> String {
        let path = path
            .trim_start_matches('/')
            .split('/')
            .map(urlencoding::encode)
            .collect::<Vec<_>>()
            .join("/");
        let root = format!(
            "{}/v{}/{}",
            self.client.endpoint_url(),
            self.client.api_version_major(),
            self.id
        );

        if path.is_empty() {
            root
        } else {
            format!("{}/{}", root, path)
        }
    }

    /// Build the URL for a path within this base with encoded query
    /// parameters.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::InvalidUrl`](crate::ErrorKind::InvalidUrl) if the
    /// endpoint does not form a valid absolute URL.
    pub fn url_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let mut url = Url::parse(&self.url(path))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url.into())
    }

    /// Create a request for a path within this base, with authentication,
    /// version and custom headers applied.
    ///
    /// Custom headers are applied last and replace built-in headers of the
    /// same name.
    pub fn request(&self, method: RequestMethod, path: &str) -> Request {
        self.request_for_url(method, self.url(path))
    }

    fn request_for_url(&self, method: RequestMethod, url: String) -> Request {
        let mut request = Request::new(method, url)
            .bearer_auth(self.client.api_key())
            .header("x-api-version", self.client.api_version())
            .header("x-airtable-application-id", self.id.as_str())
            .header("Content-Type", "application/json")
            .header("User-Agent", crate::USER_AGENT)
            .timeout(self.client.request_timeout())
            .retry_if_rate_limited(!self.client.no_retry_if_rate_limited());

        for (name, value) in self.client.custom_headers() {
            request = request.header(name.as_str(), value.to_string());
        }

        request
    }

    /// Send a request through the client's transport and check the response
    /// for API errors.
    #[instrument(skip(self, request), fields(base = %self.id, method = request.method().as_str(), url = %request.url()))]
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let no_retry = !request.is_retry_if_rate_limited();
        let response = self.client.transport().execute(request).await?;

        if response.status() == 429 {
            warn!(
                retry_after = ?response.retry_after(),
                no_retry,
                "Rate limited by Airtable"
            );
        }

        response.check_api_error(no_retry)
    }

    /// GET request with query parameters and JSON response deserialization.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.url_with_query(path, query)?;
        let request = self.request_for_url(RequestMethod::Get, url);
        self.execute(request).await?.json()
    }

    /// POST request with JSON body and response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.request(RequestMethod::Post, path).json(body)?;
        self.execute(request).await?.json()
    }

    /// PATCH request with JSON body and response.
    pub async fn patch_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.request(RequestMethod::Patch, path).json(body)?;
        self.execute(request).await?.json()
    }

    /// DELETE request with JSON response.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.request(RequestMethod::Delete, path);
        self.execute(request).await?.json()
    }
}

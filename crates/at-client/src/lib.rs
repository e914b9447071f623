//! # airtable-client
//!
//! Entry point for the Airtable API: configuration resolution, the client,
//! and base handles bound to it.
//!
//! Configuration is resolved once per client from three layers, highest
//! priority first:
//! - Explicit [`ClientOptions`]
//! - Process-wide [`Defaults`] set with [`configure`]
//! - Built-in defaults: `AIRTABLE_ENDPOINT_URL`, `AIRTABLE_API_KEY`, and constants
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Base                               │
//! │  - URL building (/v{major}/{baseId}/...)                    │
//! │  - Auth, version and custom headers                         │
//! │  - API error mapping                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Airtable                             │
//! │  - Immutable resolved ClientConfig                          │
//! │  - Base factory                                             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Transport (HttpTransport)                  │
//! │  - Raw HTTP via reqwest, per-request timeout                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use airtable_client::{configure, Airtable, ClientOptions, Defaults};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), airtable_client::Error> {
//!     // Once, at startup
//!     configure(Defaults::new().with_api_key(std::env::var("MY_KEY").unwrap_or_default()));
//!
//!     let airtable = Airtable::new(ClientOptions::new())?;
//!     let base = airtable.base("appXXXXXXXXXXXXXX");
//!
//!     let page: serde_json::Value = base.get_json("Projects", &[("pageSize", "10")]).await?;
//!     println!("{page}");
//!     Ok(())
//! }
//! ```

mod airtable;
mod base;
mod config;
mod defaults;
mod error;
mod request;
mod response;
mod transport;

pub use airtable::{base, Airtable};
pub use base::Base;
pub use config::{
    ClientConfig, ClientOptions, CustomHeaders, DefaultConfig, HeaderValue, API_KEY_ENV,
    DEFAULT_API_VERSION, DEFAULT_ENDPOINT_URL, DEFAULT_REQUEST_TIMEOUT, ENDPOINT_URL_ENV,
};
pub use defaults::{configure, global_defaults, reset_global_defaults, Defaults};
pub use error::{Error, ErrorKind, Result};
pub use request::{Request, RequestMethod};
pub use response::Response;
pub use transport::{HttpTransport, Transport};

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("airtable-rs/", env!("CARGO_PKG_VERSION"));

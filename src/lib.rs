//! # airtable-api
//!
//! An Airtable API client library for Rust.
//!
//! ## Security
//!
//! - API keys are redacted in Debug output
//! - Tracing/logging never records the API key
//! - Error messages sanitize anything shaped like a credential
//!
//! ## Crates
//!
//! - **airtable-client** - Layered configuration, the `Airtable` client, base handles and the HTTP transport
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use airtable_api::{Airtable, ClientOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     airtable_api::init_tracing();
//!
//!     // Falls back to AIRTABLE_API_KEY when no key is given
//!     let airtable = Airtable::new(ClientOptions::new())?;
//!     let base = airtable.base("appXXXXXXXXXXXXXX");
//!
//!     let records: serde_json::Value = base
//!         .get_json("Projects", &[("maxRecords", "10")])
//!         .await?;
//!     println!("{records}");
//!
//!     Ok(())
//! }
//! ```

// Re-export the core crate for convenient access
pub use airtable_client as client;

// Re-export commonly used types at the top level
pub use airtable_client::{
    base, configure, global_defaults, reset_global_defaults, Airtable, Base, ClientConfig,
    ClientOptions, Defaults, Error, ErrorKind, HttpTransport, Result, Transport,
};

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default: `info`).
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

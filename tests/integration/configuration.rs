//! Configuration layering across the public API.

use std::sync::Arc;
use std::time::Duration;

use airtable_api::client::{ClientConfig, API_KEY_ENV, DEFAULT_ENDPOINT_URL};
use airtable_api::{configure, global_defaults, Airtable, ClientOptions, Defaults, HttpTransport};

use super::common::{empty_environment, lock_registry};

fn global_k1() -> Defaults {
    Defaults::new()
        .with_api_key("k1")
        .with_endpoint_url("https://x")
        .with_api_version("1.2.3")
        .with_no_retry_if_rate_limited(true)
}

#[test]
fn test_api_key_only_uses_builtin_defaults() {
    let config = ClientConfig::resolve(
        ClientOptions::new().with_api_key("keyABC"),
        &Defaults::new(),
        &empty_environment(),
    )
    .expect("api key was provided");

    assert_eq!(config.api_version(), "0.1.0");
    assert_eq!(config.endpoint_url(), DEFAULT_ENDPOINT_URL);
    assert!(!config.no_retry_if_rate_limited());
    assert_eq!(config.request_timeout(), Duration::from_millis(300_000));
}

#[test]
fn test_missing_api_key_everywhere_fails() {
    let err = ClientConfig::resolve(ClientOptions::new(), &Defaults::new(), &empty_environment())
        .unwrap_err();

    assert!(err.is_missing_api_key());
    assert!(err.to_string().contains("API key is required"));
}

#[test]
fn test_new_and_static_base_fail_without_any_api_key() {
    let _guard = lock_registry();
    if std::env::var(API_KEY_ENV).is_ok_and(|key| !key.is_empty()) {
        eprintln!("skipping: {API_KEY_ENV} is set");
        return;
    }

    let err = Airtable::new(ClientOptions::new()).unwrap_err();
    assert!(err.is_missing_api_key());

    let err = airtable_api::base("app1").unwrap_err();
    assert!(err.is_missing_api_key());
}

#[test]
fn test_global_configure_feeds_new_clients() {
    let _guard = lock_registry();
    configure(global_k1());

    let airtable = Airtable::new(ClientOptions::new()).unwrap();
    assert_eq!(airtable.api_key(), "k1");
    assert_eq!(airtable.api_version_major(), "1");
    assert!(airtable.no_retry_if_rate_limited());

    let snapshot = global_defaults();
    assert_eq!(snapshot.api_key(), Some("k1"));
    assert_eq!(snapshot.endpoint_url(), Some("https://x"));
    assert_eq!(snapshot.api_version(), Some("1.2.3"));
    assert_eq!(snapshot.no_retry_if_rate_limited(), Some(true));
}

#[test]
fn test_explicit_options_win_over_global() {
    let _guard = lock_registry();
    configure(global_k1());

    let airtable = Airtable::new(ClientOptions::new().with_api_key("k2")).unwrap();
    assert_eq!(airtable.api_key(), "k2");
    assert_eq!(airtable.endpoint_url(), "https://x");

    let airtable = Airtable::new(ClientOptions::new().with_no_retry_if_rate_limited(false)).unwrap();
    assert!(!airtable.no_retry_if_rate_limited());
}

#[test]
fn test_clients_keep_configuration_after_reconfigure() {
    let _guard = lock_registry();
    configure(global_k1());
    let before = Airtable::new(ClientOptions::new()).unwrap();

    configure(Defaults::new().with_api_key("k9").with_endpoint_url("https://y"));
    let after = Airtable::new(ClientOptions::new()).unwrap();

    assert_eq!(before.api_key(), "k1");
    assert_eq!(before.endpoint_url(), "https://x");
    assert_eq!(after.api_key(), "k9");
    assert_eq!(after.endpoint_url(), "https://y");
    // Fields omitted by the second configure are cleared, not merged
    assert_eq!(after.api_version(), "0.1.0");
    assert!(!after.no_retry_if_rate_limited());
}

#[test]
fn test_injected_defaults_ignore_global_registry() {
    let _guard = lock_registry();
    configure(global_k1());

    let tenant = Defaults::new()
        .with_api_key("tenantKey")
        .with_endpoint_url("https://tenant.example");
    let airtable = Airtable::with_defaults(ClientOptions::new(), &tenant).unwrap();

    assert_eq!(airtable.api_key(), "tenantKey");
    assert_eq!(airtable.endpoint_url(), "https://tenant.example");
    assert_eq!(airtable.api_version(), "0.1.0");
}

#[test]
fn test_static_base_shorthand() {
    let _guard = lock_registry();
    configure(global_k1());

    let base = airtable_api::base("baseId123").unwrap();
    assert_eq!(base.id(), "baseId123");
    assert_eq!(base.client().api_key(), "k1");
    assert_eq!(base.url("Table"), "https://x/v1/baseId123/Table");
}

#[test]
fn test_default_config_is_side_effect_free() {
    let _guard = lock_registry();

    assert_eq!(Airtable::default_config(), Airtable::default_config());
    assert!(global_defaults().is_empty());
}

#[test]
fn test_base_handle_shares_client_transport() {
    let transport: Arc<dyn airtable_api::Transport> = Arc::new(HttpTransport::new().unwrap());
    let airtable = Airtable::with_defaults(
        ClientOptions::new()
            .with_api_key("k")
            .with_transport(transport.clone())
            .with_request_timeout(Duration::from_secs(42)),
        &Defaults::new(),
    )
    .unwrap();

    let base = airtable.base("baseId123");
    assert!(Arc::ptr_eq(base.client().transport(), &transport));
    assert_eq!(base.client().request_timeout(), Duration::from_secs(42));
}

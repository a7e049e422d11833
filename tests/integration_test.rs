use nasa_data_guide::{AdapterError, AdapterErrorKind, Config, Error};

#[tokio::test]
async fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.server.port, 5001);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(
        config.dataset_search.endpoint,
        "https://cmr.earthdata.nasa.gov/search/collections.json"
    );
    assert_eq!(config.dataset_search.page_size, 5);
    assert_eq!(config.dataset_search.sort_key, "-score");
    assert_eq!(config.explanation.timeout_secs, 20);
    assert!(config.server.allowed_origins.is_empty());
}

#[tokio::test]
async fn test_config_validation() {
    let mut config = Config::default();

    // Valid config should pass
    assert!(config.validate().is_ok());

    // Empty host
    config.server.host = String::new();
    assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));
    config.server.host = "127.0.0.1".to_string();

    // Page size above the CMR limit
    config.dataset_search.page_size = 5000;
    assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));
    config.dataset_search.page_size = 5;

    // Zero timeout
    config.dataset_search.timeout_secs = 0;
    assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));
    config.dataset_search.timeout_secs = 30;

    // Empty model
    config.explanation.model = " ".to_string();
    assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));
    config.explanation.model = "gemini-1.5-flash-latest".to_string();

    // Bad CORS origin
    config.server.allowed_origins = vec!["localhost:3000".to_string()];
    assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));
}

#[test]
fn test_config_deserialization_uses_defaults() {
    let config: Config = serde_json::from_str(r#"{"server": {"port": 8080}}"#).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.dataset_search.page_size, 5);
}

#[test]
fn test_error_chain() {
    let err = Error::InvalidInput {
        field: "test_field".to_string(),
        reason: "test error".to_string(),
    };
    assert_eq!(format!("{err}"), "Invalid input: test_field - test error");

    let err: Error = AdapterError::MissingCredential { service: "gemini" }.into();
    assert_eq!(
        format!("{err}"),
        "Adapter error: gemini credential is not configured"
    );
    assert!(matches!(
        err,
        Error::Adapter(ref inner) if inner.kind() == AdapterErrorKind::ConfigurationMissing
    ));
}

#[test]
fn test_package_metadata() {
    assert_eq!(env!("CARGO_PKG_NAME"), "nasa-data-guide");
    assert_eq!(env!("CARGO_PKG_AUTHORS"), "nasa-data-guide contributors");
}

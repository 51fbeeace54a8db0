//! Integration tests for logging system

use core_runtime::logging::{
    init_logging, redact_if_sensitive, strip_path, LogFormat, LogLevel, LoggingConfig,
};

#[test]
fn test_logging_config_from_cli_flags() {
    let format: LogFormat = "json".parse().unwrap();
    let config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::from_verbosity(2));

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, LogLevel::Trace);
    assert!(config.filter.is_none());
}

#[test]
fn test_credentials_never_pass_through() {
    for field in ["access_token", "password", "Authorization", "client_secret"] {
        assert_eq!(redact_if_sensitive(field, "value"), "[REDACTED]");
    }

    let redacted = redact_if_sensitive("username", "uploader@example.com");
    assert!(!redacted.contains("example.com"));
}

#[test]
fn test_image_names_pass_through() {
    assert_eq!(redact_if_sensitive("file", "12345.jpg"), "12345.jpg");
    assert_eq!(redact_if_sensitive("collection", "products_tn"), "products_tn");
}

#[test]
fn test_path_stripping() {
    assert_eq!(strip_path("/srv/images/12345.jpg"), "12345.jpg");
    assert_eq!(strip_path("D:\\images\\tn_12345.jpg"), "tn_12345.jpg");
    assert_eq!(strip_path("12345.jpg"), "12345.jpg");
    assert_eq!(strip_path(""), "");
}

#[test]
fn test_init_logging_only_once() {
    // Each integration test binary is its own process, so this is the only
    // subscriber installed here.
    let config = LoggingConfig::default().with_level(LogLevel::Debug);
    assert!(init_logging(config.clone()).is_ok());
    assert!(init_logging(config).is_err());

    tracing::info!(file = %strip_path("/srv/images/12345.jpg"), "Logging initialized");
}

//! Integration tests for loading `appsettings.json` from disk

use core_runtime::config::{UploaderConfig, DEFAULT_CONFIG_FILE};
use core_runtime::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const SETTINGS: &str = r#"{
    "ImageSourcePath": "/srv/images",
    "IAM": {
        "Url": "https://iam.example.com",
        "Username": "uploader",
        "Password": "hunter2",
        "Realm": "shop",
        "ClientId": "image-uploader"
    },
    "FileserverApi": { "Url": "http://localhost:3000" },
    "Upload": {
        "ThumbnailHeight": 200,
        "RequestTimeoutSecs": 10
    }
}"#;

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_CONFIG_FILE);
    fs::write(&path, SETTINGS).unwrap();

    let config = UploaderConfig::load(&path).unwrap();

    assert_eq!(config.image_source_path, PathBuf::from("/srv/images"));
    assert_eq!(config.iam.realm, "shop");
    assert_eq!(config.iam.client_id, "image-uploader");
    assert_eq!(config.fileserver_api.url, "http://localhost:3000");
    assert_eq!(config.upload.thumbnail_height, 200);
    assert_eq!(config.upload.image_extension, "jpg");
    assert_eq!(config.request_timeout(), Duration::from_secs(10));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.json");

    let err = UploaderConfig::load(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound(p) if p == path));
}

#[test]
fn test_directory_is_not_a_config_file() {
    let dir = tempfile::tempdir().unwrap();

    let err = UploaderConfig::load(dir.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound(_)));
}

#[test]
fn test_invalid_values_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_CONFIG_FILE);
    fs::write(&path, SETTINGS.replace("http://localhost:3000", "not a url")).unwrap();

    let err = UploaderConfig::load(&path).unwrap_err();
    assert!(matches!(err, Error::Config(msg) if msg.contains("FileserverApi.Url")));
}

#[test]
fn test_truncated_file_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_CONFIG_FILE);
    fs::write(&path, &SETTINGS[..40]).unwrap();

    assert!(matches!(
        UploaderConfig::load(&path),
        Err(Error::Config(_))
    ));
}

//! # Uploader Configuration
//!
//! Provides configuration management for the image uploader.
//!
//! ## Overview
//!
//! Configuration lives in a JSON file (`appsettings.json` by default) with
//! PascalCase keys:
//!
//! ```json
//! {
//!   "ImageSourcePath": "/srv/images",
//!   "IAM": {
//!     "Url": "https://iam.example.com",
//!     "Username": "uploader",
//!     "Password": "secret",
//!     "Realm": "shop",
//!     "ClientId": "image-uploader"
//!   },
//!   "FileserverApi": { "Url": "http://localhost:3000" },
//!   "Upload": { "ThumbnailHeight": 300 }
//! }
//! ```
//!
//! The `Upload` section and each of its keys are optional. The file is read
//! once into an [`UploaderConfig`], validated, and then passed by reference
//! to the components that need it.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::UploaderConfig;
//!
//! let config = UploaderConfig::load("appsettings.json")?;
//! println!("Uploading from {}", config.image_source_path.display());
//! ```
//!
//! Tests and embedders can skip the file entirely:
//!
//! ```
//! use core_runtime::config::{IamConfig, UploaderConfig};
//!
//! let config = UploaderConfig::builder()
//!     .image_source_path("/srv/images")
//!     .iam(IamConfig {
//!         url: "https://iam.example.com".to_string(),
//!         username: "uploader".to_string(),
//!         password: "secret".to_string(),
//!         realm: "shop".to_string(),
//!         client_id: "image-uploader".to_string(),
//!     })
//!     .fileserver_url("http://localhost:3000")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.upload.thumbnail_height, 300);
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default configuration file name, resolved against the working directory
pub const DEFAULT_CONFIG_FILE: &str = "appsettings.json";

const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Tallest thumbnail `validate` accepts
const MAX_THUMBNAIL_HEIGHT: u32 = 4096;

/// Top-level uploader configuration.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploaderConfig {
    /// Directory scanned (non-recursively) for product images
    pub image_source_path: PathBuf,

    /// Identity provider settings
    #[serde(rename = "IAM")]
    pub iam: IamConfig,

    /// File server settings
    pub fileserver_api: FileserverConfig,

    /// Upload pipeline tuning
    #[serde(default)]
    pub upload: UploadSettings,
}

/// Identity provider (OpenID Connect realm) settings.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct IamConfig {
    /// Base URL of the identity provider
    pub url: String,
    pub username: String,
    pub password: String,
    pub realm: String,
    pub client_id: String,
}

impl fmt::Debug for IamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .finish()
    }
}

/// File server settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct FileserverConfig {
    /// Base URL of the file server API
    pub url: String,
}

/// Upload pipeline settings. Every key is optional.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct UploadSettings {
    /// Extension (without dot) restricting the directory scan
    pub image_extension: String,

    /// Fixed thumbnail height in pixels
    pub thumbnail_height: u32,

    /// Remote collection receiving originals
    pub originals_collection: String,

    /// Remote collection receiving thumbnails
    pub thumbnails_collection: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Remove the local thumbnail even when its upload failed
    pub cleanup_thumbnail_on_failure: bool,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            image_extension: "jpg".to_string(),
            thumbnail_height: 300,
            originals_collection: "products".to_string(),
            thumbnails_collection: "products_tn".to_string(),
            request_timeout_secs: 30,
            cleanup_thumbnail_on_failure: true,
        }
    }
}

impl fmt::Debug for UploaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploaderConfig")
            .field("image_source_path", &self.image_source_path)
            .field("iam", &self.iam)
            .field("fileserver_api", &self.fileserver_api)
            .field("upload", &self.upload)
            .finish()
    }
}

impl UploaderConfig {
    /// Creates a new builder for constructing an `UploaderConfig`.
    pub fn builder() -> UploaderConfigBuilder {
        UploaderConfigBuilder::default()
    }

    /// Reads, parses and validates the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigNotFound`] if the file does not exist
    /// - [`Error::Config`] if it cannot be read, is not valid JSON, misses a
    ///   required key, or fails validation
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parses and validates configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: UploaderConfig = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Malformed configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces the image source directory (command-line override).
    pub fn with_image_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_source_path = path.into();
        self
    }

    /// Per-request timeout applied to every identity and file server call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.upload.request_timeout_secs)
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The source path and all IAM fields are non-empty
    /// - Both base URLs parse as absolute http(s) URLs
    /// - Collection names and the scan extension are non-empty path-safe segments
    /// - Thumbnail height is greater than 0
    /// - Request timeout is within 1..=600 seconds
    pub fn validate(&self) -> Result<()> {
        if self.image_source_path.as_os_str().is_empty() {
            return Err(Error::Config("ImageSourcePath cannot be empty".to_string()));
        }

        validate_base_url("IAM.Url", &self.iam.url)?;
        validate_base_url("FileserverApi.Url", &self.fileserver_api.url)?;

        for (name, value) in [
            ("IAM.Username", &self.iam.username),
            ("IAM.Password", &self.iam.password),
            ("IAM.Realm", &self.iam.realm),
            ("IAM.ClientId", &self.iam.client_id),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} cannot be empty", name)));
            }
        }

        for (name, value) in [
            ("Upload.ImageExtension", &self.upload.image_extension),
            ("Upload.OriginalsCollection", &self.upload.originals_collection),
            ("Upload.ThumbnailsCollection", &self.upload.thumbnails_collection),
        ] {
            validate_segment(name, value)?;
        }

        if self.upload.originals_collection == self.upload.thumbnails_collection {
            return Err(Error::Config(
                "Upload.OriginalsCollection and Upload.ThumbnailsCollection must differ"
                    .to_string(),
            ));
        }

        if self.upload.thumbnail_height == 0
            || self.upload.thumbnail_height > MAX_THUMBNAIL_HEIGHT
        {
            return Err(Error::Config(format!(
                "Upload.ThumbnailHeight must be between 1 and {}",
                MAX_THUMBNAIL_HEIGHT
            )));
        }

        if self.upload.request_timeout_secs == 0
            || self.upload.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS
        {
            return Err(Error::Config(format!(
                "Upload.RequestTimeoutSecs must be between 1 and {}",
                MAX_REQUEST_TIMEOUT_SECS
            )));
        }

        Ok(())
    }
}

fn validate_base_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| Error::Config(format!("{} is not a valid URL ('{}'): {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::Config(format!(
            "{} must use http or https, got '{}'",
            name,
            url.scheme()
        )));
    }

    Ok(())
}

fn validate_segment(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Config(format!("{} cannot be empty", name)));
    }
    if value.contains(['/', '\\', '.', '?', '#']) {
        return Err(Error::Config(format!(
            "{} must be a single path segment, got '{}'",
            name, value
        )));
    }
    Ok(())
}

/// Builder for constructing [`UploaderConfig`] instances.
///
/// Use this builder to incrementally set configuration options and then
/// call [`build()`](UploaderConfigBuilder::build) to create the final config.
#[derive(Default)]
pub struct UploaderConfigBuilder {
    image_source_path: Option<PathBuf>,
    iam: Option<IamConfig>,
    fileserver_url: Option<String>,
    upload: UploadSettings,
}

impl UploaderConfigBuilder {
    /// Sets the image source directory.
    pub fn image_source_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.image_source_path = Some(path.into());
        self
    }

    /// Sets the identity provider settings.
    pub fn iam(mut self, iam: IamConfig) -> Self {
        self.iam = Some(iam);
        self
    }

    /// Sets the file server base URL.
    pub fn fileserver_url(mut self, url: impl Into<String>) -> Self {
        self.fileserver_url = Some(url.into());
        self
    }

    /// Sets the fixed thumbnail height.
    ///
    /// Default: 300
    pub fn thumbnail_height(mut self, height: u32) -> Self {
        self.upload.thumbnail_height = height;
        self
    }

    /// Sets the extension that restricts the directory scan.
    ///
    /// Default: `jpg`
    pub fn image_extension(mut self, extension: impl Into<String>) -> Self {
        self.upload.image_extension = extension.into();
        self
    }

    /// Sets the per-request timeout.
    ///
    /// Default: 30 seconds
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.upload.request_timeout_secs = secs;
        self
    }

    /// Keeps or removes the thumbnail when its upload failed.
    ///
    /// Default: true (removed)
    pub fn cleanup_thumbnail_on_failure(mut self, cleanup: bool) -> Self {
        self.upload.cleanup_thumbnail_on_failure = cleanup;
        self
    }

    /// Replaces all upload settings at once.
    pub fn upload(mut self, upload: UploadSettings) -> Self {
        self.upload = upload;
        self
    }

    /// Builds the final `UploaderConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or validation fails.
    pub fn build(self) -> Result<UploaderConfig> {
        let image_source_path = self.image_source_path.ok_or_else(|| {
            Error::Config(
                "Image source path is required. Use .image_source_path() to set it.".to_string(),
            )
        })?;

        let iam = self.iam.ok_or_else(|| {
            Error::Config("IAM settings are required. Use .iam() to set them.".to_string())
        })?;

        let fileserver_url = self.fileserver_url.ok_or_else(|| {
            Error::Config(
                "File server URL is required. Use .fileserver_url() to set it.".to_string(),
            )
        })?;

        let config = UploaderConfig {
            image_source_path,
            iam,
            fileserver_api: FileserverConfig {
                url: fileserver_url,
            },
            upload: self.upload,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"{
        "ImageSourcePath": "/srv/images",
        "IAM": {
            "Url": "https://iam.example.com",
            "Username": "uploader",
            "Password": "hunter2",
            "Realm": "shop",
            "ClientId": "image-uploader"
        },
        "FileserverApi": { "Url": "http://localhost:3000" }
    }"#;

    fn iam() -> IamConfig {
        IamConfig {
            url: "https://iam.example.com".to_string(),
            username: "uploader".to_string(),
            password: "hunter2".to_string(),
            realm: "shop".to_string(),
            client_id: "image-uploader".to_string(),
        }
    }

    fn builder() -> UploaderConfigBuilder {
        UploaderConfig::builder()
            .image_source_path("/srv/images")
            .iam(iam())
            .fileserver_url("http://localhost:3000")
    }

    #[test]
    fn test_parse_minimal_document_uses_defaults() {
        let config = UploaderConfig::from_json_str(FULL_CONFIG).unwrap();

        assert_eq!(config.image_source_path, PathBuf::from("/srv/images"));
        assert_eq!(config.iam, iam());
        assert_eq!(config.fileserver_api.url, "http://localhost:3000");
        assert_eq!(config.upload, UploadSettings::default());
        assert_eq!(config.upload.originals_collection, "products");
        assert_eq!(config.upload.thumbnails_collection, "products_tn");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_partial_upload_section() {
        let json = FULL_CONFIG.replacen(
            r#""FileserverApi""#,
            r#""Upload": { "ThumbnailHeight": 150, "CleanupThumbnailOnFailure": false }, "FileserverApi""#,
            1,
        );

        let config = UploaderConfig::from_json_str(&json).unwrap();
        assert_eq!(config.upload.thumbnail_height, 150);
        assert!(!config.upload.cleanup_thumbnail_on_failure);
        assert_eq!(config.upload.image_extension, "jpg");
    }

    #[test]
    fn test_missing_section_is_config_error() {
        let json = r#"{ "ImageSourcePath": "/srv/images", "FileserverApi": { "Url": "http://x" } }"#;
        let err = UploaderConfig::from_json_str(json).unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("IAM"));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = UploaderConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = builder().build().unwrap();
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_builder_requires_source_path() {
        let result = UploaderConfig::builder()
            .iam(iam())
            .fileserver_url("http://localhost:3000")
            .build();

        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("image_source_path")));
    }

    #[test]
    fn test_builder_requires_fileserver_url() {
        let result = UploaderConfig::builder()
            .image_source_path("/srv/images")
            .iam(iam())
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_invalid_urls() {
        let result = UploaderConfig::builder()
            .image_source_path("/srv/images")
            .iam(iam())
            .fileserver_url("localhost:3000/api")
            .build();
        assert!(result.is_err());

        let mut bad_iam = iam();
        bad_iam.url = "ftp://iam.example.com".to_string();
        let result = builder().iam(bad_iam).build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("http or https")));
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        let mut bad_iam = iam();
        bad_iam.password = "  ".to_string();

        let result = builder().iam(bad_iam).build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("IAM.Password")));
    }

    #[test]
    fn test_validate_thumbnail_height_bounds() {
        assert!(builder().thumbnail_height(0).build().is_err());
        assert!(builder().thumbnail_height(4096).build().is_ok());

        let result = builder().thumbnail_height(30_000).build();
        assert!(
            matches!(result, Err(Error::Config(msg)) if msg.contains("Upload.ThumbnailHeight"))
        );
    }

    #[test]
    fn test_validate_timeout_bounds() {
        assert!(builder().request_timeout_secs(0).build().is_err());
        assert!(builder().request_timeout_secs(601).build().is_err());
        assert!(builder().request_timeout_secs(600).build().is_ok());
    }

    #[test]
    fn test_validate_collections() {
        let mut upload = UploadSettings::default();
        upload.thumbnails_collection = "products".to_string();
        assert!(builder().upload(upload).build().is_err());

        let mut upload = UploadSettings::default();
        upload.originals_collection = "products/../admin".to_string();
        assert!(builder().upload(upload).build().is_err());
    }

    #[test]
    fn test_source_path_override() {
        let config = builder()
            .build()
            .unwrap()
            .with_image_source_path("/mnt/other");

        assert_eq!(config.image_source_path, PathBuf::from("/mnt/other"));
    }
}

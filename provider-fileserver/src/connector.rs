//! File server API connector implementation
//!
//! Implements the `ImageStore` trait over the `HttpClient` and
//! `FileSystemAccess` bridges.

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, MultipartFile};
use bridge_traits::storage::FileSystemAccess;
use core_auth::BearerToken;
use core_runtime::config::UploaderConfig;
use core_runtime::logging::strip_path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::error::{FileserverError, Result};
use crate::types::{Collection, FileListResponse, RemoteFileSet, UploadTarget};

/// Multipart field the server reads the file from
const UPLOAD_FIELD: &str = "image";

/// Content type announced for every uploaded part
const UPLOAD_CONTENT_TYPE: &str = "application/octet-stream";

/// Remote image storage as seen by the sync pipeline.
///
/// Both operations absorb their failures; see the crate docs.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Snapshot the file names stored in `collection`.
    async fn list_files(&self, collection: Collection) -> RemoteFileSet;

    /// Upload the file at `target.path` into `target.collection`.
    ///
    /// Returns `true` only when the server accepted the upload with a 2xx status.
    async fn upload(&self, target: &UploadTarget, token: &BearerToken) -> bool;
}

/// File server API connector
///
/// # Example
///
/// ```ignore
/// use provider_fileserver::{Collection, FileserverConnector, ImageStore};
///
/// let connector = FileserverConnector::new(http_client, fs, "http://localhost:3000")?;
/// let remote = connector.list_files(Collection::Originals).await;
/// ```
pub struct FileserverConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Local file access for reading upload bodies
    fs: Arc<dyn FileSystemAccess>,

    base_url: Url,
    originals: String,
    thumbnails: String,
    timeout: Option<Duration>,
}

impl FileserverConnector {
    /// Create a connector with the default `products` / `products_tn`
    /// collections.
    ///
    /// # Errors
    ///
    /// Returns [`FileserverError::InvalidConfig`] if `base_url` does not parse
    /// or cannot carry a path.
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        fs: Arc<dyn FileSystemAccess>,
        base_url: &str,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FileserverError::InvalidConfig(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FileserverError::InvalidConfig(base_url.to_string()));
        }

        Ok(Self {
            http_client,
            fs,
            base_url,
            originals: "products".to_string(),
            thumbnails: "products_tn".to_string(),
            timeout: None,
        })
    }

    /// Create a connector from the loaded configuration.
    pub fn from_config(
        config: &UploaderConfig,
        http_client: Arc<dyn HttpClient>,
        fs: Arc<dyn FileSystemAccess>,
    ) -> Result<Self> {
        Ok(Self::new(http_client, fs, &config.fileserver_api.url)?
            .with_collections(
                config.upload.originals_collection.clone(),
                config.upload.thumbnails_collection.clone(),
            )
            .with_timeout(config.request_timeout()))
    }

    pub fn with_collections(
        mut self,
        originals: impl Into<String>,
        thumbnails: impl Into<String>,
    ) -> Self {
        self.originals = originals.into();
        self.thumbnails = thumbnails.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn collection_name(&self, collection: Collection) -> &str {
        match collection {
            Collection::Originals => &self.originals,
            Collection::Thumbnails => &self.thumbnails,
        }
    }

    /// `{base}/images/{collection}`
    pub fn collection_url(&self, collection: Collection) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["images", self.collection_name(collection)]);
        }
        url.to_string()
    }

    fn request(&self, method: HttpMethod, collection: Collection) -> HttpRequest {
        let request = HttpRequest::new(method, self.collection_url(collection));
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// Fetch the listing of `collection`, propagating every failure.
    #[instrument(skip(self))]
    pub async fn fetch_inventory(&self, collection: Collection) -> Result<Vec<String>> {
        let request = self
            .request(HttpMethod::Get, collection)
            .header("Accept", "application/json");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| FileserverError::NetworkError(e.to_string()))?;

        if !response.is_success() {
            return Err(FileserverError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            });
        }

        let listing: FileListResponse = response
            .json()
            .map_err(|e| FileserverError::ParseError(e.to_string()))?;

        debug!(count = listing.files.len(), "Fetched remote inventory");
        Ok(listing.files)
    }

    /// Upload `target`, propagating every failure.
    #[instrument(skip(self, token), fields(file = %strip_path(&target.path.to_string_lossy())))]
    pub async fn try_upload(&self, target: &UploadTarget, token: &BearerToken) -> Result<()> {
        let file_name = target
            .file_name()
            .ok_or_else(|| FileserverError::InvalidTarget(target.path.display().to_string()))?
            .to_string();

        let data = self.fs.read_file(&target.path).await?;
        debug!(size = data.len(), "Read upload body");

        let request = self
            .request(HttpMethod::Post, target.collection)
            .bearer_token(token.as_str())
            .multipart_file(MultipartFile {
                field_name: UPLOAD_FIELD.to_string(),
                file_name,
                content_type: UPLOAD_CONTENT_TYPE.to_string(),
                data,
            });

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| FileserverError::NetworkError(e.to_string()))?;

        if !response.is_success() {
            return Err(FileserverError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ImageStore for FileserverConnector {
    async fn list_files(&self, collection: Collection) -> RemoteFileSet {
        match self.fetch_inventory(collection).await {
            Ok(files) => {
                info!(
                    collection = self.collection_name(collection),
                    count = files.len(),
                    "Listed remote files"
                );
                RemoteFileSet::from_names(files)
            }
            Err(e) => {
                warn!(
                    collection = self.collection_name(collection),
                    error = %e,
                    "Remote listing unavailable, treating collection as empty"
                );
                RemoteFileSet::degraded()
            }
        }
    }

    async fn upload(&self, target: &UploadTarget, token: &BearerToken) -> bool {
        let file = strip_path(&target.path.to_string_lossy()).to_string();
        let collection = self.collection_name(target.collection);

        match self.try_upload(target, token).await {
            Ok(()) => {
                info!(file = %file, collection, "Uploaded");
                true
            }
            Err(FileserverError::ApiError {
                status_code,
                message,
            }) => {
                warn!(file = %file, collection, status = status_code, body = %message, "Upload rejected");
                false
            }
            Err(e) => {
                error!(file = %file, collection, error = %e, "Upload failed");
                false
            }
        }
    }
}

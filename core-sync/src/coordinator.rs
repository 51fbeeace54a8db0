//! # Sync Coordinator
//!
//! Drives one reconciliation pass from the local image directory to the
//! file server.
//!
//! ## Workflow
//!
//! 1. Scan the source directory for eligible images
//! 2. Obtain a bearer token from the `TokenProvider`
//! 3. Snapshot the remote originals collection (once per run)
//! 4. For each local image, in scan order:
//!    - skip it if the snapshot already contains its name
//!    - upload the original
//!    - generate `tn_<name>` next to it
//!    - upload the thumbnail
//!    - delete the thumbnail
//! 5. Report
//!
//! Any failed step in 2 or 4 aborts the run at that point. Images uploaded
//! before the failure stay on the server; the next run skips them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::{SyncConfig, SyncCoordinator};
//! use std::sync::Arc;
//!
//! let coordinator = SyncCoordinator::new(
//!     SyncConfig::from_uploader_config(&config),
//!     fs,
//!     token_provider,
//!     image_store,
//! );
//!
//! let report = coordinator.run().await?;
//! if !report.is_success() {
//!     eprintln!("Stopped at {:?}", report.aborted_at);
//! }
//! ```

use crate::{
    job::{AbortReason, SyncPhase, SyncReport},
    scanner::{scan_source_directory, LocalImage},
    thumbnail::{thumbnail_path, ThumbnailGenerator, DEFAULT_THUMBNAIL_HEIGHT},
    Result,
};
use bridge_traits::storage::FileSystemAccess;
use core_auth::{BearerToken, TokenProvider};
use core_runtime::config::UploaderConfig;
use core_runtime::logging::strip_path;
use provider_fileserver::{Collection, ImageStore, RemoteFileSet, UploadTarget};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Settings for a reconciliation run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Directory holding the product images
    pub source_dir: PathBuf,
    /// Extension restricting the scan (without dot)
    pub image_extension: String,
    /// Fixed thumbnail height
    pub thumbnail_height: u32,
    /// Delete the thumbnail even when its upload failed
    pub cleanup_thumbnail_on_failure: bool,
}

impl SyncConfig {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            image_extension: "jpg".to_string(),
            thumbnail_height: DEFAULT_THUMBNAIL_HEIGHT,
            cleanup_thumbnail_on_failure: true,
        }
    }

    pub fn from_uploader_config(config: &UploaderConfig) -> Self {
        Self {
            source_dir: config.image_source_path.clone(),
            image_extension: config.upload.image_extension.clone(),
            thumbnail_height: config.upload.thumbnail_height,
            cleanup_thumbnail_on_failure: config.upload.cleanup_thumbnail_on_failure,
        }
    }
}

/// Reconciliation driver
///
/// Owns no state between runs; every call to [`run`](Self::run) starts
/// from scratch.
pub struct SyncCoordinator {
    config: SyncConfig,
    fs: Arc<dyn FileSystemAccess>,
    token_provider: Arc<dyn TokenProvider>,
    image_store: Arc<dyn ImageStore>,
    thumbnails: ThumbnailGenerator,
}

impl SyncCoordinator {
    pub fn new(
        config: SyncConfig,
        fs: Arc<dyn FileSystemAccess>,
        token_provider: Arc<dyn TokenProvider>,
        image_store: Arc<dyn ImageStore>,
    ) -> Self {
        let thumbnails = ThumbnailGenerator::new(config.thumbnail_height);
        Self {
            config,
            fs,
            token_provider,
            image_store,
            thumbnails,
        }
    }

    /// Execute one reconciliation pass.
    ///
    /// Authentication and per-item failures are not errors: they end the
    /// run in [`SyncPhase::Aborted`] and are described by the report.
    ///
    /// # Errors
    ///
    /// - [`SyncError::SourceDirectoryMissing`](crate::SyncError::SourceDirectoryMissing)
    ///   if the source directory does not exist
    /// - [`SyncError::Bridge`](crate::SyncError::Bridge) if it cannot be read
    #[instrument(skip(self), fields(source_dir = %self.config.source_dir.display()))]
    pub async fn run(&self) -> Result<SyncReport> {
        let mut report = SyncReport::new();

        // Phase 1: local scan
        report.transition(SyncPhase::ScanLocal)?;
        let images = scan_source_directory(
            self.fs.as_ref(),
            &self.config.source_dir,
            &self.config.image_extension,
        )
        .await?;
        report.scanned = images.len();
        info!(count = images.len(), "Phase 1: found eligible local images");

        // Phase 2: authenticate
        report.transition(SyncPhase::Authenticate)?;
        let token = match self.token_provider.obtain_token().await {
            Ok(token) => token,
            Err(e) => {
                error!(error = %e, "Phase 2: authentication failed, aborting");
                report.abort(None, AbortReason::Authentication(e.to_string()))?;
                return Ok(report);
            }
        };
        info!("Phase 2: authenticated");

        // Phase 3: remote snapshot
        report.transition(SyncPhase::ListRemote)?;
        let remote = self.image_store.list_files(Collection::Originals).await;
        report.remote_degraded = remote.is_degraded();
        if remote.is_degraded() {
            warn!("Phase 3: remote listing unavailable, every local image will be uploaded");
        } else {
            info!(count = remote.len(), "Phase 3: listed remote originals");
        }

        // Phase 4: per-item processing
        for image in &images {
            report.transition(SyncPhase::ProcessItem)?;

            if let Err(reason) = self.process_item(image, &remote, &token, &mut report).await {
                error!(file = %image.file_name, reason = %reason, "Aborting run");
                report.abort(Some(image.file_name.as_str()), reason)?;
                return Ok(report);
            }
        }

        report.transition(SyncPhase::Done)?;
        info!(
            scanned = report.scanned,
            skipped = report.skipped,
            uploaded = report.uploaded,
            "Run complete"
        );

        Ok(report)
    }

    async fn process_item(
        &self,
        image: &LocalImage,
        remote: &RemoteFileSet,
        token: &BearerToken,
        report: &mut SyncReport,
    ) -> std::result::Result<(), AbortReason> {
        if remote.contains(&image.file_name) {
            info!(file = %image.file_name, "Already on server, skipping");
            report.skipped += 1;
            return Ok(());
        }

        info!(file = %image.file_name, "Uploading");

        let original = UploadTarget::new(image.path.clone(), Collection::Originals);
        if !self.image_store.upload(&original, token).await {
            return Err(AbortReason::OriginalUpload);
        }

        let source_dir = &self.config.source_dir;
        let thumbnail = match self.thumbnails.generate(source_dir, &image.file_name).await {
            Ok(artifact) => artifact,
            Err(e) => {
                if self.config.cleanup_thumbnail_on_failure {
                    self.remove_thumbnail(&thumbnail_path(source_dir, &image.file_name))
                        .await;
                }
                return Err(AbortReason::ThumbnailGeneration(e.to_string()));
            }
        };

        let target = UploadTarget::new(thumbnail.path.clone(), Collection::Thumbnails);
        let uploaded = self.image_store.upload(&target, token).await;

        if uploaded || self.config.cleanup_thumbnail_on_failure {
            self.remove_thumbnail(&thumbnail.path).await;
        }

        if !uploaded {
            return Err(AbortReason::ThumbnailUpload);
        }

        report.uploaded += 1;
        Ok(())
    }

    /// Best-effort removal of a thumbnail artifact
    async fn remove_thumbnail(&self, path: &Path) {
        let file = path.to_string_lossy();
        let file = strip_path(&file);
        match self.fs.exists(path).await {
            Ok(true) => {
                debug!(file, "Removing thumbnail");
                if let Err(e) = self.fs.delete_file(path).await {
                    warn!(file, error = %e, "Failed to remove thumbnail");
                }
            }
            Ok(false) => {}
            Err(e) => warn!(file, error = %e, "Failed to check thumbnail"),
        }
    }
}

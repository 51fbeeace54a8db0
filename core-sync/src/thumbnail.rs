//! # Thumbnail Generator
//!
//! Produces a fixed-height, proportionally scaled copy of a product image
//! next to the original, named `tn_<original>`.
//!
//! Decoding, resizing and encoding run on tokio's blocking pool; the
//! caller awaits the result before moving on.

use crate::error::{Result, SyncError};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// File name prefix of generated thumbnails
pub const THUMBNAIL_PREFIX: &str = "tn_";

/// Default thumbnail height in pixels
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 300;

/// A thumbnail written to disk, pending upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailArtifact {
    /// Full path of the thumbnail file
    pub path: PathBuf,
    /// Base name (`tn_<original>`)
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

/// Name of the thumbnail derived from `file_name`
pub fn thumbnail_file_name(file_name: &str) -> String {
    format!("{}{}", THUMBNAIL_PREFIX, file_name)
}

/// Path of the thumbnail derived from `file_name` inside `source_dir`
pub fn thumbnail_path(source_dir: &Path, file_name: &str) -> PathBuf {
    source_dir.join(thumbnail_file_name(file_name))
}

/// Compute thumbnail dimensions for a `width`×`height` source.
///
/// The height is fixed at `target_height`; the width keeps the aspect
/// ratio. Arithmetic is 32-bit float, truncated to an integer once at the
/// end, and the width never drops below one pixel. `height` must be
/// non-zero.
///
/// ```
/// use core_sync::thumbnail::thumbnail_dimensions;
///
/// assert_eq!(thumbnail_dimensions(1000, 600, 300), (500, 300));
/// ```
pub fn thumbnail_dimensions(width: u32, height: u32, target_height: u32) -> (u32, u32) {
    let scale = (target_height as f32 / height as f32) * 1000f32;
    let scaled_width = (width as f32 / 1000f32) * scale;

    ((scaled_width as u32).max(1), target_height)
}

/// Generates thumbnails of a fixed height.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailGenerator {
    target_height: u32,
}

impl Default for ThumbnailGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_THUMBNAIL_HEIGHT)
    }
}

impl ThumbnailGenerator {
    pub fn new(target_height: u32) -> Self {
        Self {
            target_height: target_height.max(1),
        }
    }

    pub fn target_height(&self) -> u32 {
        self.target_height
    }

    /// Write the thumbnail of `source_dir/file_name` to
    /// `source_dir/tn_<file_name>`, replacing any existing file. The
    /// source is left untouched.
    ///
    /// # Errors
    ///
    /// - [`SyncError::ImageDecode`] if the source cannot be opened or decoded
    /// - [`SyncError::ThumbnailWrite`] if the thumbnail cannot be encoded or written
    #[instrument(skip(self, source_dir))]
    pub async fn generate(&self, source_dir: &Path, file_name: &str) -> Result<ThumbnailArtifact> {
        let source = source_dir.join(file_name);
        let destination = thumbnail_path(source_dir, file_name);
        let target_height = self.target_height;
        let name = file_name.to_string();

        let (path, width, height) = tokio::task::spawn_blocking(move || {
            render(&source, &destination, target_height, &name)
                .map(|(width, height)| (destination, width, height))
        })
        .await
        .map_err(|e| SyncError::TaskFailed(e.to_string()))??;

        debug!(width, height, "Thumbnail written");

        Ok(ThumbnailArtifact {
            path,
            file_name: thumbnail_file_name(file_name),
            width,
            height,
        })
    }
}

fn render(
    source: &Path,
    destination: &Path,
    target_height: u32,
    file_name: &str,
) -> Result<(u32, u32)> {
    let decode_error = |reason: String| SyncError::ImageDecode {
        file_name: file_name.to_string(),
        reason,
    };

    let image = image::ImageReader::open(source)
        .map_err(|e| decode_error(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_error(e.to_string()))?
        .decode()
        .map_err(|e| decode_error(e.to_string()))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(decode_error("image has no pixels".to_string()));
    }

    let (width, height) = thumbnail_dimensions(image.width(), image.height(), target_height);
    let resized = image.resize_exact(width, height, FilterType::Triangle);

    // Encode by the thumbnail's extension, falling back to PNG
    let format = ImageFormat::from_path(destination).unwrap_or(ImageFormat::Png);
    let encoded = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(resized.to_rgb8()),
        _ => resized,
    };

    encoded
        .save_with_format(destination, format)
        .map_err(|e: ImageError| SyncError::ThumbnailWrite {
            file_name: thumbnail_file_name(file_name),
            reason: e.to_string(),
        })?;

    Ok((width, height))
}

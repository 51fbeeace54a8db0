//! Storage and File System Abstractions
//!
//! Provides a platform-agnostic trait for the file I/O the uploader needs in
//! its local image directory.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File metadata information
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub size: u64,
    pub modified_at: Option<i64>,
    pub is_directory: bool,
}

/// File system access trait
///
/// Abstracts the file operations of a reconciliation pass: enumerating the
/// source directory, reading originals and thumbnails for upload, and
/// removing thumbnail artifacts afterwards.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn remove_if_present(fs: &dyn FileSystemAccess, path: &Path) -> Result<()> {
///     if fs.exists(path).await? {
///         fs.delete_file(path).await?;
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Get metadata for a file or directory
    async fn metadata(&self, path: &Path) -> Result<FileMetadata>;

    /// Read entire file contents into memory
    async fn read_file(&self, path: &Path) -> Result<Bytes>;

    /// Delete a file
    async fn delete_file(&self, path: &Path) -> Result<()>;

    /// List all entries in a directory (non-recursive), in the order the
    /// platform enumerates them
    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Check that `path` exists and is a directory
    async fn is_directory(&self, path: &Path) -> Result<bool> {
        if !self.exists(path).await? {
            return Ok(false);
        }
        Ok(self.metadata(path).await?.is_directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use mockall::mock;

    mock! {
        Fs {}

        #[async_trait]
        impl FileSystemAccess for Fs {
            async fn exists(&self, path: &Path) -> Result<bool>;
            async fn metadata(&self, path: &Path) -> Result<FileMetadata>;
            async fn read_file(&self, path: &Path) -> Result<Bytes>;
            async fn delete_file(&self, path: &Path) -> Result<()>;
            async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>>;
        }
    }

    #[test]
    fn test_file_metadata() {
        let metadata = FileMetadata {
            size: 1024,
            modified_at: Some(1234567900),
            is_directory: false,
        };

        assert_eq!(metadata.size, 1024);
        assert!(!metadata.is_directory);
    }

    #[tokio::test]
    async fn test_is_directory_missing_path() {
        let mut fs = MockFs::new();
        fs.expect_exists().returning(|_| Ok(false));
        fs.expect_metadata().never();

        assert!(!fs.is_directory(Path::new("/missing")).await.unwrap());
    }

    #[tokio::test]
    async fn test_is_directory_regular_file() {
        let mut fs = MockFs::new();
        fs.expect_exists().returning(|_| Ok(true));
        fs.expect_metadata().returning(|_| {
            Ok(FileMetadata {
                size: 10,
                modified_at: None,
                is_directory: false,
            })
        });

        assert!(!fs.is_directory(Path::new("/images/12345.jpg")).await.unwrap());
    }

    #[tokio::test]
    async fn test_is_directory_propagates_errors() {
        let mut fs = MockFs::new();
        fs.expect_exists()
            .returning(|_| Err(BridgeError::OperationFailed("denied".to_string())));

        assert!(fs.is_directory(Path::new("/images")).await.is_err());
    }
}

//! File System Access Implementation using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::{FileMetadata, FileSystemAccess},
};
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Tokio-based file system implementation
///
/// Provides async file I/O operations using `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    /// Create a new file system accessor
    pub fn new() -> Self {
        Self
    }

    /// Convert std::io::Error to BridgeError
    fn map_io_error(path: &Path, e: std::io::Error) -> BridgeError {
        if e.kind() == ErrorKind::NotFound {
            BridgeError::NotFound(path.display().to_string())
        } else {
            BridgeError::Io(e)
        }
    }
}

#[async_trait]
impl FileSystemAccess for TokioFileSystem {
    async fn exists(&self, path: &Path) -> Result<bool> {
        fs::try_exists(path)
            .await
            .map_err(|e| Self::map_io_error(path, e))
    }

    async fn metadata(&self, path: &Path) -> Result<FileMetadata> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|e| Self::map_io_error(path, e))?;

        Ok(FileMetadata {
            size: metadata.len(),
            modified_at: metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64),
            is_directory: metadata.is_dir(),
        })
    }

    async fn read_file(&self, path: &Path) -> Result<Bytes> {
        let data = fs::read(path)
            .await
            .map_err(|e| Self::map_io_error(path, e))?;
        debug!(path = ?path, size = data.len(), "Read file");
        Ok(Bytes::from(data))
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)
            .await
            .map_err(|e| Self::map_io_error(path, e))?;
        debug!(path = ?path, "Deleted file");
        Ok(())
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(path)
            .await
            .map_err(|e| Self::map_io_error(path, e))?;

        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| Self::map_io_error(path, e))?
        {
            entries.push(entry.path());
        }

        debug!(path = ?path, count = entries.len(), "Listed directory");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let test_file = dir.path().join("12345.jpg");
        std::fs::write(&test_file, b"Hello, World!").unwrap();

        let fs = TokioFileSystem::new();
        assert!(fs.exists(&test_file).await.unwrap());

        let data = fs.read_file(&test_file).await.unwrap();
        assert_eq!(data, Bytes::from("Hello, World!"));

        fs.delete_file(&test_file).await.unwrap();
        assert!(!fs.exists(&test_file).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_directory_is_flat() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("11111.jpg"), b"a").unwrap();
        std::fs::write(dir.path().join("22222.jpg"), b"b").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("33333.jpg"), b"c").unwrap();

        let fs = TokioFileSystem::new();
        let mut names: Vec<String> = fs
            .list_directory(dir.path())
            .await
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .collect();
        names.sort();

        assert_eq!(names, vec!["11111.jpg", "22222.jpg", "nested"]);
    }

    #[tokio::test]
    async fn test_metadata_and_is_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("11111.jpg");
        std::fs::write(&file, b"abc").unwrap();

        let fs = TokioFileSystem::new();
        let metadata = fs.metadata(&file).await.unwrap();
        assert_eq!(metadata.size, 3);
        assert!(!metadata.is_directory);

        assert!(fs.is_directory(dir.path()).await.unwrap());
        assert!(!fs.is_directory(&file).await.unwrap());
        assert!(!fs.is_directory(&dir.path().join("missing")).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_file_maps_to_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fs = TokioFileSystem::new();

        let err = fs
            .read_file(&dir.path().join("missing.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::NotFound(_)));
    }
}

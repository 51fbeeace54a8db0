//! Local source directory scan.

use crate::error::{Result, SyncError};
use crate::filter::{has_extension, is_eligible};
use bridge_traits::error::BridgeError;
use bridge_traits::storage::FileSystemAccess;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// An eligible image found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImage {
    /// Base name, also used as the remote file name
    pub file_name: String,
    /// Full local path
    pub path: PathBuf,
}

/// List the eligible images directly inside `source_dir`.
///
/// Only regular files whose last extension is `extension` and whose name
/// passes [`is_eligible`] are returned, in the order the file system
/// enumerates them. Subdirectories are not descended into.
///
/// # Errors
///
/// - [`SyncError::SourceDirectoryMissing`] if `source_dir` does not exist or
///   is not a directory
/// - [`SyncError::Bridge`] if the directory cannot be read
#[instrument(skip(fs))]
pub async fn scan_source_directory(
    fs: &dyn FileSystemAccess,
    source_dir: &Path,
    extension: &str,
) -> Result<Vec<LocalImage>> {
    if !fs.is_directory(source_dir).await? {
        return Err(SyncError::SourceDirectoryMissing(source_dir.to_path_buf()));
    }

    let entries = fs.list_directory(source_dir).await.map_err(|e| match e {
        BridgeError::NotFound(_) => SyncError::SourceDirectoryMissing(source_dir.to_path_buf()),
        other => SyncError::Bridge(other),
    })?;

    let mut images = Vec::new();
    for path in entries {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string)
        else {
            debug!(path = ?path, "Skipping entry with non UTF-8 name");
            continue;
        };

        if !has_extension(&file_name, extension) || !is_eligible(&file_name) {
            continue;
        }

        // Entries can vanish between listing and stat; skip those too
        match fs.metadata(&path).await {
            Ok(metadata) if !metadata.is_directory => {}
            Ok(_) => continue,
            Err(e) => {
                debug!(file = %file_name, error = %e, "Skipping unreadable entry");
                continue;
            }
        }

        images.push(LocalImage { file_name, path });
    }

    debug!(count = images.len(), "Scanned source directory");
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::storage::FileMetadata;
    use bytes::Bytes;
    use mockall::mock;

    mock! {
        Fs {}

        #[async_trait::async_trait]
        impl FileSystemAccess for Fs {
            async fn exists(&self, path: &Path) -> bridge_traits::error::Result<bool>;
            async fn metadata(&self, path: &Path) -> bridge_traits::error::Result<FileMetadata>;
            async fn read_file(&self, path: &Path) -> bridge_traits::error::Result<Bytes>;
            async fn delete_file(&self, path: &Path) -> bridge_traits::error::Result<()>;
            async fn list_directory(&self, path: &Path) -> bridge_traits::error::Result<Vec<PathBuf>>;
        }
    }

    fn file() -> FileMetadata {
        FileMetadata {
            size: 10,
            modified_at: None,
            is_directory: false,
        }
    }

    fn dir() -> FileMetadata {
        FileMetadata {
            size: 0,
            modified_at: None,
            is_directory: true,
        }
    }

    #[tokio::test]
    async fn test_scan_filters_and_keeps_order() {
        let mut fs = MockFs::new();
        fs.expect_exists().returning(|_| Ok(true));
        fs.expect_metadata().returning(|p| {
            if p == Path::new("/srv/images") || p == Path::new("/srv/images/33333.jpg") {
                Ok(dir())
            } else {
                Ok(file())
            }
        });
        fs.expect_list_directory().returning(|_| {
            Ok(vec![
                PathBuf::from("/srv/images/22222.jpg"),
                PathBuf::from("/srv/images/notes.txt"),
                PathBuf::from("/srv/images/1234.jpg"),
                PathBuf::from("/srv/images/33333.jpg"),
                PathBuf::from("/srv/images/44444.png"),
                PathBuf::from("/srv/images/tn_55555.jpg"),
                PathBuf::from("/srv/images/11111.JPG"),
            ])
        });

        let images = scan_source_directory(&fs, Path::new("/srv/images"), "jpg")
            .await
            .unwrap();

        let names: Vec<&str> = images.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["22222.jpg", "11111.JPG"]);
        assert_eq!(images[0].path, PathBuf::from("/srv/images/22222.jpg"));
    }

    #[tokio::test]
    async fn test_scan_missing_directory() {
        let mut fs = MockFs::new();
        fs.expect_exists().returning(|_| Ok(false));
        fs.expect_list_directory().never();

        let result = scan_source_directory(&fs, Path::new("/missing"), "jpg").await;
        assert!(matches!(result, Err(SyncError::SourceDirectoryMissing(p)) if p == Path::new("/missing")));
    }

    #[tokio::test]
    async fn test_scan_file_instead_of_directory() {
        let mut fs = MockFs::new();
        fs.expect_exists().returning(|_| Ok(true));
        fs.expect_metadata().returning(|_| Ok(file()));

        let result = scan_source_directory(&fs, Path::new("/srv/12345.jpg"), "jpg").await;
        assert!(matches!(result, Err(SyncError::SourceDirectoryMissing(_))));
    }

    #[tokio::test]
    async fn test_scan_unreadable_directory() {
        let mut fs = MockFs::new();
        fs.expect_exists().returning(|_| Ok(true));
        fs.expect_metadata().returning(|_| Ok(dir()));
        fs.expect_list_directory()
            .returning(|_| Err(BridgeError::OperationFailed("permission denied".to_string())));

        let result = scan_source_directory(&fs, Path::new("/srv/images"), "jpg").await;
        assert!(matches!(result, Err(SyncError::Bridge(_))));
    }
}

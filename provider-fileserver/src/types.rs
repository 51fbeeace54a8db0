//! File server API types
//!
//! Data structures for the collection listing and the upload pipeline.

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// `GET /images/{collection}` response body
#[derive(Debug, Clone, Deserialize)]
pub struct FileListResponse {
    /// Stored file names (no directory component)
    pub files: Vec<String>,
}

/// Remote collection category.
///
/// Each category maps to its own configured collection name on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Full-size originals
    Originals,
    /// Generated thumbnails
    Thumbnails,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Originals => f.write_str("originals"),
            Self::Thumbnails => f.write_str("thumbnails"),
        }
    }
}

/// A local file paired with the collection it is uploaded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub path: PathBuf,
    pub collection: Collection,
}

impl UploadTarget {
    pub fn new(path: impl Into<PathBuf>, collection: Collection) -> Self {
        Self {
            path: path.into(),
            collection,
        }
    }

    /// Base name announced to the server as the multipart file name
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Snapshot of the file names stored in a remote collection.
///
/// Membership is exact string equality. A snapshot substituted for a
/// failed listing is empty and marked degraded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteFileSet {
    files: HashSet<String>,
    degraded: bool,
}

impl RemoteFileSet {
    /// Snapshot from a successful listing
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: names.into_iter().map(Into::into).collect(),
            degraded: false,
        }
    }

    /// Empty stand-in for a listing that could not be obtained
    pub fn degraded() -> Self {
        Self {
            files: HashSet::new(),
            degraded: true,
        }
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.files.contains(file_name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

//! Local mirror root

use crate::{FileSystem, StoragePath};
use async_trait::async_trait;
use pga_errors::{Error, StorageError};
use pga_hash::Digest;
use std::io::ErrorKind;
use std::path::PathBuf;

/// File system rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// On-disk path of a stored file
    #[must_use]
    pub fn path_for(&self, path: &StoragePath) -> PathBuf {
        path.components()
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }

    /// Whether a stored file is present
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` if a directory sits where the file
    /// belongs, or the classified I/O error if the metadata cannot be read.
    pub async fn exists(&self, path: &StoragePath) -> Result<bool, Error> {
        let full = self.path_for(path);
        match tokio::fs::metadata(&full).await {
            Ok(meta) if meta.is_file() => Ok(true),
            Ok(_) => Err(StorageError::InvalidPath {
                path: full.display().to_string(),
            }
            .into()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::from_io_with_path(&e, &full).into()),
        }
    }
}

#[async_trait]
impl FileSystem for LocalFs {
    fn location(&self) -> String {
        std::path::absolute(&self.root)
            .unwrap_or_else(|_| self.root.clone())
            .display()
            .to_string()
    }

    async fn digest(&self, path: &StoragePath) -> Result<Digest, Error> {
        Digest::hash_file(&self.path_for(path)).await
    }
}

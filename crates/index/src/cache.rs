//! Local cache of the remote catalog

use pga_errors::{Error, StorageError};
use pga_events::{AppEvent, EventEmitter, EventSender, IndexEvent};
use pga_net::NetClient;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File name used when the catalog URL has no usable last segment
const FALLBACK_FILE_NAME: &str = "index.csv";

/// Catalog cache manager
#[derive(Debug, Clone)]
pub struct IndexCache {
    cache_dir: PathBuf,
}

impl IndexCache {
    /// Create a new cache manager
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
        }
    }

    /// Cache file for a remote catalog URL
    #[must_use]
    pub fn path_for(&self, location: &str) -> PathBuf {
        let name = location
            .split(['?', '#'])
            .next()
            .and_then(|base| base.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_FILE_NAME);
        self.cache_dir.join(name)
    }

    /// Resolve a catalog location to a readable local file.
    ///
    /// Local paths are returned as-is. Remote catalogs are downloaded into
    /// the cache unless a cached copy already has the size the server
    /// advertises. When the server cannot be reached a cached copy is used
    /// as a fallback.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog must be downloaded and the download
    /// or the cache write fails.
    pub async fn fetch(
        &self,
        location: &str,
        client: &NetClient,
        tx: &EventSender,
    ) -> Result<PathBuf, Error> {
        if !pga_net::is_remote(location) {
            return Ok(PathBuf::from(location));
        }

        let path = self.path_for(location);
        let cached_size = fs::metadata(&path).await.ok().map(|m| m.len());

        match pga_net::content_length(client, location).await {
            Ok(Some(remote_size)) if cached_size == Some(remote_size) => {
                tx.emit(AppEvent::Index(IndexEvent::CacheHit {
                    path: path.display().to_string(),
                }));
                return Ok(path);
            }
            Ok(_) => {}
            Err(e) if cached_size.is_some() => {
                tx.emit_warning(format!(
                    "could not check {location} ({e}), using cached catalog {}",
                    path.display()
                ));
                return Ok(path);
            }
            Err(e) => return Err(e),
        }

        tx.emit(AppEvent::Index(IndexEvent::FetchStarted {
            location: location.to_string(),
        }));
        let bytes = pga_net::fetch_bytes(client, location, tx).await?;
        self.save(&path, &bytes).await?;

        tx.emit(AppEvent::Index(IndexEvent::Fetched {
            location: location.to_string(),
            bytes: bytes.len() as u64,
        }));
        Ok(path)
    }

    /// Write a downloaded catalog into the cache
    async fn save(&self, path: &Path, bytes: &[u8]) -> Result<(), Error> {
        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| StorageError::IoError {
                message: format!("failed to create cache dir: {e}"),
            })?;

        // Write to temporary file first
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, bytes)
            .await
            .map_err(|e| StorageError::IoError {
                message: format!("failed to write cache: {e}"),
            })?;

        // Atomic rename
        fs::rename(&temp_path, path)
            .await
            .map_err(|e| StorageError::IoError {
                message: format!("failed to rename cache file: {e}"),
            })?;

        Ok(())
    }

    /// Clear the cached catalog for a location
    ///
    /// # Errors
    ///
    /// This function does not return errors as file removal failures are ignored.
    pub async fn clear(&self, location: &str) -> Result<(), Error> {
        let _ = fs::remove_file(self.path_for(location)).await;
        Ok(())
    }
}

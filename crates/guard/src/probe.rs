//! Per-item verification probes

use async_trait::async_trait;
use pga_store::{FileSystem, LocalFs, StoragePath};
use pga_types::Verdict;
use std::sync::Arc;

/// Decides whether one stored file is present and current.
///
/// A probe always answers. Every failure is expressed as a flagged
/// [`Verdict`], never as an error, so each dispatched item yields exactly one
/// outcome.
#[async_trait]
pub trait VerificationProbe: Send + Sync {
    async fn probe(&self, path: &StoragePath) -> Verdict;
}

/// Compares the local copy's MD5 with the digest the remote source publishes
pub struct ArchiveProbe {
    local: Arc<LocalFs>,
    remote: Arc<dyn FileSystem>,
}

impl ArchiveProbe {
    #[must_use]
    pub fn new(local: Arc<LocalFs>, remote: Arc<dyn FileSystem>) -> Self {
        Self { local, remote }
    }
}

impl std::fmt::Debug for ArchiveProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveProbe").finish_non_exhaustive()
    }
}

#[async_trait]
impl VerificationProbe for ArchiveProbe {
    async fn probe(&self, path: &StoragePath) -> Verdict {
        match self.local.exists(path).await {
            Ok(true) => {}
            Ok(false) => return Verdict::Missing,
            Err(e) => {
                return Verdict::Unreadable {
                    reason: e.to_string(),
                }
            }
        }

        // Remote first so an unreachable source costs no local read
        let remote = match self.remote.digest(path).await {
            Ok(digest) => digest,
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "remote digest unavailable");
                return Verdict::Unreachable {
                    reason: e.to_string(),
                };
            }
        };

        let local = match self.local.digest(path).await {
            Ok(digest) => digest,
            Err(e) => {
                return Verdict::Unreadable {
                    reason: e.to_string(),
                }
            }
        };

        if local == remote {
            Verdict::Current
        } else {
            Verdict::Stale {
                local: local.to_hex(),
                remote: remote.to_hex(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pga_store::Layout;
    use pga_types::ItemId;
    use tempfile::TempDir;

    async fn put(root: &TempDir, path: &StoragePath, data: &[u8]) {
        let full = LocalFs::new(root.path()).path_for(path);
        tokio::fs::create_dir_all(full.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(full, data).await.unwrap();
    }

    fn path(id: &str) -> StoragePath {
        Layout::default().resolve(&ItemId::parse(id).unwrap())
    }

    fn probe(local: &TempDir, remote: &TempDir) -> ArchiveProbe {
        ArchiveProbe::new(
            Arc::new(LocalFs::new(local.path())),
            Arc::new(LocalFs::new(remote.path())),
        )
    }

    #[tokio::test]
    async fn test_verdicts() {
        let local = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();
        let probe = probe(&local, &remote);

        let current = path("ab12.siva");
        put(&local, &current, b"same").await;
        put(&remote, &current, b"same").await;
        assert_eq!(probe.probe(&current).await, Verdict::Current);

        let stale = path("cd34.siva");
        put(&local, &stale, b"old").await;
        put(&remote, &stale, b"new").await;
        assert!(matches!(probe.probe(&stale).await, Verdict::Stale { .. }));

        let missing = path("ef56.siva");
        put(&remote, &missing, b"only remote").await;
        assert_eq!(probe.probe(&missing).await, Verdict::Missing);

        let orphan = path("0a1b.siva");
        put(&local, &orphan, b"only local").await;
        assert!(matches!(
            probe.probe(&orphan).await,
            Verdict::Unreachable { .. }
        ));
    }

    #[tokio::test]
    async fn test_directory_is_unreadable() {
        let local = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();
        let p = path("ab12.siva");
        tokio::fs::create_dir_all(LocalFs::new(local.path()).path_for(&p))
            .await
            .unwrap();

        assert!(matches!(
            probe(&local, &remote).probe(&p).await,
            Verdict::Unreadable { .. }
        ));
    }
}

//! Remote source root served over HTTP

use crate::{FileSystem, StoragePath};
use async_trait::async_trait;
use pga_errors::{Error, NetworkError};
use pga_hash::Digest;
use pga_net::NetClient;
use url::Url;

/// Suffix of the published digest sidecar
const DIGEST_SUFFIX: &str = ".md5";

/// File system rooted at an HTTP(S) base URL
///
/// Digests are read from the `<file>.md5` sidecar the source publishes, so
/// no archive content is transferred.
#[derive(Debug, Clone)]
pub struct HttpFs {
    base: Url,
    client: NetClient,
}

impl HttpFs {
    /// Create a remote root
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not a valid URL.
    pub fn new(base: &str, client: NetClient) -> Result<Self, Error> {
        // A trailing slash keeps `join` from replacing the last segment
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = pga_net::parse_url(&normalized)?;
        Ok(Self { base, client })
    }

    fn url_for(&self, path: &StoragePath) -> Result<Url, Error> {
        self.base
            .join(path.as_str())
            .map_err(|e| NetworkError::InvalidUrl(e.to_string()).into())
    }
}

#[async_trait]
impl FileSystem for HttpFs {
    fn location(&self) -> String {
        self.base.to_string()
    }

    async fn digest(&self, path: &StoragePath) -> Result<Digest, Error> {
        let url = format!("{}{DIGEST_SUFFIX}", self.url_for(path)?);
        tracing::debug!(url = %url, "fetching digest sidecar");

        let body = self.client.get_text(&url).await?;
        Digest::from_sidecar(&body).map_err(|e| {
            NetworkError::MalformedDigest {
                url,
                reason: e.to_string(),
            }
            .into()
        })
    }
}

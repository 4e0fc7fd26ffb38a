#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Mirror storage for pga
//!
//! Siva files live under a sharded layout that is identical on the local
//! mirror and on the remote source:
//!
//! ```text
//! <root>/<category>/<generation>/<shard>/<identifier>
//! ```
//!
//! [`FileSystem`] abstracts over the two roots so the digest of a stored
//! file can be asked of either side. Only the local mirror is ever stat'ed,
//! through [`LocalFs::exists`].

mod http;
mod layout;
mod local;

pub use http::HttpFs;
pub use layout::{Layout, StoragePath};
pub use local::LocalFs;

use async_trait::async_trait;
use pga_errors::Error;
use pga_hash::Digest;
use pga_net::NetClient;
use std::path::PathBuf;
use std::sync::Arc;

/// A root holding siva files in the sharded layout
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Absolute location of the root itself
    fn location(&self) -> String;

    /// MD5 digest of a stored file's contents
    async fn digest(&self, path: &StoragePath) -> Result<Digest, Error>;
}

/// Open a root given as either a local directory or an HTTP(S) URL
///
/// # Errors
///
/// Returns an error if the location looks like a URL but cannot be parsed.
pub fn open(location: &str, client: &NetClient) -> Result<Arc<dyn FileSystem>, Error> {
    if pga_net::is_remote(location) {
        Ok(Arc::new(HttpFs::new(location, client.clone())?))
    } else {
        Ok(Arc::new(LocalFs::new(PathBuf::from(location))))
    }
}

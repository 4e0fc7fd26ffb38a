#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! MD5 content digests for pga
//!
//! The Public Git Archive publishes an MD5 digest next to every siva file.
//! This crate computes the same digest over local copies and parses the
//! published sidecars so the two can be compared without downloading the
//! archives themselves.

use md5::{Digest as _, Md5};
use pga_errors::{Error, StorageError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Size of chunks for streaming hash computation
const CHUNK_SIZE: usize = 64 * 1024; // 64KB

/// Length in bytes of an MD5 digest
pub const DIGEST_LEN: usize = 16;

/// An MD5 digest value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest {
    bytes: [u8; DIGEST_LEN],
}

impl Digest {
    /// Create a digest from raw bytes
    #[must_use]
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self { bytes }
    }

    /// Convert to lowercase hex string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse from hex string (case-insensitive)
    ///
    /// # Errors
    /// Returns an error if the input is not valid hexadecimal or is not exactly 32 characters.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let bytes = hex::decode(s.trim()).map_err(|e| StorageError::InvalidDigest {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        if bytes.len() != DIGEST_LEN {
            return Err(StorageError::InvalidDigest {
                value: s.to_string(),
                reason: format!("expected {DIGEST_LEN} bytes, got {}", bytes.len()),
            }
            .into());
        }

        let mut array = [0u8; DIGEST_LEN];
        array.copy_from_slice(&bytes);
        Ok(Self::from_bytes(array))
    }

    /// Parse the body of a published `.md5` sidecar.
    ///
    /// Accepts both a bare digest and the `md5sum` format
    /// (`<digest>  <filename>`); only the first token is used.
    ///
    /// # Errors
    /// Returns an error if the body is empty or the first token is not a digest.
    pub fn from_sidecar(body: &str) -> Result<Self, Error> {
        let token = body
            .split_whitespace()
            .next()
            .ok_or_else(|| StorageError::InvalidDigest {
                value: String::new(),
                reason: "empty sidecar".to_string(),
            })?;
        Self::from_hex(token)
    }

    /// Compute digest of a byte slice
    #[must_use]
    pub fn from_data(data: &[u8]) -> Self {
        let mut hasher = Md5::new();
        hasher.update(data);
        Self::finish(hasher)
    }

    /// Compute digest of everything an async reader yields
    ///
    /// # Errors
    /// Returns an error if reading fails.
    pub async fn from_reader<R>(mut reader: R) -> Result<Self, Error>
    where
        R: AsyncRead + Unpin,
    {
        let mut hasher = Md5::new();
        let mut buffer = vec![0; CHUNK_SIZE];

        loop {
            let n = reader.read(&mut buffer).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        Ok(Self::finish(hasher))
    }

    /// Compute digest of a file
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, read, or if any I/O operation fails.
    pub async fn hash_file(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, path))?;
        Self::from_reader(file)
            .await
            .map_err(|e| match e {
                Error::Io { kind, message, .. } => Error::Io {
                    kind,
                    message,
                    path: Some(path.to_path_buf()),
                },
                other => other,
            })
    }

    fn finish(hasher: Md5) -> Self {
        let out = hasher.finalize();
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&out);
        Self { bytes }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests;

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for pga
//!
//! This crate handles all HTTP operations: catalog fetching, digest sidecar
//! lookups, and connection pooling with retry logic.

mod client;

pub use client::{NetClient, NetConfig};

use pga_errors::{Error, NetworkError};
use pga_events::{EventEmitter, EventSender};
use url::Url;

/// Fetch binary content from a URL
///
/// # Errors
///
/// Returns an error if the HTTP request fails, the server returns an error status,
/// or the response body cannot be read as bytes.
pub async fn fetch_bytes(
    client: &NetClient,
    url: &str,
    tx: &EventSender,
) -> Result<Vec<u8>, Error> {
    tx.emit_debug(format!("Fetching bytes from {url}"));

    let response = client.get_ok(url).await?;
    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| NetworkError::RequestFailed(e.to_string()).into())
}

/// Size of a remote resource as advertised by a HEAD request
///
/// # Errors
///
/// Returns an error if the request fails or the server returns an error status.
/// A server that omits `Content-Length` yields `Ok(None)`.
pub async fn content_length(client: &NetClient, url: &str) -> Result<Option<u64>, Error> {
    let response = client.head(url).await?;
    let response = client::ensure_success(response)?;
    Ok(response
        .headers()
        .get(reqwest::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok()))
}

/// Parse and validate a URL
///
/// # Errors
///
/// Returns an error if the URL string is malformed or invalid according to RFC 3986.
pub fn parse_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()).into())
}

/// Whether a location string names an HTTP(S) resource rather than a local path
#[must_use]
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        assert!(parse_url("http://pga.sourced.tech/").is_ok());
        assert!(parse_url("not a url").is_err());
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/csv/latest.csv.gz"));
        assert!(!is_remote("/var/cache/pga/latest.csv.gz"));
        assert!(!is_remote("latest.csv"));
    }
}

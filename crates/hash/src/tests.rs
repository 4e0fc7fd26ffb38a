//! Unit tests for MD5 digests

use super::*;
use tempfile::TempDir;
use tokio::fs;

#[test]
fn test_known_digests() {
    assert_eq!(
        Digest::from_data(b"").to_hex(),
        "d41d8cd98f00b204e9800998ecf8427e"
    );
    assert_eq!(
        Digest::from_data(b"abc").to_hex(),
        "900150983cd24fb0d6963f7d28e17f72"
    );
}

#[test]
fn test_hex_roundtrip_is_case_insensitive() {
    let upper = Digest::from_hex("900150983CD24FB0D6963F7D28E17F72").unwrap();
    assert_eq!(upper, Digest::from_data(b"abc"));
}

#[test]
fn test_sidecar_formats() {
    let expected = Digest::from_data(b"abc");
    let bare = Digest::from_sidecar("900150983cd24fb0d6963f7d28e17f72\n").unwrap();
    let md5sum =
        Digest::from_sidecar("900150983cd24fb0d6963f7d28e17f72  ab12cd.siva\n").unwrap();
    assert_eq!(bare, expected);
    assert_eq!(md5sum, expected);

    assert!(Digest::from_sidecar("   \n").is_err());
    assert!(Digest::from_sidecar("<html>not found</html>").is_err());
}

#[tokio::test]
async fn test_file_digest_matches_data_digest() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ab12.siva");

    // Larger than one chunk so the streaming loop runs more than once
    let data: Vec<u8> = (0..CHUNK_SIZE * 2 + 17).map(|i| (i % 251) as u8).collect();
    fs::write(&path, &data).await.unwrap();

    let from_file = Digest::hash_file(&path).await.unwrap();
    assert_eq!(from_file, Digest::from_data(&data));
}

#[tokio::test]
async fn test_missing_file_maps_to_path_not_found() {
    let dir = TempDir::new().unwrap();
    let result = Digest::hash_file(&dir.path().join("absent.siva")).await;
    assert!(matches!(
        result,
        Err(Error::Storage(StorageError::PathNotFound { .. }))
    ));
}

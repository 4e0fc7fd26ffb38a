//! Integration tests for store crate

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use pga_errors::{Error, NetworkError};
    use pga_hash::Digest;
    use pga_net::{NetClient, NetConfig};
    use pga_store::*;
    use pga_types::ItemId;
    use std::time::Duration;
    use tempfile::TempDir;

    fn client() -> NetClient {
        NetClient::new(NetConfig {
            retry_count: 0,
            retry_delay: Duration::from_millis(1),
            ..NetConfig::default()
        })
        .unwrap()
    }

    fn path(id: &str) -> StoragePath {
        Layout::default().resolve(&ItemId::parse(id).unwrap())
    }

    #[tokio::test]
    async fn test_http_digest_from_sidecar() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/siva/latest/ab/ab12.siva.md5");
            then.status(200)
                .body("900150983cd24fb0d6963f7d28e17f72  ab12.siva\n");
        });

        let fs = HttpFs::new(&server.base_url(), client()).unwrap();
        let digest = fs.digest(&path("ab12.siva")).await.unwrap();

        mock.assert();
        assert_eq!(digest, Digest::from_data(b"abc"));
    }

    #[tokio::test]
    async fn test_http_malformed_sidecar() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/siva/latest/cd/cd34.md5");
            then.status(200).body("<html>oops</html>");
        });

        let fs = HttpFs::new(&server.base_url(), client()).unwrap();
        let result = fs.digest(&path("cd34")).await;
        assert!(matches!(
            result,
            Err(Error::Network(NetworkError::MalformedDigest { .. }))
        ));
    }

    #[tokio::test]
    async fn test_http_missing_sidecar() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/siva/latest/ef/ef56.md5");
            then.status(404);
        });

        let fs = HttpFs::new(&server.base_url(), client()).unwrap();
        assert!(matches!(
            fs.digest(&path("ef56")).await,
            Err(Error::Network(NetworkError::HttpError { status: 404, .. }))
        ));
    }

    #[tokio::test]
    async fn test_http_digest_keeps_base_path() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/mirror/siva/latest/ab/ab12.md5");
            then.status(200).body("900150983cd24fb0d6963f7d28e17f72");
        });

        // No trailing slash on the base
        let fs = HttpFs::new(&server.url("/mirror"), client()).unwrap();
        assert_eq!(
            fs.digest(&path("ab12")).await.unwrap(),
            Digest::from_data(b"abc")
        );
        mock.assert();
    }

    #[tokio::test]
    async fn test_open_picks_backend() {
        let dir = TempDir::new().unwrap();
        let local = open(dir.path().to_str().unwrap(), &client()).unwrap();
        assert!(std::path::Path::new(&local.location()).is_absolute());

        let remote = open("https://example.com/", &client()).unwrap();
        assert_eq!(remote.location(), "https://example.com/");
    }

    #[tokio::test]
    async fn test_local_and_local_remote_agree() {
        // A local directory can stand in for the remote source
        let dir = TempDir::new().unwrap();
        let fs = LocalFs::new(dir.path());
        let p = path("ab12");
        let full = fs.path_for(&p);
        tokio::fs::create_dir_all(full.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&full, b"content").await.unwrap();

        let remote = open(dir.path().to_str().unwrap(), &client()).unwrap();
        assert_eq!(
            fs.digest(&p).await.unwrap(),
            remote.digest(&p).await.unwrap()
        );
    }
}

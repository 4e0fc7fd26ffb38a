//! Integration tests for ops crate

#[cfg(test)]
mod tests {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use pga_config::Config;
    use pga_errors::{Error, OpsError};
    use pga_events::{channel, AppEvent, EventReceiver, GeneralEvent, ItemOrigin, StatusEvent};
    use pga_guard::ConcurrencyBudget;
    use pga_index::Filter;
    use pga_net::{NetClient, NetConfig};
    use pga_ops::*;
    use pga_store::{FileSystem, Layout, LocalFs};
    use pga_types::ItemId;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    struct Mirror {
        local: TempDir,
        remote: TempDir,
        cache: TempDir,
    }

    impl Mirror {
        fn new() -> Self {
            Self {
                local: tempdir().unwrap(),
                remote: tempdir().unwrap(),
                cache: tempdir().unwrap(),
            }
        }

        fn put(root: &TempDir, id: &str, data: &[u8]) {
            let path = Layout::default().resolve(&ItemId::parse(id).unwrap());
            let full = LocalFs::new(root.path()).path_for(&path);
            std::fs::create_dir_all(full.parent().unwrap()).unwrap();
            std::fs::write(full, data).unwrap();
        }

        fn put_both(&self, id: &str, local: &[u8], remote: &[u8]) {
            Self::put(&self.local, id, local);
            Self::put(&self.remote, id, remote);
        }

        fn context(&self) -> (OpsCtx, EventReceiver) {
            let (tx, rx) = channel();
            let mut config = Config::default();
            config.paths.cache = Some(self.cache.path().to_path_buf());

            let ctx = OpsContextBuilder::new()
                .with_net(NetClient::new(NetConfig::default()).unwrap())
                .with_local(Arc::new(LocalFs::new(self.local.path())))
                .with_remote(Arc::new(LocalFs::new(self.remote.path())))
                .with_event_sender(tx)
                .with_config(config)
                .build()
                .unwrap();
            (ctx, rx)
        }
    }

    fn drain(rx: &mut EventReceiver) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Ok(message) = rx.try_recv() {
            events.push(message.event);
        }
        events
    }

    fn request(source: ItemSource, jobs: usize) -> StatusRequest {
        StatusRequest {
            source,
            jobs: ConcurrencyBudget::new(jobs).unwrap(),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_status_from_list() {
        let mirror = Mirror::new();
        mirror.put_both("ab12.siva", b"a", b"a");
        mirror.put_both("cd34.siva", b"b", b"b, newer");
        mirror.put_both("ef56.siva", b"c", b"c");
        let (ctx, mut rx) = mirror.context();

        let report = status(
            &ctx,
            request(
                ItemSource::List("ab12.siva\n\ncd34.siva\nef56.siva\n".to_string()),
                2,
            ),
        )
        .await
        .unwrap();

        assert_eq!(report.tally.to_string(), "1 of 3 corrupted");
        assert!(report.has_flagged());
        assert_eq!(report.destination, ctx.local.location());
        assert_eq!(
            report.to_string(),
            format!("1 of 3 corrupted in '{}'", ctx.local.location())
        );

        let events = drain(&mut rx);
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::Status(StatusEvent::ItemsLoaded {
                origin: ItemOrigin::List,
                count: 3
            })
        )));
        let flagged: Vec<&ItemId> = events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Status(StatusEvent::ItemFlagged { item, .. }) => Some(item),
                _ => None,
            })
            .collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].as_str(), "cd34.siva");
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::Status(StatusEvent::RunCompleted { run_id, .. }) if *run_id == report.run_id
        )));
    }

    #[tokio::test]
    async fn test_status_with_no_items() {
        let mirror = Mirror::new();
        let (ctx, _rx) = mirror.context();

        let report = status(&ctx, request(ItemSource::List("\n\n".to_string()), 10))
            .await
            .unwrap();
        assert_eq!(report.tally.to_string(), "0 of 0 corrupted");
        assert!(!report.has_flagged());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_status_from_filtered_catalog() {
        let mirror = Mirror::new();
        mirror.put_both("ab12.siva", b"go", b"go");
        mirror.put_both("cd34.siva", b"go too", b"go too");
        Mirror::put(&mirror.remote, "ef56.siva", b"python only");

        let catalog = "\
URL,SIVA_FILENAMES,FILES_COUNT,LANGS,LICENSE
https://github.com/src-d/go-git,\"ab12.siva,cd34.siva\",10,\"Go,Shell\",Apache-2.0
https://github.com/octo/hello,ef56.siva,3,Python,MIT
";
        let catalog_path = mirror.cache.path().join("mine.csv.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(catalog.as_bytes()).unwrap();
        std::fs::write(&catalog_path, encoder.finish().unwrap()).unwrap();

        let (ctx, mut rx) = mirror.context();
        let source = ItemSource::Catalog {
            location: Some(catalog_path.display().to_string()),
            filter: Filter::new(None, &["Go".to_string()]).unwrap(),
        };

        let report = status(&ctx, request(source, 4)).await.unwrap();
        assert_eq!(report.tally.to_string(), "0 of 2 corrupted");

        // Without the filter the missing python archive is flagged
        let source = ItemSource::Catalog {
            location: Some(catalog_path.display().to_string()),
            filter: Filter::default(),
        };
        let report = status(&ctx, request(source, 4)).await.unwrap();
        assert_eq!(report.tally.to_string(), "1 of 3 corrupted");

        assert!(drain(&mut rx).iter().any(|e| matches!(
            e,
            AppEvent::Status(StatusEvent::ItemsLoaded {
                origin: ItemOrigin::Catalog { rows: 1 },
                count: 2
            })
        )));
    }

    #[tokio::test]
    async fn test_invalid_item_is_setup_failure() {
        let mirror = Mirror::new();
        let (ctx, mut rx) = mirror.context();

        let result = status(
            &ctx,
            request(ItemSource::List("ab12.siva\nsiva/ab/cd34\n".to_string()), 2),
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::Ops(OpsError::InvalidItem { line: 2, .. }))
        ));

        // Nothing was dispatched
        let events = drain(&mut rx);
        assert!(!events
            .iter()
            .any(|e| matches!(e, AppEvent::Status(StatusEvent::RunStarted { .. }))));
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::General(GeneralEvent::OperationFailed { failure, .. })
                if failure.code.as_deref() == Some("ops.invalid_item")
        )));
    }

    #[test]
    fn test_builder_requires_components() {
        let result = OpsContextBuilder::new()
            .with_config(Config::default())
            .build();
        assert!(matches!(
            result,
            Err(Error::Ops(OpsError::MissingComponent { .. }))
        ));
    }

    #[test]
    fn test_report_json() {
        let report = StatusReport {
            run_id: "r".to_string(),
            tally: pga_types::RunTally {
                total: 3,
                flagged: 1,
                completed: 3,
            },
            destination: "/srv/pga".to_string(),
            duration_ms: 12,
        };
        let json = OperationResult::StatusReport(report).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "StatusReport");
        assert_eq!(value["data"]["tally"]["flagged"], 1);
        assert_eq!(value["data"]["destination"], "/srv/pga");
    }
}

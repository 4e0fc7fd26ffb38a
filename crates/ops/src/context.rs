//! Operations context for dependency injection

use pga_config::Config;
use pga_errors::{Error, OpsError};
use pga_events::{EventEmitter, EventSender};
use pga_index::IndexCache;
use pga_net::NetClient;
use pga_store::{FileSystem, Layout, LocalFs};
use std::sync::Arc;

/// Operations context providing access to all system components
pub struct OpsCtx {
    /// Network client
    pub net: NetClient,
    /// Local mirror root
    pub local: Arc<LocalFs>,
    /// Authoritative remote source
    pub remote: Arc<dyn FileSystem>,
    /// Catalog cache
    pub index: IndexCache,
    /// Storage layout shared by both roots
    pub layout: Layout,
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// System configuration
    pub config: Config,
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

impl std::fmt::Debug for OpsCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpsCtx")
            .field("local", &self.local.location())
            .field("remote", &self.remote.location())
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

/// Builder for operations context
#[derive(Default)]
pub struct OpsContextBuilder {
    net: Option<NetClient>,
    local: Option<Arc<LocalFs>>,
    remote: Option<Arc<dyn FileSystem>>,
    tx: Option<EventSender>,
    config: Option<Config>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set network client
    #[must_use]
    pub fn with_net(mut self, net: NetClient) -> Self {
        self.net = Some(net);
        self
    }

    /// Set local mirror root
    #[must_use]
    pub fn with_local(mut self, local: Arc<LocalFs>) -> Self {
        self.local = Some(local);
        self
    }

    /// Set remote source root
    #[must_use]
    pub fn with_remote(mut self, remote: Arc<dyn FileSystem>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context
    ///
    /// The catalog cache lives in the configured cache directory and the
    /// layout always comes from the `[source]` section.
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let missing = |component: &str| OpsError::MissingComponent {
            component: component.to_string(),
        };

        let net = self.net.ok_or_else(|| missing("net"))?;
        let local = self.local.ok_or_else(|| missing("local"))?;
        let remote = self.remote.ok_or_else(|| missing("remote"))?;
        let tx = self.tx.ok_or_else(|| missing("event sender"))?;
        let config = self.config.ok_or_else(|| missing("config"))?;
        let index = IndexCache::new(config.cache_path());
        let layout = Layout::from_config(&config.source);

        Ok(OpsCtx {
            net,
            local,
            remote,
            index,
            layout,
            tx,
            config,
        })
    }
}

//! Sharded storage layout

use pga_config::SourceConfig;
use pga_types::ItemId;
use std::fmt;

/// Relative location of one item under a storage root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoragePath {
    item: ItemId,
    key: String,
}

impl StoragePath {
    /// The item this path was resolved for
    #[must_use]
    pub fn item(&self) -> &ItemId {
        &self.item
    }

    /// Slash-separated key relative to the root
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Key components, for joining onto a local root
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.key.split('/')
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Resolves item identifiers to storage paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    category: String,
    generation: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(
            pga_config::constants::DEFAULT_CATEGORY,
            pga_config::constants::DEFAULT_GENERATION,
        )
    }
}

impl Layout {
    #[must_use]
    pub fn new(category: impl Into<String>, generation: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            generation: generation.into(),
        }
    }

    #[must_use]
    pub fn from_config(source: &SourceConfig) -> Self {
        Self::new(source.category.clone(), source.generation.clone())
    }

    /// `<category>/<generation>/<shard>/<identifier>`
    #[must_use]
    pub fn resolve(&self, item: &ItemId) -> StoragePath {
        let key = format!(
            "{}/{}/{}/{}",
            self.category,
            self.generation,
            item.shard(),
            item.as_str()
        );
        StoragePath {
            item: item.clone(),
            key,
        }
    }
}

//! Item identifiers

use pga_errors::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque name of one archive unit (a siva filename).
///
/// Guaranteed non-empty, trimmed, and free of path separators and URL
/// delimiters so that it can be joined under a local root or a base URL
/// without escaping it. Uniqueness is not required.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Parse an identifier, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` if the trimmed input is empty, is a
    /// relative path component, or contains a path separator, `?` or `#`.
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed == "."
            || trimmed == ".."
            || trimmed.contains(['/', '\\', '?', '#'])
        {
            return Err(StorageError::InvalidPath {
                path: raw.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shard prefix used by the two-level storage layout: the first two
    /// characters, or the whole identifier when it is shorter.
    #[must_use]
    pub fn shard(&self) -> &str {
        match self.0.char_indices().nth(2) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemId {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemId> for String {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

impl std::str::FromStr for ItemId {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let id = ItemId::parse("  ab12cd.siva\t").unwrap();
        assert_eq!(id.as_str(), "ab12cd.siva");
    }

    #[test]
    fn test_parse_rejects_blank_and_separators() {
        assert!(ItemId::parse("").is_err());
        assert!(ItemId::parse("   ").is_err());
        assert!(ItemId::parse("..").is_err());
        assert!(ItemId::parse("ab/cd.siva").is_err());
        assert!(ItemId::parse("ab\\cd.siva").is_err());
    }

    #[test]
    fn test_parse_rejects_url_delimiters() {
        assert!(ItemId::parse("ab12.siva?x=1").is_err());
        assert!(ItemId::parse("ab12.siva#frag").is_err());
        assert!(ItemId::parse("ab12%20.siva").is_ok());
    }

    #[test]
    fn test_shard() {
        assert_eq!(ItemId::parse("ab12.siva").unwrap().shard(), "ab");
        assert_eq!(ItemId::parse("a").unwrap().shard(), "a");
        assert_eq!(ItemId::parse("éa9").unwrap().shard(), "éa");
    }
}

//! Catalog row model

use serde::{Deserialize, Serialize};

/// One repository row of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub url: String,
    /// Siva files holding this repository's objects
    pub siva_filenames: Vec<String>,
    pub langs: Vec<String>,
}

impl Repository {
    /// Whether the repository contains code in `lang` (ASCII case-insensitive)
    #[must_use]
    pub fn has_lang(&self, lang: &str) -> bool {
        self.langs.iter().any(|l| l.eq_ignore_ascii_case(lang))
    }
}

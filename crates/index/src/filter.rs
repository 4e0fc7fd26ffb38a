//! Row filters

use crate::Repository;
use pga_errors::{Error, IndexError};
use regex::Regex;

/// Criteria a catalog row must meet to be selected.
///
/// An empty filter accepts every row.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    url: Option<Regex>,
    langs: Vec<String>,
}

impl Filter {
    /// Build a filter from a URL pattern and required languages
    ///
    /// # Errors
    ///
    /// Returns an error if `url_pattern` is not a valid regular expression.
    pub fn new(url_pattern: Option<&str>, langs: &[String]) -> Result<Self, Error> {
        let url = url_pattern
            .filter(|p| !p.is_empty())
            .map(|p| {
                Regex::new(p).map_err(|e| IndexError::InvalidFilter {
                    criterion: "url".to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?;

        let langs = langs
            .iter()
            .flat_map(|l| l.split(','))
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self { url, langs })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.langs.is_empty()
    }

    /// URL matches the pattern and every required language is present
    #[must_use]
    pub fn matches(&self, repo: &Repository) -> bool {
        if let Some(url) = &self.url {
            if !url.is_match(&repo.url) {
                return false;
            }
        }
        self.langs.iter().all(|lang| repo.has_lang(lang))
    }
}

/// Iterator adapter yielding only rows accepted by a [`Filter`]
///
/// Read errors are passed through so the caller can abort.
#[derive(Debug)]
pub struct Filtered<I> {
    inner: I,
    filter: Filter,
    scanned: usize,
    matched: usize,
}

impl<I> Filtered<I> {
    pub(crate) fn new(inner: I, filter: Filter) -> Self {
        Self {
            inner,
            filter,
            scanned: 0,
            matched: 0,
        }
    }

    /// Rows read so far
    #[must_use]
    pub fn scanned(&self) -> usize {
        self.scanned
    }

    /// Rows accepted so far
    #[must_use]
    pub fn matched(&self) -> usize {
        self.matched
    }
}

impl<I> Iterator for Filtered<I>
where
    I: Iterator<Item = Result<Repository, Error>>,
{
    type Item = Result<Repository, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(repo) => {
                    self.scanned += 1;
                    if self.filter.matches(&repo) {
                        self.matched += 1;
                        return Some(Ok(repo));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(url: &str, langs: &[&str]) -> Repository {
        Repository {
            url: url.to_string(),
            siva_filenames: vec!["ab12.siva".to_string()],
            langs: langs.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_empty_filter_accepts_all() {
        let filter = Filter::new(None, &[]).unwrap();
        assert!(filter.is_empty());
        assert!(filter.matches(&repo("https://github.com/a/b", &[])));
    }

    #[test]
    fn test_url_regex() {
        let filter = Filter::new(Some("src-d/.*"), &[]).unwrap();
        assert!(filter.matches(&repo("https://github.com/src-d/go-git", &[])));
        assert!(!filter.matches(&repo("https://github.com/octo/hello", &[])));
    }

    #[test]
    fn test_all_langs_required() {
        let filter = Filter::new(None, &["go,shell".to_string()]).unwrap();
        assert!(filter.matches(&repo("u", &["Go", "Shell", "Makefile"])));
        assert!(!filter.matches(&repo("u", &["Go"])));
    }

    #[test]
    fn test_invalid_regex() {
        let result = Filter::new(Some("(unclosed"), &[]);
        assert!(matches!(
            result,
            Err(Error::Index(IndexError::InvalidFilter { .. }))
        ));
    }

    #[test]
    fn test_filtered_counts() {
        let rows = vec![
            Ok(repo("https://github.com/src-d/a", &["Go"])),
            Ok(repo("https://github.com/octo/b", &["Go"])),
            Ok(repo("https://github.com/src-d/c", &["Python"])),
        ];
        let filter = Filter::new(Some("src-d"), &["Go".to_string()]).unwrap();
        let mut filtered = Filtered::new(rows.into_iter(), filter);

        let selected: Vec<_> = filtered.by_ref().collect::<Result<_, _>>().unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(filtered.scanned(), 3);
        assert_eq!(filtered.matched(), 1);
    }
}

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Public Git Archive catalog for pga
//!
//! The catalog is a CSV file (usually gzip compressed) with one row per
//! repository. Each row lists the siva files holding that repository's
//! objects. This crate reads the catalog row by row, filters rows by URL and
//! language, and keeps a local cached copy of the remote catalog.

mod cache;
mod csv;
mod filter;
mod models;

pub use cache::IndexCache;
pub use filter::{Filter, Filtered};
pub use models::Repository;

use csv::RecordReader;
use flate2::bufread::MultiGzDecoder;
use pga_errors::{Error, IndexError};
use pga_events::EventSender;
use pga_net::NetClient;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Magic bytes opening every gzip member
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub const COLUMN_URL: &str = "URL";
pub const COLUMN_SIVA_FILENAMES: &str = "SIVA_FILENAMES";
pub const COLUMN_LANGS: &str = "LANGS";

/// Column positions resolved from the header row. Any other column the
/// catalog carries is never read.
#[derive(Debug, Clone, Copy)]
struct Columns {
    url: usize,
    siva_filenames: usize,
    langs: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self, Error> {
        let positions: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();

        let required = |column: &str| {
            positions
                .get(column)
                .copied()
                .ok_or_else(|| IndexError::MissingColumn {
                    column: column.to_string(),
                })
        };

        Ok(Self {
            url: required(COLUMN_URL)?,
            siva_filenames: required(COLUMN_SIVA_FILENAMES)?,
            langs: positions.get(COLUMN_LANGS).copied(),
        })
    }
}

/// Streaming reader over catalog rows
pub struct Index<R> {
    records: RecordReader<R>,
    columns: Columns,
    compressed: bool,
}

impl<R> std::fmt::Debug for Index<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("columns", &self.columns)
            .field("compressed", &self.compressed)
            .finish_non_exhaustive()
    }
}

impl<R: BufRead> Index<R> {
    /// Read the header row of an uncompressed CSV catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the header is absent or lacks a required column.
    pub fn from_csv(reader: R) -> Result<Self, Error> {
        Self::with_compression(reader, false)
    }

    fn with_compression(reader: R, compressed: bool) -> Result<Self, Error> {
        let mut records = RecordReader::new(reader);
        let header = match records.next_record() {
            Ok(Some((_, header))) => header,
            Ok(None) => return Err(IndexError::MissingHeader.into()),
            Err(e) => return Err(read_error(e, compressed)),
        };
        let columns = Columns::from_header(&header)?;

        Ok(Self {
            records,
            columns,
            compressed,
        })
    }

    /// Keep only rows accepted by `filter`
    #[must_use]
    pub fn with_filter(self, filter: Filter) -> Filtered<Self> {
        Filtered::new(self, filter)
    }

    fn row(&self, line: usize, record: &[String]) -> Result<Repository, Error> {
        Ok(Repository {
            url: field(record, self.columns.url, line)?.trim().to_string(),
            siva_filenames: split_list(field(record, self.columns.siva_filenames, line)?),
            langs: split_list(optional_field(record, self.columns.langs, line)?),
        })
    }
}

fn field(record: &[String], idx: usize, line: usize) -> Result<&str, Error> {
    record.get(idx).map(String::as_str).ok_or_else(|| {
        IndexError::MalformedRow {
            line,
            message: format!(
                "expected at least {} fields, found {}",
                idx + 1,
                record.len()
            ),
        }
        .into()
    })
}

fn optional_field(record: &[String], idx: Option<usize>, line: usize) -> Result<&str, Error> {
    idx.map_or(Ok(""), |idx| field(record, idx, line))
}

impl Index<Box<dyn BufRead + Send>> {
    /// Open a catalog from any reader, detecting gzip by its magic bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot be read or the header is invalid.
    pub fn from_reader<T>(reader: T) -> Result<Self, Error>
    where
        T: Read + Send + 'static,
    {
        let mut buffered = BufReader::new(reader);
        let compressed = {
            let head = buffered.fill_buf()?;
            head.starts_with(&GZIP_MAGIC)
        };

        let reader: Box<dyn BufRead + Send> = if compressed {
            Box::new(BufReader::new(MultiGzDecoder::new(buffered)))
        } else {
            Box::new(buffered)
        };
        Self::with_compression(reader, compressed)
    }

    /// Open a catalog file on disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its header is invalid.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = std::fs::File::open(path).map_err(|e| IndexError::OpenFailed {
            location: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_reader(file)
    }
}

impl<R: BufRead> Iterator for Index<R> {
    type Item = Result<Repository, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.records.next_record() {
            Ok(Some((line, record))) => Some(self.row(line, &record)),
            Ok(None) => None,
            Err(e) => Some(Err(read_error(e, self.compressed))),
        }
    }
}

/// Catalog reader over a boxed byte stream
pub type CatalogReader = Index<Box<dyn BufRead + Send>>;

/// Resolve a catalog location through the cache and open it
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched, opened, or its header
/// is invalid.
pub async fn open_index(
    location: &str,
    cache: &IndexCache,
    client: &NetClient,
    tx: &EventSender,
) -> Result<CatalogReader, Error> {
    let path = cache.fetch(location, client, tx).await?;
    tracing::debug!(path = %path.display(), "opening catalog");
    Index::open(&path)
}

fn read_error(err: csv::RecordError, compressed: bool) -> Error {
    match err {
        csv::RecordError::Io(e) if compressed => IndexError::DecompressFailed {
            message: e.to_string(),
        }
        .into(),
        csv::RecordError::Io(e) => e.into(),
        csv::RecordError::Unterminated { line } => IndexError::MalformedRow {
            line,
            message: "unterminated quoted field".to_string(),
        }
        .into(),
    }
}

/// Split a comma-separated list cell, dropping blanks
fn split_list(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

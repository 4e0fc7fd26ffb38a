//! Where the items of a status run come from

use crate::OpsCtx;
use pga_errors::{Error, OpsError};
use pga_events::{AppEvent, EventEmitter, IndexEvent, ItemOrigin, StatusEvent};
use pga_index::{open_index, Filter};
use pga_types::ItemId;
use tokio::io::AsyncReadExt;

/// Item source for a status run
#[derive(Debug, Clone)]
pub enum ItemSource {
    /// Newline-delimited identifiers already in memory
    List(String),
    /// Newline-delimited identifiers read from standard input
    Stdin,
    /// Siva files of the catalog rows accepted by `filter`
    Catalog {
        /// Catalog location override; defaults to the configured index
        location: Option<String>,
        filter: Filter,
    },
}

/// Parse newline-delimited identifiers.
///
/// Each line is trimmed and blank lines are skipped. Duplicates are kept.
///
/// # Errors
///
/// Returns `OpsError::InvalidItem` for a line that is not a valid file name.
pub fn items_from_text(text: &str) -> Result<Vec<ItemId>, Error> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            ItemId::parse(line).map_err(|e| {
                OpsError::InvalidItem {
                    line: idx + 1,
                    reason: e.to_string(),
                }
                .into()
            })
        })
        .collect()
}

/// Read all of standard input
///
/// # Errors
///
/// Returns `OpsError::StdinUnreadable` if reading fails.
pub async fn read_stdin() -> Result<String, Error> {
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .map_err(|e| OpsError::StdinUnreadable {
            message: e.to_string(),
        })?;
    Ok(text)
}

/// Materialise the identifiers of a run.
///
/// Any failure here is a setup failure: nothing has been dispatched yet.
///
/// # Errors
///
/// Returns an error if standard input cannot be read, the catalog cannot be
/// opened or parsed, or an identifier is invalid.
pub async fn load_items(ctx: &OpsCtx, source: ItemSource) -> Result<Vec<ItemId>, Error> {
    let (items, origin) = match source {
        ItemSource::List(text) => (items_from_text(&text)?, ItemOrigin::List),
        ItemSource::Stdin => (items_from_text(&read_stdin().await?)?, ItemOrigin::List),
        ItemSource::Catalog { location, filter } => {
            let location = location.unwrap_or_else(|| ctx.config.index_location());
            let (items, rows) = catalog_items(ctx, &location, filter).await?;
            (items, ItemOrigin::Catalog { rows })
        }
    };

    ctx.emit(AppEvent::Status(StatusEvent::ItemsLoaded {
        origin,
        count: items.len(),
    }));
    Ok(items)
}

async fn catalog_items(
    ctx: &OpsCtx,
    location: &str,
    filter: Filter,
) -> Result<(Vec<ItemId>, usize), Error> {
    let index = open_index(location, &ctx.index, &ctx.net, &ctx.tx).await?;

    // Row parsing and gzip decoding are blocking work
    let (items, scanned, matched) = tokio::task::spawn_blocking(move || {
        let mut rows = index.with_filter(filter);
        let mut items = Vec::new();
        while let Some(row) = rows.next() {
            let row = row?;
            for name in &row.siva_filenames {
                let item = ItemId::parse(name).map_err(|e| OpsError::InvalidItem {
                    line: rows.scanned() + 1,
                    reason: e.to_string(),
                })?;
                items.push(item);
            }
        }
        Ok::<_, Error>((items, rows.scanned(), rows.matched()))
    })
    .await
    .map_err(|e| Error::internal(format!("catalog reader task failed: {e}")))??;

    ctx.emit(AppEvent::Index(IndexEvent::RowsFiltered { scanned, matched }));
    Ok((items, matched))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_skipped() {
        let items = items_from_text("ab12\n\ncd34\n").unwrap();
        let names: Vec<&str> = items.iter().map(ItemId::as_str).collect();
        assert_eq!(names, vec!["ab12", "cd34"]);
    }

    #[test]
    fn test_lines_trimmed_and_duplicates_kept() {
        let items = items_from_text("  ab12.siva \r\n\t\nab12.siva").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], items[1]);
    }

    #[test]
    fn test_empty_input() {
        assert!(items_from_text("").unwrap().is_empty());
        assert!(items_from_text("\n \n").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_line_reports_position() {
        let result = items_from_text("ab12\n../etc/passwd\n");
        assert!(matches!(
            result,
            Err(Error::Ops(OpsError::InvalidItem { line: 2, .. }))
        ));
    }

    #[test]
    fn test_query_and_fragment_characters_rejected() {
        assert!(matches!(
            items_from_text("ab12.siva\ncd34.siva?raw=1\n"),
            Err(Error::Ops(OpsError::InvalidItem { line: 2, .. }))
        ));
        assert!(matches!(
            items_from_text("ef56.siva#top\n"),
            Err(Error::Ops(OpsError::InvalidItem { line: 1, .. }))
        ));
    }
}

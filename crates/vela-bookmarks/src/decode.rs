//! Row decoding: one relational row in, one typed bookmark node out.
//!
//! A row that cannot be decoded poisons the whole query. The decoder never
//! skips a row; malformed data means the store is corrupt and the caller
//! must see the error, not a partial tree.

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::Row;
use thiserror::Error;

use crate::node::{
    title_or, BookmarkFolder, BookmarkItem, BookmarkNode, Favicon, IconType, NodeType,
    UNTITLED_FOLDER_TITLE,
};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("unknown bookmark type code {code} in row {guid}")]
    UnknownType { guid: String, code: i64 },

    #[error("row {guid} holds a {kind:?} node, which never surfaces through this path")]
    Unsupported { guid: String, kind: NodeType },

    #[error("bookmark row {guid} has no url")]
    MissingUrl { guid: String },

    #[error("row {guid} carries a partial favicon join")]
    PartialFavicon { guid: String },

    #[error("unknown favicon type code {code} in row {guid}")]
    UnknownIconType { guid: String, code: i64 },

    #[error("favicon date {value} in row {guid} is out of range")]
    InvalidIconDate { guid: String, value: i64 },

    #[error("column read failed: {0}")]
    Column(#[from] rusqlite::Error),
}

/// Decodes one `bookmarks` row (optionally joined with `favicons`) into a
/// [`BookmarkNode`].
///
/// Expects `{id, type, guid}` plus `{url, title}` for bookmarks; when
/// `with_icon` is set, the aliased `{icon_url, icon_date, icon_type}`
/// columns from the left-outer join are read as well.
pub fn node_from_row(row: &Row<'_>, with_icon: bool) -> Result<BookmarkNode, DecodeError> {
    let guid: String = row.get("guid")?;
    let code: i64 = row.get("type")?;
    let id: i64 = row.get("id")?;

    let kind = NodeType::from_code(code).ok_or_else(|| DecodeError::UnknownType {
        guid: guid.clone(),
        code,
    })?;

    match kind {
        NodeType::Bookmark => {
            let url: Option<String> = row.get("url")?;
            let url = url.ok_or_else(|| DecodeError::MissingUrl { guid: guid.clone() })?;
            let title: Option<String> = row.get("title")?;
            let favicon = if with_icon {
                favicon_from_row(row, &guid)?
            } else {
                None
            };

            Ok(BookmarkNode::Item(BookmarkItem {
                guid,
                id: Some(id),
                title: title_or(title, &url),
                url,
                favicon,
            }))
        }
        NodeType::Folder => {
            let title: Option<String> = row.get("title")?;
            Ok(BookmarkNode::Folder(BookmarkFolder {
                guid,
                id: Some(id),
                title: title_or(title, UNTITLED_FOLDER_TITLE),
            }))
        }
        kind => Err(DecodeError::Unsupported { guid, kind }),
    }
}

/// Reads the icon columns of a joined row. All three null means the join
/// found no favicon; all three present builds one; anything in between is
/// corrupt data.
fn favicon_from_row(row: &Row<'_>, guid: &str) -> Result<Option<Favicon>, DecodeError> {
    let url: Option<String> = row.get("icon_url")?;
    let date: Option<i64> = row.get("icon_date")?;
    let code: Option<i64> = row.get("icon_type")?;

    match (url, date, code) {
        (None, None, None) => Ok(None),
        (Some(url), Some(date), Some(code)) => {
            let icon_type = IconType::from_code(code).ok_or_else(|| {
                DecodeError::UnknownIconType {
                    guid: guid.to_string(),
                    code,
                }
            })?;
            let date = decode_icon_date(date, guid)?;
            Ok(Some(Favicon {
                url,
                date,
                icon_type,
            }))
        }
        _ => Err(DecodeError::PartialFavicon {
            guid: guid.to_string(),
        }),
    }
}

fn decode_icon_date(value: i64, guid: &str) -> Result<DateTime<Utc>, DecodeError> {
    Utc.timestamp_opt(value, 0)
        .single()
        .ok_or_else(|| DecodeError::InvalidIconDate {
            guid: guid.to_string(),
            value,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    /// Runs `sql` (a single synthetic-row SELECT) and decodes the row.
    fn decode_one(sql: &str, with_icon: bool) -> Result<BookmarkNode, DecodeError> {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare(sql).unwrap();
        let mut rows = stmt.query([]).unwrap();
        let row = rows.next().unwrap().unwrap();
        node_from_row(row, with_icon)
    }

    const PLAIN_BOOKMARK: &str = "SELECT 10 AS id, 1 AS type, 'g1' AS guid, \
         'https://example.com' AS url, 'Example' AS title";

    #[test]
    fn test_decodes_bookmark_row() {
        let node = decode_one(PLAIN_BOOKMARK, false).unwrap();
        let item = node.as_item().expect("expected an item");
        assert_eq!(item.guid, "g1");
        assert_eq!(item.id, Some(10));
        assert_eq!(item.title, "Example");
        assert_eq!(item.url, "https://example.com");
        assert!(item.favicon.is_none());
    }

    #[test]
    fn test_bookmark_title_defaults_to_url() {
        let node = decode_one(
            "SELECT 10 AS id, 1 AS type, 'g1' AS guid, \
             'https://example.com' AS url, NULL AS title",
            false,
        )
        .unwrap();
        assert_eq!(node.title(), "https://example.com");
    }

    #[test]
    fn test_folder_title_defaults_to_untitled() {
        let node = decode_one(
            "SELECT 3 AS id, 2 AS type, 'f1' AS guid, NULL AS url, NULL AS title",
            false,
        )
        .unwrap();
        let folder = node.as_folder().expect("expected a folder");
        assert_eq!(folder.title, UNTITLED_FOLDER_TITLE);
        assert_eq!(folder.id, Some(3));
    }

    #[test]
    fn test_full_icon_columns_attach_favicon() {
        let node = decode_one(
            "SELECT 10 AS id, 1 AS type, 'g1' AS guid, \
             'https://example.com' AS url, 'Example' AS title, \
             'https://example.com/favicon.ico' AS icon_url, \
             1700000000 AS icon_date, 0 AS icon_type",
            true,
        )
        .unwrap();
        let favicon = node.as_item().unwrap().favicon.as_ref().unwrap();
        assert_eq!(favicon.url, "https://example.com/favicon.ico");
        assert_eq!(favicon.icon_type, IconType::Icon);
        assert_eq!(favicon.date.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_all_null_icon_columns_mean_no_favicon() {
        let node = decode_one(
            "SELECT 10 AS id, 1 AS type, 'g1' AS guid, \
             'https://example.com' AS url, 'Example' AS title, \
             NULL AS icon_url, NULL AS icon_date, NULL AS icon_type",
            true,
        )
        .unwrap();
        assert!(node.as_item().unwrap().favicon.is_none());
    }

    #[test]
    fn test_partial_icon_columns_are_an_error() {
        let err = decode_one(
            "SELECT 10 AS id, 1 AS type, 'g1' AS guid, \
             'https://example.com' AS url, 'Example' AS title, \
             'https://example.com/favicon.ico' AS icon_url, \
             NULL AS icon_date, NULL AS icon_type",
            true,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::PartialFavicon { .. }));
    }

    #[test]
    fn test_unknown_icon_type_is_an_error() {
        let err = decode_one(
            "SELECT 10 AS id, 1 AS type, 'g1' AS guid, \
             'https://example.com' AS url, 'Example' AS title, \
             'https://example.com/favicon.ico' AS icon_url, \
             1700000000 AS icon_date, 42 AS icon_type",
            true,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownIconType { code: 42, .. }));
    }

    #[test]
    fn test_bookmark_without_url_is_an_error() {
        let err = decode_one(
            "SELECT 10 AS id, 1 AS type, 'g1' AS guid, NULL AS url, 'T' AS title",
            false,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::MissingUrl { .. }));
    }

    #[test]
    fn test_separator_row_is_unsupported() {
        let err = decode_one(
            "SELECT 10 AS id, 3 AS type, 's1' AS guid, NULL AS url, NULL AS title",
            false,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Unsupported {
                kind: NodeType::Separator,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_type_code_is_an_error() {
        let err = decode_one(
            "SELECT 10 AS id, 99 AS type, 'x1' AS guid, NULL AS url, NULL AS title",
            false,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownType { code: 99, .. }));
    }
}

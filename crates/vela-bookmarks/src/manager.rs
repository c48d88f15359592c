//! Tree queries, mutations, and the model facade over them.

use rusqlite::{types::ToSql, OptionalExtension};
use uuid::Uuid;
use vela_storage::{roots, Database};

use crate::cursor::Cursor;
use crate::decode;
use crate::error::BookmarksError;
use crate::favicons::{FaviconStore, SqliteFavicons};
use crate::model::{BookmarksModel, PopulatedFolder};
use crate::node::{title_or, BookmarkFolder, BookmarkNode, NodeType, ShareItem};

/// Facade over the bookmark tree: folder navigation, point queries, and
/// mutations.
///
/// Every public operation reports through exactly one of its
/// `success`/`failure` continuations, invoked on the caller's thread
/// before the call returns. There is no cancellation and no retry; a call
/// is `Querying -> {Success | Failure}`, terminal.
pub struct BookmarkManager {
    db: Database,
    favicons: Box<dyn FaviconStore + Send + Sync>,
}

impl BookmarkManager {
    /// Manager writing icons through the default [`SqliteFavicons`] store.
    pub fn new(db: Database) -> Self {
        Self::with_favicon_store(db, Box::new(SqliteFavicons))
    }

    pub fn with_favicon_store(db: Database, favicons: Box<dyn FaviconStore + Send + Sync>) -> Self {
        Self { db, favicons }
    }

    /// Runs one children query and decodes the rows.
    ///
    /// Storage-level failure becomes a failed [`Cursor`]; a row that fails
    /// to decode aborts the whole query with a [`crate::DecodeError`].
    fn children_where(
        &self,
        where_clause: &str,
        args: &[&dyn ToSql],
        include_icon: bool,
    ) -> Result<Cursor<BookmarkNode>, BookmarksError> {
        let inner =
            format!("SELECT id, type, guid, url, title, faviconID FROM bookmarks WHERE {where_clause}");
        let sql = if include_icon {
            format!(
                "SELECT bookmarks.id AS id, bookmarks.type AS type, guid, \
                 bookmarks.url AS url, title, \
                 favicons.url AS icon_url, favicons.date AS icon_date, \
                 favicons.type AS icon_type \
                 FROM ({inner}) AS bookmarks \
                 LEFT OUTER JOIN favicons ON bookmarks.faviconID = favicons.id"
            )
        } else {
            inner
        };

        let fetched = self.db.with_read_connection(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(args)?;
            let mut nodes = Vec::new();
            while let Some(row) = rows.next()? {
                match decode::node_from_row(row, include_icon) {
                    Ok(node) => nodes.push(node),
                    Err(e) => return Ok(Err(e)),
                }
            }
            Ok(Ok(nodes))
        });

        match fetched {
            Ok(Ok(nodes)) => Ok(Cursor::from_rows(nodes)),
            Ok(Err(decode_err)) => Err(decode_err.into()),
            Err(e) => {
                tracing::warn!(error = %e, "bookmark children query failed");
                Ok(Cursor::failure(e.to_string()))
            }
        }
    }

    /// Children of the synthetic root. The root row is self-parented, so
    /// it must be excluded from its own children.
    fn root_children(&self) -> Result<Cursor<BookmarkNode>, BookmarksError> {
        self.children_where("parent = ?1 AND id <> ?1", &[&roots::ROOT_ID], true)
    }

    /// Children of the folder with `guid`, resolved through a correlated
    /// subquery. A guid with no matching row yields an empty success.
    fn folder_children(&self, guid: &str) -> Result<Cursor<BookmarkNode>, BookmarksError> {
        self.children_where(
            "parent IS NOT NULL AND parent = (SELECT id FROM bookmarks WHERE guid = ?1)",
            &[&guid],
            true,
        )
    }

    fn folder_model<'a, S, F>(&'a self, folder: BookmarkFolder, children: Result<Cursor<BookmarkNode>, BookmarksError>, success: S, failure: F)
    where
        S: FnOnce(BookmarksModel<'a>),
        F: FnOnce(BookmarksError),
    {
        match children {
            Ok(children) if children.is_failure() => {
                let message = children.status_message().unwrap_or("unknown error");
                failure(BookmarksError::Query(message.to_string()));
            }
            Ok(children) => success(BookmarksModel::new(
                self,
                PopulatedFolder::new(folder, children),
            )),
            Err(e) => failure(e),
        }
    }

    /// Builds the model for the synthetic root folder.
    pub fn model_for_root<'a, S, F>(&'a self, success: S, failure: F)
    where
        S: FnOnce(BookmarksModel<'a>),
        F: FnOnce(BookmarksError),
    {
        let root = BookmarkFolder {
            guid: roots::ROOT_GUID.to_string(),
            id: Some(roots::ROOT_ID),
            title: "Root".to_string(),
        };
        self.folder_model(root, self.root_children(), success, failure);
    }

    /// Builds a model rooted at `folder`, reusing its title.
    pub fn model_for_folder<'a, S, F>(&'a self, folder: &BookmarkFolder, success: S, failure: F)
    where
        S: FnOnce(BookmarksModel<'a>),
        F: FnOnce(BookmarksError),
    {
        let children = self.folder_children(&folder.guid);
        self.folder_model(folder.clone(), children, success, failure);
    }

    /// Builds a model rooted at the folder with `guid`. Only the guid is
    /// known here, so the root's title is left empty; callers wanting a
    /// title re-fetch the folder node itself.
    pub fn model_for_folder_by_guid<'a, S, F>(&'a self, guid: &str, success: S, failure: F)
    where
        S: FnOnce(BookmarksModel<'a>),
        F: FnOnce(BookmarksError),
    {
        let shell = BookmarkFolder {
            guid: guid.to_string(),
            id: None,
            title: String::new(),
        };
        let children = self.folder_children(guid);
        self.folder_model(shell, children, success, failure);
    }

    /// Sentinel model standing in for "no model available"; its root
    /// carries a permanently failed cursor.
    pub fn null_model(&self) -> BookmarksModel<'_> {
        let folder = BookmarkFolder {
            guid: "null".to_string(),
            id: None,
            title: String::new(),
        };
        BookmarksModel::new(
            self,
            PopulatedFolder::new(folder, Cursor::failure("null model")),
        )
    }

    /// Reports whether at least one bookmark row matches `url` exactly.
    /// One match and many matches are indistinguishable here.
    pub fn is_bookmarked<S, F>(&self, url: &str, success: S, failure: F)
    where
        S: FnOnce(bool),
        F: FnOnce(BookmarksError),
    {
        let found = self.db.with_read_connection(|conn| {
            let id: Option<i64> = conn
                .query_row(
                    "SELECT id FROM bookmarks WHERE url = ?1 LIMIT 1",
                    [url],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id.is_some())
        });

        match found {
            Ok(found) => success(found),
            Err(e) => failure(e.into()),
        }
    }

    fn run_change<S, F>(&self, sql: &str, args: &[&dyn ToSql], success: S, failure: F)
    where
        S: FnOnce(),
        F: FnOnce(BookmarksError),
    {
        let result = self.db.with_write_connection(|conn| {
            conn.execute(sql, args)?;
            Ok(())
        });

        match result {
            Ok(()) => success(),
            Err(e) => failure(e.into()),
        }
    }

    /// Deletes every bookmark row matching `url` exactly; duplicate rows
    /// all go at once.
    pub fn remove_by_url<S, F>(&self, url: &str, success: S, failure: F)
    where
        S: FnOnce(),
        F: FnOnce(BookmarksError),
    {
        tracing::debug!(url, "removing bookmarks by url");
        self.run_change("DELETE FROM bookmarks WHERE url = ?1", &[&url], success, failure);
    }

    /// Deletes `node` by surrogate id when it has one, else by guid.
    /// Deleting a row that is already gone still succeeds.
    pub fn remove<S, F>(&self, node: &BookmarkNode, success: S, failure: F)
    where
        S: FnOnce(),
        F: FnOnce(BookmarksError),
    {
        if let BookmarkNode::Item(item) = node {
            tracing::debug!(url = %item.url, "removing bookmark");
        }

        match node.id() {
            Some(id) => {
                self.run_change("DELETE FROM bookmarks WHERE id = ?1", &[&id], success, failure)
            }
            None => self.run_change(
                "DELETE FROM bookmarks WHERE guid = ?1",
                &[&node.guid()],
                success,
                failure,
            ),
        }
    }

    /// Inserts `item` as a bookmark under the mobile bookmarks folder,
    /// with a fresh guid and the URL standing in for a missing title.
    ///
    /// The favicon write and the bookmark insert share one transaction; a
    /// failure in either step leaves no partial row behind.
    pub fn share_item<S, F>(&self, item: &ShareItem, success: S, failure: F)
    where
        S: FnOnce(),
        F: FnOnce(BookmarksError),
    {
        let result = self.db.transaction(|conn| {
            let icon_id = match &item.favicon {
                Some(icon) => Some(self.favicons.add_favicon(conn, icon)?),
                None => None,
            };

            let guid = Uuid::new_v4().to_string();
            let title = title_or(item.title.clone(), &item.url);
            tracing::debug!(url = %item.url, icon_id = ?icon_id, "inserting shared bookmark");
            conn.execute(
                "INSERT INTO bookmarks (guid, type, url, title, parent, faviconID) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    guid,
                    NodeType::Bookmark.code(),
                    item.url,
                    title,
                    roots::MOBILE_ID,
                    icon_id
                ],
            )?;
            Ok(())
        });

        match result {
            Ok(()) => success(),
            Err(e) => failure(e.into()),
        }
    }
}
